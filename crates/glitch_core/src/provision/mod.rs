//! One-time provisioning of the RIFE model weights.
//!
//! The model directory is a self-contained cache reusable across runs: if
//! `train_log/` already holds recognizable model files nothing is fetched.
//! Otherwise a single zip archive is downloaded, unpacked into `train_log/`
//! and the archive removed. Fetching is behind the [`AssetFetcher`] trait
//! so tests never touch the network.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Pinned location of the packaged RIFE v3.6 model.
pub const MODEL_ARCHIVE_URL: &str =
    "https://drive.google.com/uc?id=1APIzVeI-4ZZCEuIRE1m6WYfSCaOsi_7_";

/// Subdirectory of the model dir that holds the weights.
pub const TRAIN_LOG_DIR: &str = "train_log";

const MODEL_ARCHIVE_NAME: &str = "RIFE_trained_model_v3.6.zip";

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(900);

/// Errors provisioning the model asset.
///
/// Every variant is fatal to the run; the display output includes a
/// manual-remediation hint so the user can install the model by hand.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("cannot create model directory {path}: {source}\n{REMEDIATION_HINT}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to download model from {url}: {message}\n{REMEDIATION_HINT}")]
    Download { url: String, message: String },

    #[error("failed to unpack model archive {archive}: {message}\n{REMEDIATION_HINT}")]
    Unpack { archive: PathBuf, message: String },

    #[error("I/O error while provisioning model: {source}\n{REMEDIATION_HINT}")]
    Io {
        #[source]
        source: io::Error,
    },
}

/// Manual-remediation instruction appended to every provisioning failure.
const REMEDIATION_HINT: &str =
    "Please download the RIFE v3.6 model archive manually and unpack it into <model_dir>/train_log/";

/// Capability interface for fetching a remote archive to a local path.
pub trait AssetFetcher: Send + Sync {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), ProvisionError>;
}

/// Real fetcher using a blocking HTTP client with a bounded timeout.
pub struct HttpFetcher {
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            timeout: DOWNLOAD_TIMEOUT,
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetFetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), ProvisionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ProvisionError::Download {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let mut response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| ProvisionError::Download {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let mut file = fs::File::create(dest).map_err(|e| ProvisionError::Io { source: e })?;
        response
            .copy_to(&mut file)
            .map_err(|e| ProvisionError::Download {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }
}

/// Check whether `model_dir` already holds a usable model.
///
/// The heuristic matches what the inference tool needs: any `.pkl` weight
/// file or `.py` model definition under `train_log/`.
pub fn model_present(model_dir: &Path) -> bool {
    let train_log = model_dir.join(TRAIN_LOG_DIR);
    let Ok(entries) = fs::read_dir(&train_log) else {
        return false;
    };

    entries.flatten().any(|entry| {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        name.ends_with(".pkl") || name.ends_with(".py")
    })
}

/// Ensure the model asset exists under `model_dir`. Idempotent.
///
/// Returns `true` if a download was performed, `false` if the cached model
/// was reused (in which case the fetcher is never invoked).
pub fn ensure_model(model_dir: &Path, fetcher: &dyn AssetFetcher) -> Result<bool, ProvisionError> {
    if model_present(model_dir) {
        tracing::info!("Model already present in {}", model_dir.display());
        return Ok(false);
    }

    let train_log = model_dir.join(TRAIN_LOG_DIR);
    fs::create_dir_all(&train_log).map_err(|e| ProvisionError::CreateDir {
        path: train_log.clone(),
        source: e,
    })?;

    let archive_path = train_log.join(MODEL_ARCHIVE_NAME);
    tracing::info!("Downloading RIFE model from {}", MODEL_ARCHIVE_URL);
    fetcher.fetch(MODEL_ARCHIVE_URL, &archive_path)?;

    tracing::info!("Extracting model archive...");
    unpack_archive(&archive_path, &train_log)?;

    // The archive served its purpose; only the unpacked weights stay.
    fs::remove_file(&archive_path).ok();

    tracing::info!("Model downloaded and extracted to {}", train_log.display());
    Ok(true)
}

fn unpack_archive(archive_path: &Path, dest: &Path) -> Result<(), ProvisionError> {
    let file = fs::File::open(archive_path).map_err(|e| ProvisionError::Io { source: e })?;

    let mut archive = zip::ZipArchive::new(file).map_err(|e| ProvisionError::Unpack {
        archive: archive_path.to_path_buf(),
        message: e.to_string(),
    })?;

    archive.extract(dest).map_err(|e| ProvisionError::Unpack {
        archive: archive_path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFetcher {
        calls: AtomicUsize,
    }

    impl CountingFetcher {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl AssetFetcher for CountingFetcher {
        fn fetch(&self, _url: &str, dest: &Path) -> Result<(), ProvisionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            write_model_zip(dest);
            Ok(())
        }
    }

    fn write_model_zip(dest: &Path) {
        let file = fs::File::create(dest).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("flownet.pkl", options).unwrap();
        writer.write_all(b"weights").unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn populated_model_dir_skips_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let train_log = dir.path().join(TRAIN_LOG_DIR);
        fs::create_dir_all(&train_log).unwrap();
        fs::write(train_log.join("flownet.pkl"), b"weights").unwrap();

        let fetcher = CountingFetcher::new();
        let downloaded = ensure_model(dir.path(), &fetcher).unwrap();

        assert!(!downloaded);
        assert_eq!(fetcher.call_count(), 0);
    }

    #[test]
    fn empty_model_dir_downloads_and_unpacks() {
        let dir = tempfile::tempdir().unwrap();

        let fetcher = CountingFetcher::new();
        let downloaded = ensure_model(dir.path(), &fetcher).unwrap();

        assert!(downloaded);
        assert_eq!(fetcher.call_count(), 1);
        assert!(dir
            .path()
            .join(TRAIN_LOG_DIR)
            .join("flownet.pkl")
            .exists());
        // The temporary archive must be cleaned up.
        assert!(!dir
            .path()
            .join(TRAIN_LOG_DIR)
            .join(MODEL_ARCHIVE_NAME)
            .exists());
        assert!(model_present(dir.path()));
    }

    #[test]
    fn second_run_reuses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher::new();

        ensure_model(dir.path(), &fetcher).unwrap();
        let downloaded_again = ensure_model(dir.path(), &fetcher).unwrap();

        assert!(!downloaded_again);
        assert_eq!(fetcher.call_count(), 1);
    }

    #[test]
    fn unrelated_files_do_not_count_as_model() {
        let dir = tempfile::tempdir().unwrap();
        let train_log = dir.path().join(TRAIN_LOG_DIR);
        fs::create_dir_all(&train_log).unwrap();
        fs::write(train_log.join("README.md"), b"docs").unwrap();

        assert!(!model_present(dir.path()));
    }

    #[test]
    fn provision_error_carries_remediation_hint() {
        let err = ProvisionError::Download {
            url: MODEL_ARCHIVE_URL.to_string(),
            message: "connection refused".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("connection refused"));
        assert!(msg.contains("manually"));
        assert!(msg.contains("train_log"));
    }
}
