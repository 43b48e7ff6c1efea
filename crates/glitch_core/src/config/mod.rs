//! Pipeline configuration and the fixed filesystem layout contract.
//!
//! All paths the stages touch are derived from one immutable
//! `PipelineConfig` built at startup. Directory fields are normalized to
//! absolute paths in the constructor so no stage depends on the working
//! directory at execution time.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default interpolation exponent (2^5 = 32 intermediate frames).
pub const DEFAULT_EXP: u32 = 5;

/// Largest accepted interpolation exponent. Beyond this the frame count
/// stops being a plausible transition and the tool would churn for hours.
pub const MAX_EXP: u32 = 10;

/// Boundary frame filenames, written into the input directory.
pub const BOUNDARY_FRAME_A: &str = "lastA.png";
pub const BOUNDARY_FRAME_B: &str = "firstB.png";

/// Subdirectory of the output directory that receives interpolated frames.
pub const FRAMES_SUBDIR: &str = "frames_interpolados";

/// Assembled transition before the effect pass.
pub const TRANSITION_RAW: &str = "transition_raw.mp4";

/// Final artifact.
pub const TRANSITION_FINAL: &str = "transition_final.mp4";

/// Errors building a `PipelineConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("interpolation exponent {0} is too large (max {MAX_EXP})")]
    ExpTooLarge(u32),

    #[error("cannot resolve current working directory: {source}")]
    CurrentDir {
        #[source]
        source: std::io::Error,
    },
}

/// Immutable run configuration, built once from caller-supplied parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory containing the two source clips (absolute).
    pub input_dir: PathBuf,
    /// Directory receiving all pipeline output (absolute).
    pub output_dir: PathBuf,
    /// RIFE checkout directory; holds `inference_img.py` and `train_log/`
    /// (absolute).
    pub model_dir: PathBuf,
    /// Filename of clip A within the input directory.
    pub clip_a: String,
    /// Filename of clip B within the input directory.
    pub clip_b: String,
    /// Interpolation exponent; the tool produces 2^exp frames.
    pub exp: u32,
}

impl PipelineConfig {
    /// Build a configuration, normalizing all directories to absolute paths.
    pub fn new(
        input_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        model_dir: impl AsRef<Path>,
        clip_a: impl Into<String>,
        clip_b: impl Into<String>,
        exp: u32,
    ) -> Result<Self, ConfigError> {
        if exp > MAX_EXP {
            return Err(ConfigError::ExpTooLarge(exp));
        }

        let cwd = std::env::current_dir().map_err(|e| ConfigError::CurrentDir { source: e })?;

        Ok(Self {
            input_dir: absolutize(input_dir.as_ref(), &cwd),
            output_dir: absolutize(output_dir.as_ref(), &cwd),
            model_dir: absolutize(model_dir.as_ref(), &cwd),
            clip_a: clip_a.into(),
            clip_b: clip_b.into(),
            exp,
        })
    }

    /// Number of frames the interpolator is expected to produce.
    pub fn expected_frame_count(&self) -> usize {
        1usize << self.exp
    }

    pub fn clip_a_path(&self) -> PathBuf {
        self.input_dir.join(&self.clip_a)
    }

    pub fn clip_b_path(&self) -> PathBuf {
        self.input_dir.join(&self.clip_b)
    }

    /// Last frame of clip A, written by the extract stage.
    pub fn boundary_frame_a(&self) -> PathBuf {
        self.input_dir.join(BOUNDARY_FRAME_A)
    }

    /// First frame of clip B, written by the extract stage.
    pub fn boundary_frame_b(&self) -> PathBuf {
        self.input_dir.join(BOUNDARY_FRAME_B)
    }

    /// Directory the interpolator writes the frame sequence into.
    pub fn frames_dir(&self) -> PathBuf {
        self.output_dir.join(FRAMES_SUBDIR)
    }

    pub fn transition_raw(&self) -> PathBuf {
        self.output_dir.join(TRANSITION_RAW)
    }

    pub fn transition_final(&self) -> PathBuf {
        self.output_dir.join(TRANSITION_FINAL)
    }
}

/// Resolve a path against `base` and collapse `.`/`..` components without
/// touching the filesystem (the output directory may not exist yet).
fn absolutize(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(exp: u32) -> PipelineConfig {
        PipelineConfig::new("/in", "/out", "/rife", "a.mp4", "b.mp4", exp).unwrap()
    }

    #[test]
    fn derived_paths_follow_layout_contract() {
        let cfg = config(5);
        assert_eq!(cfg.clip_a_path(), PathBuf::from("/in/a.mp4"));
        assert_eq!(cfg.boundary_frame_a(), PathBuf::from("/in/lastA.png"));
        assert_eq!(cfg.boundary_frame_b(), PathBuf::from("/in/firstB.png"));
        assert_eq!(cfg.frames_dir(), PathBuf::from("/out/frames_interpolados"));
        assert_eq!(cfg.transition_raw(), PathBuf::from("/out/transition_raw.mp4"));
        assert_eq!(
            cfg.transition_final(),
            PathBuf::from("/out/transition_final.mp4")
        );
    }

    #[test]
    fn frame_count_is_power_of_two() {
        assert_eq!(config(0).expected_frame_count(), 1);
        assert_eq!(config(2).expected_frame_count(), 4);
        assert_eq!(config(5).expected_frame_count(), 32);
    }

    #[test]
    fn rejects_oversized_exponent() {
        let result = PipelineConfig::new("/in", "/out", "/rife", "a", "b", MAX_EXP + 1);
        assert!(matches!(result, Err(ConfigError::ExpTooLarge(_))));
    }

    #[test]
    fn relative_paths_resolve_against_cwd() {
        let cfg = PipelineConfig::new("input", "output", "RIFE", "a", "b", 5).unwrap();
        assert!(cfg.input_dir.is_absolute());
        assert!(cfg.output_dir.is_absolute());
        assert!(cfg.model_dir.is_absolute());
    }

    #[test]
    fn absolutize_collapses_dot_components() {
        let base = Path::new("/work");
        assert_eq!(
            absolutize(Path::new("./a/../b"), base),
            PathBuf::from("/work/b")
        );
        assert_eq!(absolutize(Path::new("/x/./y"), base), PathBuf::from("/x/y"));
    }
}
