//! The frame-naming contract between interpolator and assembler.
//!
//! RIFE's `inference_img.py` writes `img0.png`, `img1.png`, ... with
//! unpadded decimal indices. The assembler addresses the sequence with the
//! ffmpeg pattern `img%d.png`, so before encoding we verify that the
//! directory actually matches: right names, right count, no gaps. A
//! mismatch here historically produced silent empty videos, so it gets a
//! dedicated error instead of falling through to ffmpeg.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// ffmpeg input pattern for the interpolated sequence.
pub const FRAME_PATTERN: &str = "img%d.png";

const FRAME_PREFIX: &str = "img";
const FRAME_SUFFIX: &str = ".png";

/// Filename of the frame at `index` under the pinned convention.
pub fn frame_file_name(index: usize) -> String {
    format!("{FRAME_PREFIX}{index}{FRAME_SUFFIX}")
}

/// Ways a frame directory can violate the contract.
#[derive(Error, Debug)]
pub enum FrameSequenceError {
    #[error("cannot read frame directory {dir}: {source}")]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no frames matching '{FRAME_PATTERN}' in {dir} (found: {found})")]
    NoMatchingFrames { dir: PathBuf, found: String },

    #[error("expected {expected} frames in {dir}, found {found}")]
    WrongCount {
        dir: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("frame sequence in {dir} has a gap: missing {missing}")]
    Gap { dir: PathBuf, missing: String },
}

/// Verify that `dir` holds exactly `expected` frames named
/// `img0.png .. img<expected-1>.png`.
pub fn validate_frame_sequence(dir: &Path, expected: usize) -> Result<(), FrameSequenceError> {
    let entries = std::fs::read_dir(dir).map_err(|e| FrameSequenceError::ReadDir {
        dir: dir.to_path_buf(),
        source: e,
    })?;

    let mut indices = Vec::new();
    let mut unmatched = Vec::new();

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        match parse_frame_index(&name) {
            Some(index) => indices.push(index),
            None => unmatched.push(name),
        }
    }

    if indices.is_empty() {
        unmatched.sort();
        let found = if unmatched.is_empty() {
            "empty directory".to_string()
        } else {
            unmatched
                .iter()
                .take(5)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        };
        return Err(FrameSequenceError::NoMatchingFrames {
            dir: dir.to_path_buf(),
            found,
        });
    }

    if indices.len() != expected {
        return Err(FrameSequenceError::WrongCount {
            dir: dir.to_path_buf(),
            expected,
            found: indices.len(),
        });
    }

    indices.sort_unstable();
    for (position, index) in indices.iter().enumerate() {
        if *index != position {
            return Err(FrameSequenceError::Gap {
                dir: dir.to_path_buf(),
                missing: frame_file_name(position),
            });
        }
    }

    Ok(())
}

fn parse_frame_index(name: &str) -> Option<usize> {
    let digits = name.strip_prefix(FRAME_PREFIX)?.strip_suffix(FRAME_SUFFIX)?;
    if digits.is_empty() || (digits.len() > 1 && digits.starts_with('0')) {
        // Zero-padded names would collide under the %d pattern.
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_frames(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"png").unwrap();
        }
    }

    #[test]
    fn frame_names_are_unpadded() {
        assert_eq!(frame_file_name(0), "img0.png");
        assert_eq!(frame_file_name(12), "img12.png");
    }

    #[test]
    fn accepts_complete_sequence() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), &["img0.png", "img1.png", "img2.png", "img3.png"]);
        assert!(validate_frame_sequence(dir.path(), 4).is_ok());
    }

    #[test]
    fn rejects_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_frame_sequence(dir.path(), 4).unwrap_err();
        assert!(matches!(err, FrameSequenceError::NoMatchingFrames { .. }));
    }

    #[test]
    fn rejects_foreign_naming_scheme_and_names_samples() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), &["frame_0001.png", "frame_0002.png"]);
        let err = validate_frame_sequence(dir.path(), 2).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("img%d.png"));
        assert!(msg.contains("frame_0001.png"));
    }

    #[test]
    fn rejects_wrong_count() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), &["img0.png", "img1.png"]);
        let err = validate_frame_sequence(dir.path(), 4).unwrap_err();
        assert!(matches!(
            err,
            FrameSequenceError::WrongCount {
                expected: 4,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn rejects_gap_in_indices() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), &["img0.png", "img2.png"]);
        let err = validate_frame_sequence(dir.path(), 2).unwrap_err();
        match err {
            FrameSequenceError::Gap { missing, .. } => assert_eq!(missing, "img1.png"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_padded_names_do_not_match() {
        assert_eq!(parse_frame_index("img007.png"), None);
        assert_eq!(parse_frame_index("img7.png"), Some(7));
        assert_eq!(parse_frame_index("img0.png"), Some(0));
        assert_eq!(parse_frame_index("img.png"), None);
        assert_eq!(parse_frame_index("lastA.png"), None);
    }
}
