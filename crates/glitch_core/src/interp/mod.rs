//! Frame interpolation capability and its RIFE implementation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::media::{run_command, ToolError};

/// Inference script name, resolved relative to the RIFE directory.
const INFERENCE_SCRIPT: &str = "inference_img.py";

/// RIFE inference can be slow on CPU; give it a generous deadline.
const RIFE_TIMEOUT: Duration = Duration::from_secs(1800);

/// Capability interface for the external frame-interpolation tool.
pub trait FrameInterpolator: Send + Sync {
    /// Synthesize `2^exp` intermediate frames between the two boundary
    /// frames, writing them into `frames_dir`.
    fn interpolate(
        &self,
        frame_a: &Path,
        frame_b: &Path,
        exp: u32,
        frames_dir: &Path,
    ) -> Result<(), ToolError>;
}

/// Real interpolator that shells out to RIFE's `inference_img.py`.
///
/// The script is executed with the RIFE checkout as its working directory
/// because it resolves `train_log/` relative to itself.
pub struct RifeInterpolator {
    rife_dir: PathBuf,
    timeout: Duration,
}

impl RifeInterpolator {
    pub fn new(rife_dir: impl Into<PathBuf>) -> Self {
        Self {
            rife_dir: rife_dir.into(),
            timeout: RIFE_TIMEOUT,
        }
    }

    /// Override the inference deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl FrameInterpolator for RifeInterpolator {
    fn interpolate(
        &self,
        frame_a: &Path,
        frame_b: &Path,
        exp: u32,
        frames_dir: &Path,
    ) -> Result<(), ToolError> {
        let frame_a = frame_a.display().to_string();
        let frame_b = frame_b.display().to_string();
        let exp_arg = format!("--exp={exp}");
        let output = frames_dir.display().to_string();

        tracing::info!(
            "Running RIFE in {}: {} {} -> {}",
            self.rife_dir.display(),
            frame_a,
            frame_b,
            output
        );

        run_command(
            "python3",
            &[
                INFERENCE_SCRIPT,
                "--img",
                &frame_a,
                &frame_b,
                &exp_arg,
                "--output",
                &output,
            ],
            Some(&self.rife_dir),
            self.timeout,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolator_is_object_safe() {
        fn assert_dyn(_i: &dyn FrameInterpolator) {}
        let i = RifeInterpolator::new("/opt/rife");
        assert_dyn(&i);
    }
}
