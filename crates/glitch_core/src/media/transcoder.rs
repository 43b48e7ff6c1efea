//! Transcoder capability and its ffmpeg implementation.
//!
//! Every encode goes through the same compatibility profile (libx264 with
//! yuv420p) so the raw and final transitions play everywhere.

use std::path::Path;
use std::time::Duration;

use super::runner::{run_command, DEFAULT_TOOL_TIMEOUT};
use super::ToolError;

/// Which boundary of a clip to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipEdge {
    /// The temporally last frame of the clip.
    LastFrame,
    /// The temporally first frame of the clip.
    FirstFrame,
}

/// Capability interface for the external decode/encode engine.
pub trait Transcoder: Send + Sync {
    /// Extract a single boundary frame from `clip` to `image_out`,
    /// overwriting any prior frame at that path.
    fn extract_boundary_frame(
        &self,
        clip: &Path,
        edge: ClipEdge,
        image_out: &Path,
    ) -> Result<(), ToolError>;

    /// Encode an ordered image sequence matching `pattern` (an ffmpeg
    /// `%d`-style pattern path) into a video at a constant frame rate.
    fn encode_frame_sequence(
        &self,
        pattern: &Path,
        frame_rate: u32,
        video_out: &Path,
    ) -> Result<(), ToolError>;

    /// Apply an ffmpeg `-vf` filter chain to `video_in`, re-encoding to
    /// `video_out`.
    fn apply_filter_chain(
        &self,
        video_in: &Path,
        filters: &str,
        video_out: &Path,
    ) -> Result<(), ToolError>;
}

/// Real transcoder that shells out to ffmpeg.
pub struct FfmpegTranscoder {
    timeout: Duration,
}

impl FfmpegTranscoder {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    /// Override the per-invocation deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn run(&self, args: &[&str]) -> Result<(), ToolError> {
        run_command("ffmpeg", args, None, self.timeout)?;
        Ok(())
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcoder for FfmpegTranscoder {
    fn extract_boundary_frame(
        &self,
        clip: &Path,
        edge: ClipEdge,
        image_out: &Path,
    ) -> Result<(), ToolError> {
        let clip = path_arg(clip);
        let image_out = path_arg(image_out);

        match edge {
            // -sseof -1 seeks to one second before the end so the last
            // decoded frame is the last frame of the clip.
            ClipEdge::LastFrame => self.run(&[
                "-y", "-sseof", "-1", "-i", &clip, "-vframes", "1", &image_out,
            ]),
            ClipEdge::FirstFrame => self.run(&["-y", "-i", &clip, "-vframes", "1", &image_out]),
        }
    }

    fn encode_frame_sequence(
        &self,
        pattern: &Path,
        frame_rate: u32,
        video_out: &Path,
    ) -> Result<(), ToolError> {
        let rate = frame_rate.to_string();
        self.run(&[
            "-y",
            "-framerate",
            &rate,
            "-i",
            &path_arg(pattern),
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            &path_arg(video_out),
        ])
    }

    fn apply_filter_chain(
        &self,
        video_in: &Path,
        filters: &str,
        video_out: &Path,
    ) -> Result<(), ToolError> {
        self.run(&[
            "-y",
            "-i",
            &path_arg(video_in),
            "-vf",
            filters,
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            &path_arg(video_out),
        ])
    }
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}
