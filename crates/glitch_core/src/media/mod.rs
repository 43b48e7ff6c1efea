//! External media tool wrappers.
//!
//! The decode/encode engine (ffmpeg) is hidden behind the [`Transcoder`]
//! capability trait so tests can substitute fakes without invoking real
//! media tools.

mod frames;
mod runner;
mod transcoder;

pub use frames::{frame_file_name, validate_frame_sequence, FrameSequenceError, FRAME_PATTERN};
pub use runner::{run_command, CommandOutput, DEFAULT_TOOL_TIMEOUT};
pub use transcoder::{ClipEdge, FfmpegTranscoder, Transcoder};

use std::io;

use thiserror::Error;

/// Error from running an external tool.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The tool binary could not be started at all.
    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The tool ran but exited non-zero; stderr is surfaced verbatim.
    #[error("{tool} failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        stderr: String,
    },

    /// The tool exceeded its deadline and was killed.
    #[error("{tool} did not finish within {timeout_secs}s and was killed")]
    TimedOut { tool: String, timeout_secs: u64 },

    /// I/O error while supervising the tool.
    #[error("I/O error while running {tool}: {source}")]
    Io {
        tool: String,
        #[source]
        source: io::Error,
    },
}

impl ToolError {
    /// Name of the tool that failed.
    pub fn tool(&self) -> &str {
        match self {
            Self::Spawn { tool, .. }
            | Self::CommandFailed { tool, .. }
            | Self::TimedOut { tool, .. }
            | Self::Io { tool, .. } => tool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_error_displays_context() {
        let err = ToolError::CommandFailed {
            tool: "ffmpeg".to_string(),
            exit_code: 1,
            stderr: "No such filter: 'bogus'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg"));
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("No such filter"));
        assert_eq!(err.tool(), "ffmpeg");
    }
}
