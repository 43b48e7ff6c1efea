//! Core types for the transition pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::interp::FrameInterpolator;
use crate::media::Transcoder;
use crate::provision::AssetFetcher;

/// Progress callback type for reporting pipeline progress.
///
/// Arguments: (stage_name, percent_complete, message)
pub type ProgressCallback = Box<dyn Fn(&str, u32, &str) + Send + Sync>;

/// Read-only context passed to pipeline stages.
///
/// Contains the run configuration and the capability handles for the
/// external tools. Mutable results go in `RunState`.
pub struct Context {
    /// Immutable run configuration.
    pub config: PipelineConfig,
    /// Decode/encode engine.
    pub transcoder: Arc<dyn Transcoder>,
    /// Frame interpolation tool.
    pub interpolator: Arc<dyn FrameInterpolator>,
    /// Model archive fetcher.
    pub fetcher: Arc<dyn AssetFetcher>,
    /// Optional progress callback.
    progress_callback: Option<ProgressCallback>,
}

impl Context {
    /// Create a new context for a run.
    pub fn new(
        config: PipelineConfig,
        transcoder: Arc<dyn Transcoder>,
        interpolator: Arc<dyn FrameInterpolator>,
        fetcher: Arc<dyn AssetFetcher>,
    ) -> Self {
        Self {
            config,
            transcoder,
            interpolator,
            fetcher,
            progress_callback: None,
        }
    }

    /// Set the progress callback.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Report progress to the callback (if set).
    pub fn report_progress(&self, stage_name: &str, percent: u32, message: &str) {
        if let Some(ref callback) = self.progress_callback {
            callback(stage_name, percent, message);
        }
    }
}

/// Mutable run state that accumulates results from pipeline stages.
///
/// Each stage's output is stored in its own section; stages add new data
/// but do not overwrite records written by earlier stages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunState {
    /// When the run started.
    pub started_at: Option<String>,
    /// Provisioning results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provision: Option<ProvisionOutput>,
    /// Boundary frame extraction results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract: Option<ExtractOutput>,
    /// Interpolation results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpolate: Option<InterpolateOutput>,
    /// Assembly results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assemble: Option<AssembleOutput>,
    /// Effect application results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<EffectOutput>,
}

impl RunState {
    /// Create a new run state stamped with the current time.
    pub fn new() -> Self {
        Self {
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    /// Check if boundary frames have been extracted.
    pub fn has_boundary_frames(&self) -> bool {
        self.extract.is_some()
    }

    /// Path of the final artifact, if the effect stage completed.
    pub fn final_video(&self) -> Option<&PathBuf> {
        self.effect.as_ref().map(|e| &e.final_video)
    }
}

/// Output from the provisioning stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionOutput {
    /// Model directory that was verified or populated.
    pub model_dir: PathBuf,
    /// Whether a download was performed this run.
    pub downloaded: bool,
}

/// Output from the boundary frame extraction stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractOutput {
    /// Last frame of clip A.
    pub frame_a: PathBuf,
    /// First frame of clip B.
    pub frame_b: PathBuf,
}

/// Output from the interpolation stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpolateOutput {
    /// Directory holding the interpolated frame sequence.
    pub frames_dir: PathBuf,
    /// Number of frames the sequence must contain (2^exp).
    pub expected_frames: usize,
}

/// Output from the assembly stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembleOutput {
    /// The raw, unstyled transition clip.
    pub raw_video: PathBuf,
    /// Frame rate the sequence was encoded at.
    pub frame_rate: u32,
}

/// Output from the effect stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectOutput {
    /// The final artifact.
    pub final_video: PathBuf,
    /// Filter chain that was applied.
    pub filters: String,
}

/// Result of executing a pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Stage completed successfully.
    Success,
    /// Stage had nothing to do (not an error).
    Skipped(String),
}
