//! Extract stage - pulls the two boundary frames from the source clips.
//!
//! The last frame of clip A and the first frame of clip B become the
//! interpolation endpoints. Missing source clips are a configuration
//! error caught before the decoder is invoked.

use std::path::Path;

use crate::media::ClipEdge;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, ExtractOutput, RunState, StepOutcome};

/// Boundary frame extraction stage.
pub struct ExtractFramesStep;

impl ExtractFramesStep {
    pub fn new() -> Self {
        Self
    }

    /// Verify an extracted frame exists and is non-empty.
    fn verify_frame(path: &Path) -> StepResult<()> {
        let metadata = std::fs::metadata(path).map_err(|_| {
            StepError::invalid_output(format!(
                "extraction produced no frame at {}",
                path.display()
            ))
        })?;

        if metadata.len() == 0 {
            return Err(StepError::invalid_output(format!(
                "extracted frame {} is empty (0 bytes)",
                path.display()
            )));
        }

        Ok(())
    }
}

impl Default for ExtractFramesStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ExtractFramesStep {
    fn name(&self) -> &str {
        "Extract Frames"
    }

    fn description(&self) -> &str {
        "Extract the boundary frames of both source clips"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        let mut missing = Vec::new();
        for clip in [ctx.config.clip_a_path(), ctx.config.clip_b_path()] {
            if !clip.exists() {
                missing.push(clip.display().to_string());
            }
        }

        if !missing.is_empty() {
            return Err(StepError::invalid_input(format!(
                "input clip(s) not found: {}",
                missing.join(", ")
            )));
        }

        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let frame_a = ctx.config.boundary_frame_a();
        let frame_b = ctx.config.boundary_frame_b();

        tracing::info!(
            "Extracting last frame of {} -> {}",
            ctx.config.clip_a,
            frame_a.display()
        );
        ctx.transcoder
            .extract_boundary_frame(&ctx.config.clip_a_path(), ClipEdge::LastFrame, &frame_a)?;

        tracing::info!(
            "Extracting first frame of {} -> {}",
            ctx.config.clip_b,
            frame_b.display()
        );
        ctx.transcoder
            .extract_boundary_frame(&ctx.config.clip_b_path(), ClipEdge::FirstFrame, &frame_b)?;

        state.extract = Some(ExtractOutput { frame_a, frame_b });

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        let Some(ref output) = state.extract else {
            return Err(StepError::invalid_output("extraction not recorded"));
        };

        Self::verify_frame(&output.frame_a)?;
        Self::verify_frame(&output.frame_b)?;

        Ok(())
    }
}
