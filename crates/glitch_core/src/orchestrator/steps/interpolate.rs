//! Interpolate stage - synthesizes intermediate frames with RIFE.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, InterpolateOutput, RunState, StepOutcome};

/// Frame interpolation stage.
///
/// Hands the two boundary frames to the external inference tool, which
/// writes `2^exp` frames into the sequence directory. The naming contract
/// of that output is validated by the assemble stage, right before it
/// would matter.
pub struct InterpolateStep;

impl InterpolateStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InterpolateStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for InterpolateStep {
    fn name(&self) -> &str {
        "Interpolate"
    }

    fn description(&self) -> &str {
        "Synthesize intermediate frames between the boundary frames"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        for frame in [ctx.config.boundary_frame_a(), ctx.config.boundary_frame_b()] {
            if !frame.exists() {
                return Err(StepError::file_not_found(frame));
            }
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let frames_dir = ctx.config.frames_dir();
        std::fs::create_dir_all(&frames_dir)
            .map_err(|e| StepError::io("creating frame sequence directory", e))?;

        ctx.interpolator.interpolate(
            &ctx.config.boundary_frame_a(),
            &ctx.config.boundary_frame_b(),
            ctx.config.exp,
            &frames_dir,
        )?;

        state.interpolate = Some(InterpolateOutput {
            frames_dir,
            expected_frames: ctx.config.expected_frame_count(),
        });

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        let Some(ref output) = state.interpolate else {
            return Err(StepError::invalid_output("interpolation not recorded"));
        };

        if !output.frames_dir.is_dir() {
            return Err(StepError::invalid_output(format!(
                "frame sequence directory {} does not exist",
                output.frames_dir.display()
            )));
        }

        Ok(())
    }
}
