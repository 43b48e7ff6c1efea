//! Effect stage - applies the glitch bleach look to the raw transition.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, EffectOutput, RunState, StepOutcome};

/// Fixed filter chain, applied in order:
/// bleach bypass (high contrast, desaturated), temporal RGB noise, then an
/// unsharp mask for a harder digital look. Standard ffmpeg filters rather
/// than frei0r, for broad compatibility.
pub const GLITCH_BLEACH_FILTERS: &str =
    "eq=contrast=1.5:saturation=0.2,noise=alls=20:allf=t+u,unsharp=5:5:1.0:5:5:0.0";

/// Effect application stage.
///
/// Consumes only the raw transition; the source clips are never
/// reprocessed here.
pub struct ApplyEffectStep;

impl ApplyEffectStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ApplyEffectStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ApplyEffectStep {
    fn name(&self) -> &str {
        "Apply Effect"
    }

    fn description(&self) -> &str {
        "Apply the glitch bleach filter chain to the raw transition"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        let raw = ctx.config.transition_raw();
        if !raw.exists() {
            return Err(StepError::file_not_found(raw));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let raw = ctx.config.transition_raw();
        let final_video = ctx.config.transition_final();

        tracing::info!("Applying filter chain -> {}", final_video.display());
        ctx.transcoder
            .apply_filter_chain(&raw, GLITCH_BLEACH_FILTERS, &final_video)?;

        state.effect = Some(EffectOutput {
            final_video,
            filters: GLITCH_BLEACH_FILTERS.to_string(),
        });

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        let Some(ref output) = state.effect else {
            return Err(StepError::invalid_output("effect application not recorded"));
        };

        let metadata = std::fs::metadata(&output.final_video).map_err(|_| {
            StepError::invalid_output(format!(
                "no final video at {}",
                output.final_video.display()
            ))
        })?;

        if metadata.len() == 0 {
            return Err(StepError::invalid_output(format!(
                "final video {} is empty (0 bytes)",
                output.final_video.display()
            )));
        }

        Ok(())
    }
}
