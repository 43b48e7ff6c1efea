//! Assemble stage - encodes the interpolated frames into the raw clip.

use std::path::Path;

use crate::media::{validate_frame_sequence, FRAME_PATTERN};
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{AssembleOutput, Context, RunState, StepOutcome};

/// Constant frame rate of the assembled transition.
pub const TRANSITION_FRAME_RATE: u32 = 30;

/// Sequence assembly stage.
///
/// Validates the frame-naming contract before invoking the encoder: a
/// mismatched sequence is reported as a contract violation instead of
/// letting ffmpeg quietly produce an empty video.
pub struct AssembleClipStep;

impl AssembleClipStep {
    pub fn new() -> Self {
        Self
    }

    fn verify_video(path: &Path) -> StepResult<()> {
        let metadata = std::fs::metadata(path).map_err(|_| {
            StepError::invalid_output(format!("encoder produced no file at {}", path.display()))
        })?;

        if metadata.len() == 0 {
            return Err(StepError::invalid_output(format!(
                "encoded video {} is empty (0 bytes)",
                path.display()
            )));
        }

        Ok(())
    }
}

impl Default for AssembleClipStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for AssembleClipStep {
    fn name(&self) -> &str {
        "Assemble Clip"
    }

    fn description(&self) -> &str {
        "Encode the frame sequence into the raw transition clip"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        let frames_dir = ctx.config.frames_dir();
        validate_frame_sequence(&frames_dir, ctx.config.expected_frame_count())
            .map_err(|e| StepError::contract_mismatch(FRAME_PATTERN, e.to_string()))
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let pattern = ctx.config.frames_dir().join(FRAME_PATTERN);
        let raw_video = ctx.config.transition_raw();

        tracing::info!(
            "Encoding {} frames at {} fps -> {}",
            ctx.config.expected_frame_count(),
            TRANSITION_FRAME_RATE,
            raw_video.display()
        );

        ctx.transcoder
            .encode_frame_sequence(&pattern, TRANSITION_FRAME_RATE, &raw_video)?;

        state.assemble = Some(AssembleOutput {
            raw_video,
            frame_rate: TRANSITION_FRAME_RATE,
        });

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        let Some(ref output) = state.assemble else {
            return Err(StepError::invalid_output("assembly not recorded"));
        };

        Self::verify_video(&output.raw_video)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::test_support::test_context_with_dirs;

    #[test]
    fn assemble_step_has_correct_name() {
        let step = AssembleClipStep::new();
        assert_eq!(step.name(), "Assemble Clip");
    }

    #[test]
    fn mismatched_sequence_is_contract_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context_with_dirs(dir.path());
        let frames_dir = ctx.config.frames_dir();
        std::fs::create_dir_all(&frames_dir).unwrap();
        std::fs::write(frames_dir.join("frame_0001.png"), b"png").unwrap();

        let err = AssembleClipStep::new().validate_input(&ctx).unwrap_err();
        assert!(matches!(err, StepError::ContractMismatch { .. }));
    }

    #[test]
    fn complete_sequence_passes_validation() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context_with_dirs(dir.path());
        let frames_dir = ctx.config.frames_dir();
        std::fs::create_dir_all(&frames_dir).unwrap();
        for i in 0..ctx.config.expected_frame_count() {
            std::fs::write(frames_dir.join(format!("img{i}.png")), b"png").unwrap();
        }

        assert!(AssembleClipStep::new().validate_input(&ctx).is_ok());
    }
}
