//! Pipeline orchestration.
//!
//! Sequences the five transition stages, validates the configuration
//! before any stage runs, and enforces fail-fast abort semantics: the
//! first error terminates the run and partial artifacts stay on disk.

pub mod errors;
pub mod pipeline;
pub mod step;
pub mod steps;
pub mod types;

pub use errors::{PipelineError, PipelineResult, StepError, StepResult};
pub use pipeline::{Pipeline, PipelineRunResult};
pub use step::PipelineStep;
pub use types::{Context, ProgressCallback, RunState, StepOutcome};

use self::steps::{
    ApplyEffectStep, AssembleClipStep, ExtractFramesStep, InterpolateStep, ProvisionModelStep,
};

/// Build the standard five-stage transition pipeline.
pub fn standard_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(ProvisionModelStep::new())
        .with_step(ExtractFramesStep::new())
        .with_step(InterpolateStep::new())
        .with_step(AssembleClipStep::new())
        .with_step(ApplyEffectStep::new())
}

/// Validate the configuration before any stage runs.
///
/// Missing input clips are rejected here so a misconfigured run performs
/// zero subprocess and network invocations.
pub fn validate_config(ctx: &Context) -> PipelineResult<()> {
    let mut missing = Vec::new();
    for clip in [ctx.config.clip_a_path(), ctx.config.clip_b_path()] {
        if !clip.exists() {
            missing.push(clip.display().to_string());
        }
    }

    if !missing.is_empty() {
        return Err(PipelineError::validation_failed(format!(
            "input clip(s) not found in {}: {}",
            ctx.config.input_dir.display(),
            missing.join(", ")
        )));
    }

    Ok(())
}

/// Run the full transition pipeline for the given context.
///
/// Validates the configuration, creates the output directory, then runs
/// all five stages. Returns the accumulated run state on success.
pub fn run_transition_pipeline(ctx: &Context) -> PipelineResult<RunState> {
    validate_config(ctx)?;

    std::fs::create_dir_all(&ctx.config.output_dir).map_err(|e| {
        PipelineError::setup_failed(format!(
            "cannot create output directory {}: {}",
            ctx.config.output_dir.display(),
            e
        ))
    })?;

    let mut state = RunState::new();
    standard_pipeline().run(ctx, &mut state)?;
    Ok(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    //! No-op capability fakes for unit tests of individual stages.

    use std::path::Path;
    use std::sync::Arc;

    use crate::config::PipelineConfig;
    use crate::interp::FrameInterpolator;
    use crate::media::{ClipEdge, ToolError, Transcoder};
    use crate::provision::{AssetFetcher, ProvisionError};

    use super::Context;

    struct NoopTranscoder;

    impl Transcoder for NoopTranscoder {
        fn extract_boundary_frame(
            &self,
            _clip: &Path,
            _edge: ClipEdge,
            image_out: &Path,
        ) -> Result<(), ToolError> {
            std::fs::write(image_out, b"png").unwrap();
            Ok(())
        }

        fn encode_frame_sequence(
            &self,
            _pattern: &Path,
            _frame_rate: u32,
            video_out: &Path,
        ) -> Result<(), ToolError> {
            std::fs::write(video_out, b"mp4").unwrap();
            Ok(())
        }

        fn apply_filter_chain(
            &self,
            _video_in: &Path,
            _filters: &str,
            video_out: &Path,
        ) -> Result<(), ToolError> {
            std::fs::write(video_out, b"mp4").unwrap();
            Ok(())
        }
    }

    struct NoopInterpolator;

    impl FrameInterpolator for NoopInterpolator {
        fn interpolate(
            &self,
            _frame_a: &Path,
            _frame_b: &Path,
            _exp: u32,
            _frames_dir: &Path,
        ) -> Result<(), ToolError> {
            Ok(())
        }
    }

    struct NoopFetcher;

    impl AssetFetcher for NoopFetcher {
        fn fetch(&self, _url: &str, _dest: &Path) -> Result<(), ProvisionError> {
            Ok(())
        }
    }

    /// Context over paths that are never touched.
    pub fn test_context() -> Context {
        let config =
            PipelineConfig::new("/nonexistent/in", "/nonexistent/out", "/nonexistent/rife",
                "videoA.mp4", "videoB.mp4", 2)
            .unwrap();
        context_for(config)
    }

    /// Context rooted at a temp directory, with input/output/model subdirs
    /// created.
    pub fn test_context_with_dirs(root: &Path) -> Context {
        let input = root.join("input");
        let output = root.join("output");
        let model = root.join("rife");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::create_dir_all(&output).unwrap();
        std::fs::create_dir_all(&model).unwrap();

        let config =
            PipelineConfig::new(input, output, model, "videoA.mp4", "videoB.mp4", 2).unwrap();
        context_for(config)
    }

    fn context_for(config: PipelineConfig) -> Context {
        Context::new(
            config,
            Arc::new(NoopTranscoder),
            Arc::new(NoopInterpolator),
            Arc::new(NoopFetcher),
        )
    }
}
