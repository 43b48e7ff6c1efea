//! Pipeline runner that executes stages in sequence.

use super::errors::{PipelineError, PipelineResult};
use super::step::PipelineStep;
use super::types::{Context, RunState, StepOutcome};

/// Pipeline that runs a sequence of stages.
///
/// Stages execute strictly in order, with validation before and after each
/// one. The first error aborts the run; partial artifacts from completed
/// stages are deliberately left on disk for inspection.
pub struct Pipeline {
    steps: Vec<Box<dyn PipelineStep>>,
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a stage (builder pattern).
    pub fn with_step<S: PipelineStep + 'static>(mut self, step: S) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Run the pipeline with the given context and state.
    ///
    /// Executes each stage in order:
    /// 1. Run `validate_input`
    /// 2. Run `execute`
    /// 3. Run `validate_output` (if execute returned Success)
    ///
    /// Returns which stages ran on success, or a `PipelineError` naming the
    /// failing stage.
    pub fn run(&self, ctx: &Context, state: &mut RunState) -> PipelineResult<PipelineRunResult> {
        let mut result = PipelineRunResult {
            steps_completed: Vec::new(),
            steps_skipped: Vec::new(),
        };

        let total_steps = self.steps.len();

        for (i, step) in self.steps.iter().enumerate() {
            let step_name = step.name();
            tracing::info!("--- {} ---", step_name);

            let percent = ((i as f64 / total_steps as f64) * 100.0) as u32;
            ctx.report_progress(step_name, percent, step.description());

            if let Err(e) = step.validate_input(ctx) {
                tracing::error!("{}: input validation failed: {}", step_name, e);
                return Err(PipelineError::stage_failed(step_name, e));
            }

            let outcome = step.execute(ctx, state).map_err(|e| {
                tracing::error!("{}: execution failed: {}", step_name, e);
                PipelineError::stage_failed(step_name, e)
            })?;

            match outcome {
                StepOutcome::Success => {
                    if let Err(e) = step.validate_output(ctx, state) {
                        tracing::error!("{}: output validation failed: {}", step_name, e);
                        return Err(PipelineError::stage_failed(step_name, e));
                    }

                    tracing::info!("{} completed", step_name);
                    result.steps_completed.push(step_name.to_string());
                }
                StepOutcome::Skipped(reason) => {
                    tracing::info!("{} skipped: {}", step_name, reason);
                    result.steps_skipped.push(step_name.to_string());
                }
            }
        }

        ctx.report_progress("Complete", 100, "Pipeline finished");
        tracing::info!("Pipeline completed successfully");

        Ok(result)
    }

    /// Get the number of stages in the pipeline.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Get stage names in order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRunResult {
    /// Stages that completed successfully.
    pub steps_completed: Vec<String>,
    /// Stages that were skipped.
    pub steps_skipped: Vec<String>,
}

impl PipelineRunResult {
    /// Total number of stages that ran.
    pub fn total_steps(&self) -> usize {
        self.steps_completed.len() + self.steps_skipped.len()
    }
}
