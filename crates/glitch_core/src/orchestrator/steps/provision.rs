//! Provision stage - ensures the RIFE model is available locally.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, ProvisionOutput, RunState, StepOutcome};
use crate::provision::{ensure_model, model_present, TRAIN_LOG_DIR};

/// Provision stage.
///
/// Checks the model cache and downloads the packaged model archive on first
/// use. Reports `Skipped` when the cache is already populated, which is
/// what makes the no-network idempotence observable to the orchestrator.
pub struct ProvisionModelStep;

impl ProvisionModelStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProvisionModelStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ProvisionModelStep {
    fn name(&self) -> &str {
        "Provision Model"
    }

    fn description(&self) -> &str {
        "Ensure the RIFE model asset exists locally"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        // The model directory may not exist yet; provisioning creates it.
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let model_dir = &ctx.config.model_dir;
        let downloaded = ensure_model(model_dir, ctx.fetcher.as_ref()).map_err(StepError::from)?;

        state.provision = Some(ProvisionOutput {
            model_dir: model_dir.clone(),
            downloaded,
        });

        if downloaded {
            Ok(StepOutcome::Success)
        } else {
            Ok(StepOutcome::Skipped("model already present".to_string()))
        }
    }

    fn validate_output(&self, ctx: &Context, state: &RunState) -> StepResult<()> {
        if state.provision.is_none() {
            return Err(StepError::invalid_output("provisioning not recorded"));
        }
        if !model_present(&ctx.config.model_dir) {
            return Err(StepError::invalid_output(format!(
                "no model files in {}",
                ctx.config.model_dir.join(TRAIN_LOG_DIR).display()
            )));
        }
        Ok(())
    }
}
