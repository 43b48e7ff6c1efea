//! Error types for the transition pipeline.
//!
//! Errors carry context that chains through layers:
//! Pipeline → Stage → Tool/Contract → Detail

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::media::ToolError;
use crate::provision::ProvisionError;

/// Top-level pipeline error naming the failing stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A stage failed during execution.
    #[error("transition pipeline failed at stage '{stage}': {source}")]
    StageFailed {
        stage: String,
        #[source]
        source: StepError,
    },

    /// Configuration validation failed before any stage ran.
    #[error("configuration error: {message}")]
    ValidationFailed { message: String },

    /// Failed to set up the run (create output directories).
    #[error("pipeline setup failed: {message}")]
    SetupFailed { message: String },
}

impl PipelineError {
    /// Create a stage failed error.
    pub fn stage_failed(stage: impl Into<String>, source: StepError) -> Self {
        Self::StageFailed {
            stage: stage.into(),
            source,
        }
    }

    /// Create a validation failed error.
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// Create a setup failed error.
    pub fn setup_failed(message: impl Into<String>) -> Self {
        Self::SetupFailed {
            message: message.into(),
        }
    }
}

/// Error from a pipeline stage.
#[derive(Error, Debug)]
pub enum StepError {
    /// Input validation failed.
    #[error("input validation failed: {0}")]
    InvalidInput(String),

    /// Output validation failed.
    #[error("output validation failed: {0}")]
    InvalidOutput(String),

    /// Model provisioning failed (fetch or unpack).
    #[error("model provisioning failed: {source}")]
    Provisioning {
        #[source]
        source: ProvisionError,
    },

    /// An external tool failed; captured diagnostics surface verbatim.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// The interpolated frame sequence does not match the naming contract
    /// the assembler expects.
    #[error("frame sequence contract mismatch (expected pattern '{pattern}'): {detail}")]
    ContractMismatch { pattern: String, detail: String },

    /// File I/O error.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },

    /// A required file was not found.
    #[error("required file not found: {path}")]
    FileNotFound { path: PathBuf },
}

impl StepError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an invalid output error.
    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }

    /// Create a contract mismatch error.
    pub fn contract_mismatch(pattern: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::ContractMismatch {
            pattern: pattern.into(),
            detail: detail.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}

impl From<ProvisionError> for StepError {
    fn from(source: ProvisionError) -> Self {
        Self::Provisioning { source }
    }
}

/// Result type for stage operations.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
