// Pipeline error types
use thiserror::Error;

/// Raised only for caller contract violations. Malformed readings and bad
/// window requests are absorbed by the pipeline and never surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl PipelineError {
    pub fn invalid(message: impl Into<String>) -> Self {
        PipelineError::InvalidArgument(message.into())
    }
}
