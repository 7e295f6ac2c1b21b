//! Data preparation pipeline port

use serde::Serialize;
use thiserror::Error;

/// Errors raised while running or persisting a pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Pipeline failed: {0}")]
    Failed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A caller-defined data preparation step.
pub trait Pipeline {
    type Output: Serialize;

    fn run(&mut self) -> Result<Self::Output, PipelineError>;
}
