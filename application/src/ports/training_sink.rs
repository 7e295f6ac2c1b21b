//! Port for delivering generated training data.

use async_trait::async_trait;
use thiserror::Error;
use tuned_domain::TrainingExample;

/// Errors raised while delivering training examples
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Receives one batch of generated examples.
#[async_trait]
pub trait TrainingSink: Send + Sync {
    async fn send(&self, examples: &[TrainingExample]) -> Result<(), SinkError>;
}
