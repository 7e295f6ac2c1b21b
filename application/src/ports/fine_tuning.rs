//! Fine-tuning gateway port

use super::llm_gateway::GatewayError;
use async_trait::async_trait;
use std::path::Path;
use tuned_domain::FineTuningJob;

/// Gateway for the provider's file and fine-tuning job APIs
#[async_trait]
pub trait FineTuningGateway: Send + Sync {
    /// Upload a JSONL training file and return its provider file id.
    async fn upload_training_file(&self, path: &Path) -> Result<String, GatewayError>;

    /// Start a fine-tuning job on an uploaded file.
    async fn create_job(
        &self,
        training_file_id: &str,
        base_model: &str,
    ) -> Result<FineTuningJob, GatewayError>;

    /// Fetch the current state of a job.
    async fn retrieve_job(&self, job_id: &str) -> Result<FineTuningJob, GatewayError>;
}
