//! Fine-tuning job tracking.
//!
//! The lifecycle is `upload` → `start` → `status`/`wait_until_finished` →
//! `model`. Each step needs the previous one; calling out of order returns
//! [`FineTuningError::NotUploaded`] or [`FineTuningError::NotStarted`].

use crate::ports::fine_tuning::FineTuningGateway;
use crate::ports::llm_gateway::GatewayError;
use crate::retry::BackoffPolicy;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tuned_domain::{DomainError, FineTunedModel, FineTuningJob, JobStatus, Task};

/// Largest training file the provider accepts.
pub const MAX_TRAINING_FILE_BYTES: u64 = 512_000_000;

/// Errors raised while driving a fine-tuning job
#[derive(Error, Debug)]
pub enum FineTuningError {
    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("No training file has been uploaded yet")]
    NotUploaded,

    #[error("No fine-tuning job has been started yet")]
    NotStarted,

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// One fine-tuning run of `base_model` on a training file.
pub struct FineTuning {
    gateway: Arc<dyn FineTuningGateway>,
    train_file: PathBuf,
    task: Task,
    base_model: String,
    file_id: Option<String>,
    job_id: Option<String>,
    job_status: Option<JobStatus>,
    model: Option<FineTunedModel>,
}

impl FineTuning {
    /// Validate the training file and prepare a run.
    pub fn new(
        gateway: Arc<dyn FineTuningGateway>,
        train_file: impl Into<PathBuf>,
        task: Task,
    ) -> Result<Self, FineTuningError> {
        let train_file = train_file.into();
        validate_training_file(&train_file)?;

        Ok(Self {
            gateway,
            train_file,
            task,
            base_model: tuned_domain::core::model::DEFAULT_BASE_MODEL.to_string(),
            file_id: None,
            job_id: None,
            job_status: None,
            model: None,
        })
    }

    pub fn with_base_model(mut self, base_model: impl Into<String>) -> Self {
        self.base_model = base_model.into();
        self
    }

    pub fn train_file(&self) -> &Path {
        &self.train_file
    }

    pub fn base_model(&self) -> &str {
        &self.base_model
    }

    pub fn file_id(&self) -> Option<&str> {
        self.file_id.as_deref()
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    /// Resume tracking a job started elsewhere.
    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    /// Upload the training file.
    pub async fn upload(&mut self) -> Result<&str, FineTuningError> {
        let file_id = self
            .gateway
            .upload_training_file(&self.train_file)
            .await?;
        info!(
            "Uploaded {} as {}",
            self.train_file.display(),
            file_id
        );
        Ok(self.file_id.insert(file_id).as_str())
    }

    /// Start the job on the uploaded file.
    pub async fn start(&mut self) -> Result<&str, FineTuningError> {
        let file_id = self.file_id.as_deref().ok_or(FineTuningError::NotUploaded)?;
        let job = self.gateway.create_job(file_id, &self.base_model).await?;
        info!(
            "Fine-tuning started: {} ({} on {})",
            job.id, self.base_model, file_id
        );
        self.record(&job);
        Ok(self.job_id.insert(job.id).as_str())
    }

    /// Current job status.
    ///
    /// Once the job has succeeded the cached status is returned without
    /// asking the provider again.
    pub async fn status(&mut self) -> Result<JobStatus, FineTuningError> {
        self.refresh(&BackoffPolicy::no_retry()).await
    }

    /// The fine-tuned model, once the provider has produced one.
    pub async fn model(&mut self) -> Result<Option<FineTunedModel>, FineTuningError> {
        if self.model.is_none() {
            self.refresh(&BackoffPolicy::no_retry()).await?;
        }
        Ok(self.model.clone())
    }

    /// Poll every `poll_interval` until the job reaches a terminal status.
    ///
    /// Each poll is retried according to `policy`.
    pub async fn wait_until_finished(
        &mut self,
        poll_interval: Duration,
        policy: &BackoffPolicy,
    ) -> Result<JobStatus, FineTuningError> {
        loop {
            let status = self.refresh(policy).await?;
            if status.is_terminal() {
                info!("Fine-tuning finished with status {}", status);
                return Ok(status);
            }
            debug!(
                "Fine-tuning is {}, checking again in {:?}",
                status, poll_interval
            );
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Like [`wait_until_finished`](Self::wait_until_finished), but stops
    /// with `Ok(None)` once `token` is cancelled. The provider job keeps
    /// running.
    pub async fn wait_until_cancelled(
        &mut self,
        poll_interval: Duration,
        policy: &BackoffPolicy,
        token: &CancellationToken,
    ) -> Result<Option<JobStatus>, FineTuningError> {
        loop {
            let status = if self.job_status == Some(JobStatus::Succeeded) && self.model.is_some()
            {
                JobStatus::Succeeded
            } else {
                let job_id = self.job_id.as_deref().ok_or(FineTuningError::NotStarted)?;
                let gateway = &self.gateway;
                let Some(result) = policy
                    .run_until_cancelled(move || gateway.retrieve_job(job_id), token)
                    .await
                else {
                    info!("Stopped waiting for fine-tuning job {}", job_id);
                    return Ok(None);
                };
                let job = result?;
                self.record(&job);
                job.status
            };

            if status.is_terminal() {
                info!("Fine-tuning finished with status {}", status);
                return Ok(Some(status));
            }
            debug!(
                "Fine-tuning is {}, checking again in {:?}",
                status, poll_interval
            );
            tokio::select! {
                _ = token.cancelled() => {
                    info!("Stopped waiting for fine-tuning job");
                    return Ok(None);
                }
                _ = tokio::time::sleep(poll_interval) => {}
            }
        }
    }

    async fn refresh(&mut self, policy: &BackoffPolicy) -> Result<JobStatus, FineTuningError> {
        if self.job_status == Some(JobStatus::Succeeded) && self.model.is_some() {
            return Ok(JobStatus::Succeeded);
        }

        let job_id = self.job_id.as_deref().ok_or(FineTuningError::NotStarted)?;
        let gateway = &self.gateway;
        let job = policy.run(move || gateway.retrieve_job(job_id)).await?;
        self.record(&job);
        Ok(job.status)
    }

    fn record(&mut self, job: &FineTuningJob) {
        self.job_status = Some(job.status);
        if self.model.is_none() {
            if let Some(name) = &job.fine_tuned_model {
                debug!("Job {} produced model {}", job.id, name);
                self.model = Some(
                    FineTunedModel::new(name.clone(), self.task.clone())
                        .with_base_model(self.base_model.clone()),
                );
            }
        }
    }
}

impl std::fmt::Debug for FineTuning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FineTuning")
            .field("train_file", &self.train_file)
            .field("base_model", &self.base_model)
            .field("file_id", &self.file_id)
            .field("job_id", &self.job_id)
            .field("job_status", &self.job_status)
            .finish_non_exhaustive()
    }
}

fn validate_training_file(path: &Path) -> Result<(), DomainError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        DomainError::validation(format!(
            "cannot read training file {}: {}",
            path.display(),
            e
        ))
    })?;

    if metadata.len() > MAX_TRAINING_FILE_BYTES {
        return Err(DomainError::validation(format!(
            "training file must be at most 512MB, got {:.1}MB",
            metadata.len() as f64 / 1_000_000.0
        )));
    }
    Ok(())
}
