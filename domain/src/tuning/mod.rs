//! Fine-tuning domain.
//!
//! - [`entities::FineTuningJob`] / [`entities::JobStatus`] - provider job state
//! - [`entities::TrainingExample`] - one chat-formatted training sample
//! - [`entities::DataDict`] - output envelope of a preparation pipeline

pub mod entities;
