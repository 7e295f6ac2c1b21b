//! Core domain concepts shared across all subdomains.
//!
//! - [`task::Task`] - the job an agent specialises in
//! - [`model::FineTunedModel`] - a model produced by a fine-tuning job
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod model;
pub mod task;
