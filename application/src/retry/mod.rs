//! Retry support for remote calls.
//!
//! - [`BackoffPolicy`] - exponential backoff with jitter around any async operation
//! - [`RetryingGateway`] - a [`CompletionGateway`](crate::ports::llm_gateway::CompletionGateway)
//!   decorator applying a policy to every call

mod backoff;
mod gateway;

pub use backoff::BackoffPolicy;
pub use gateway::RetryingGateway;
