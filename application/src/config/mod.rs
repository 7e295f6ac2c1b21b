//! Application-level configuration.
//!
//! - [`ContextParams`] - snapshot directory and history window
//!
//! Retry behaviour is configured with [`BackoffPolicy`](crate::retry::BackoffPolicy).

pub mod context_params;

pub use context_params::ContextParams;
