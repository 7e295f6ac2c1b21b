//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed construction input. Not recoverable without fixing the input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// `create()` was called on a history that already holds turns.
    #[error("A history already exists for this context; pass overwrite = true to discard it")]
    DuplicateContext,
}

impl DomainError {
    /// Shorthand for a [`DomainError::Validation`] with a message.
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    /// Check if this error was raised by input validation
    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }
}
