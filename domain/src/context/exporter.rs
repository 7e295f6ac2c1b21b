//! Pluggable export of a conversation log

use crate::session::entities::Turn;
use thiserror::Error;

/// Errors raised by a [`HistoryExporter`]
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Export I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Export failed: {0}")]
    Other(String),
}

/// Receives the full turn log of a session when it closes.
///
/// Any `Fn(&[Turn]) -> Result<(), ExportError>` closure is an exporter.
pub trait HistoryExporter: Send + Sync {
    fn export(&self, history: &[Turn]) -> Result<(), ExportError>;
}

impl<F> HistoryExporter for F
where
    F: Fn(&[Turn]) -> Result<(), ExportError> + Send + Sync,
{
    fn export(&self, history: &[Turn]) -> Result<(), ExportError> {
        self(history)
    }
}
