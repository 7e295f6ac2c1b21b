//! Snapshot persistence trait

use super::snapshot::ConversationSnapshot;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while writing or reading a snapshot
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PersistError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PersistError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Repository trait for conversation snapshots
///
/// Implementations store one file per snapshot inside the snapshot's own
/// `storage_location`, creating missing directories. Failures are never
/// swallowed.
pub trait SnapshotRepository: Send + Sync {
    /// Write the snapshot and return the path it was written to.
    fn save(&self, snapshot: &ConversationSnapshot) -> Result<PathBuf, PersistError>;

    /// Read a snapshot previously written by [`save`](Self::save).
    fn load(&self, path: &Path) -> Result<ConversationSnapshot, PersistError>;
}
