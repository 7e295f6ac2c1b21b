//! Bounded conversation history store.
//!
//! [`HistoryStore`] owns the full, append-only turn log of one session and
//! derives the bounded view sent to the model:
//!
//! ```text
//! full log:   A  B  C  D        (persisted, exported)
//! window=3:      B  C  D        (sent to the model)
//! ```
//!
//! The log lives inside the store's [`ConversationSnapshot`], so the
//! snapshot is always in sync with what has been appended.

use super::exporter::{ExportError, HistoryExporter};
use super::repository::{PersistError, SnapshotRepository};
use super::snapshot::ConversationSnapshot;
use crate::core::error::DomainError;
use crate::core::model::FineTunedModel;
use crate::session::entities::Turn;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

/// Session-scoped owner of one conversation snapshot.
///
/// Single writer: mutation goes through `&mut self`.
pub struct HistoryStore {
    snapshot: ConversationSnapshot,
    repository: Arc<dyn SnapshotRepository>,
}

impl HistoryStore {
    /// Create a store with a brand new snapshot and an empty log.
    pub fn new(
        owner_model: Option<FineTunedModel>,
        max_window: NonZeroUsize,
        storage_location: impl Into<PathBuf>,
        repository: Arc<dyn SnapshotRepository>,
    ) -> Self {
        Self {
            snapshot: ConversationSnapshot::new(owner_model, max_window, storage_location),
            repository,
        }
    }

    /// Take ownership of an existing snapshot.
    ///
    /// Id, owner model, window and storage location are preserved, and the
    /// prior turns are kept in the log so persisting again never drops them.
    pub fn adopt(snapshot: ConversationSnapshot, repository: Arc<dyn SnapshotRepository>) -> Self {
        Self {
            snapshot,
            repository,
        }
    }

    /// Reset the log to empty.
    ///
    /// Fails with [`DomainError::DuplicateContext`] when turns would be
    /// discarded and `overwrite` is false.
    pub fn create(&mut self, overwrite: bool) -> Result<(), DomainError> {
        if !self.snapshot.history.is_empty() && !overwrite {
            return Err(DomainError::DuplicateContext);
        }
        self.snapshot.history = Vec::new();
        Ok(())
    }

    /// Append a turn to the full log. The full log is never evicted.
    pub fn append(&mut self, turn: Turn) {
        self.snapshot.history.push(turn);
    }

    /// The last `max_window` turns, oldest first.
    pub fn windowed_history(&self) -> &[Turn] {
        let history = &self.snapshot.history;
        let start = history.len().saturating_sub(self.snapshot.max_window().get());
        &history[start..]
    }

    /// The full log.
    pub fn history(&self) -> &[Turn] {
        &self.snapshot.history
    }

    pub fn len(&self) -> usize {
        self.snapshot.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.history.is_empty()
    }

    /// The snapshot, including the full log.
    pub fn snapshot(&self) -> &ConversationSnapshot {
        &self.snapshot
    }

    /// Write the snapshot to its storage location.
    pub fn persist(&self) -> Result<PathBuf, PersistError> {
        self.repository.save(&self.snapshot)
    }

    /// Hand the full log to an exporter.
    pub fn export_history(&self, exporter: &dyn HistoryExporter) -> Result<(), ExportError> {
        exporter.export(&self.snapshot.history)
    }

    /// Consume the store, returning the snapshot.
    pub fn into_snapshot(self) -> ConversationSnapshot {
        self.snapshot
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}
