//! Durable conversation record

use crate::core::model::FineTunedModel;
use crate::session::entities::Turn;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Prefix of every generated snapshot id
pub const CONTEXT_ID_PREFIX: &str = "context-";

/// Full durable record of one conversation session (Entity)
///
/// The id is assigned once in [`ConversationSnapshot::new`] and survives
/// serialization, so a snapshot loaded from disk keeps its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSnapshot {
    id: String,
    owner_model: Option<FineTunedModel>,
    pub(crate) history: Vec<Turn>,
    max_window: NonZeroUsize,
    storage_location: PathBuf,
}

impl ConversationSnapshot {
    /// Create an empty snapshot with a freshly generated id.
    pub fn new(
        owner_model: Option<FineTunedModel>,
        max_window: NonZeroUsize,
        storage_location: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: format!("{}{}", CONTEXT_ID_PREFIX, uuid::Uuid::new_v4()),
            owner_model,
            history: Vec::new(),
            max_window,
            storage_location: storage_location.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner_model(&self) -> Option<&FineTunedModel> {
        self.owner_model.as_ref()
    }

    /// The full turn log, never windowed.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn max_window(&self) -> NonZeroUsize {
        self.max_window
    }

    pub fn storage_location(&self) -> &Path {
        &self.storage_location
    }

    /// File name this snapshot is persisted under.
    pub fn file_name(&self) -> String {
        snapshot_file_name(&self.id)
    }
}

/// Deterministic file name for a snapshot id.
pub fn snapshot_file_name(id: &str) -> String {
    format!("context_{}.json", id)
}
