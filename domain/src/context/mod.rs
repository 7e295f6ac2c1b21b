//! Conversation context management
//!
//! # Key Types
//!
//! - [`ConversationSnapshot`] - Durable record of one session
//! - [`HistoryStore`] - Append-only log with a bounded view for the model
//! - [`SnapshotRepository`] - Where snapshots are written on session close
//! - [`HistoryExporter`] - Caller-supplied sink for the full log
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//! use std::path::{Path, PathBuf};
//! use std::sync::Arc;
//! use tuned_domain::context::{
//!     ConversationSnapshot, HistoryStore, PersistError, SnapshotRepository,
//! };
//! use tuned_domain::Turn;
//!
//! struct Discard;
//!
//! impl SnapshotRepository for Discard {
//!     fn save(&self, s: &ConversationSnapshot) -> Result<PathBuf, PersistError> {
//!         Ok(s.storage_location().join(s.file_name()))
//!     }
//!     fn load(&self, p: &Path) -> Result<ConversationSnapshot, PersistError> {
//!         Err(PersistError::io(p, std::io::ErrorKind::NotFound.into()))
//!     }
//! }
//!
//! let mut store = HistoryStore::new(None, NonZeroUsize::new(3).unwrap(), "data", Arc::new(Discard));
//! for c in ["A", "B", "C", "D"] {
//!     store.append(Turn::user(c));
//! }
//! assert_eq!(store.windowed_history().len(), 3);
//! assert_eq!(store.snapshot().history().len(), 4);
//! ```

pub mod exporter;
pub mod history;
pub mod repository;
pub mod snapshot;

pub use exporter::{ExportError, HistoryExporter};
pub use history::HistoryStore;
pub use repository::{PersistError, SnapshotRepository};
pub use snapshot::{CONTEXT_ID_PREFIX, ConversationSnapshot, snapshot_file_name};
