//! JSON file repository for conversation snapshots.
//!
//! Each snapshot is written as pretty-printed JSON to
//! `<storage_location>/context_<id>.json`:
//!
//! ```text
//! data/contexts/
//! ├── context_context-1b4e….json
//! └── context_context-9f02….json
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tuned_domain::{ConversationSnapshot, PersistError, SnapshotRepository};

/// Stores snapshots as individual JSON files in their own storage location.
///
/// Stateless: the directory comes from each snapshot, so one repository
/// serves any number of sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSnapshotRepository;

impl JsonSnapshotRepository {
    pub fn new() -> Self {
        Self
    }

    /// Snapshot files directly inside `dir`, sorted by name.
    pub fn list(&self, dir: &Path) -> Result<Vec<PathBuf>, PersistError> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| PersistError::io(dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("context_") && n.ends_with(".json"))
            })
            .collect();
        files.sort();
        Ok(files)
    }
}

impl SnapshotRepository for JsonSnapshotRepository {
    fn save(&self, snapshot: &ConversationSnapshot) -> Result<PathBuf, PersistError> {
        let dir = snapshot.storage_location();
        fs::create_dir_all(dir).map_err(|e| PersistError::io(dir, e))?;

        let path = dir.join(snapshot.file_name());
        let content = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, content).map_err(|e| PersistError::io(&path, e))?;

        debug!("Wrote snapshot {} to {}", snapshot.id(), path.display());
        Ok(path)
    }

    fn load(&self, path: &Path) -> Result<ConversationSnapshot, PersistError> {
        let content = fs::read_to_string(path).map_err(|e| PersistError::io(path, e))?;
        let snapshot = serde_json::from_str(&content)?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;
    use std::sync::Arc;
    use tuned_domain::{FineTunedModel, HistoryStore, Task, Turn};

    fn store(dir: &Path) -> HistoryStore {
        let task = Task::new("Long backstory", "Short backstory", "Role", "Goal");
        HistoryStore::new(
            Some(FineTunedModel::new("ft:model", task)),
            NonZeroUsize::new(3).unwrap(),
            dir,
            Arc::new(JsonSnapshotRepository::new()),
        )
    }

    #[test]
    fn test_save_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data").join("contexts");
        let mut store = store(&nested);
        store.append(Turn::user("hi"));

        let path = store.persist().unwrap();

        assert_eq!(path, nested.join(store.snapshot().file_name()));
        assert!(path.exists());
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["id"], store.snapshot().id());
        assert_eq!(json["history"][0]["role"], "user");
        assert_eq!(json["history"][0]["content"], "hi");
        assert_eq!(json["max_window"], 3);
    }

    #[test]
    fn test_load_roundtrip_keeps_identity_and_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        for content in ["A", "B", "C", "D"] {
            store.append(Turn::user(content));
        }
        store.append(Turn::assistant("E"));

        let path = store.persist().unwrap();
        let loaded = JsonSnapshotRepository::new().load(&path).unwrap();

        assert_eq!(&loaded, store.snapshot());
        assert_eq!(loaded.history().len(), 5);
    }

    #[test]
    fn test_persist_twice_overwrites_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        store.persist().unwrap();
        store.append(Turn::user("later"));
        store.persist().unwrap();

        let files = JsonSnapshotRepository::new().list(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        let loaded = JsonSnapshotRepository::new().load(&files[0]).unwrap();
        assert_eq!(loaded.history(), &[Turn::user("later")]);
    }

    #[test]
    fn test_save_into_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let err = store(&blocker).persist().unwrap_err();
        assert!(matches!(err, PersistError::Io { .. }));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonSnapshotRepository::new()
            .load(&dir.path().join("context_missing.json"))
            .unwrap_err();
        assert!(matches!(err, PersistError::Io { .. }));
    }
}
