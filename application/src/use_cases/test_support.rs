//! Mocks shared by the use case tests

use crate::ports::llm_gateway::{
    CompletionGateway, CompletionRequest, CompletionResponse, GatewayError,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tuned_domain::{ConversationSnapshot, PersistError, SnapshotRepository, Task};

pub(crate) fn valid_task() -> Task {
    Task::new("Long backstory", "Short backstory", "Test role", "Test goal")
}

/// Replays scripted results, then falls back to a fixed reply if one is set.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    script: Mutex<VecDeque<Result<CompletionResponse, GatewayError>>>,
    fallback: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedGateway {
    pub(crate) fn new(script: Vec<Result<CompletionResponse, GatewayError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Default::default()
        }
    }

    pub(crate) fn always(text: &str) -> Self {
        Self {
            fallback: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, GatewayError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };

        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        match &self.fallback {
            Some(text) => Ok(CompletionResponse::from_text(format!("cmpl-{}", call), text)),
            None => Err(GatewayError::Other("no scripted response left".to_string())),
        }
    }
}

/// Writes snapshots as JSON files, like the real repository.
pub(crate) struct DirRepository;

impl SnapshotRepository for DirRepository {
    fn save(&self, snapshot: &ConversationSnapshot) -> Result<PathBuf, PersistError> {
        let dir = snapshot.storage_location();
        std::fs::create_dir_all(dir).map_err(|e| PersistError::io(dir, e))?;
        let path = dir.join(snapshot.file_name());
        let json = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&path, json).map_err(|e| PersistError::io(&path, e))?;
        Ok(path)
    }

    fn load(&self, path: &Path) -> Result<ConversationSnapshot, PersistError> {
        let json = std::fs::read_to_string(path).map_err(|e| PersistError::io(path, e))?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Every save fails.
pub(crate) struct BrokenRepository;

impl SnapshotRepository for BrokenRepository {
    fn save(&self, snapshot: &ConversationSnapshot) -> Result<PathBuf, PersistError> {
        Err(PersistError::io(
            snapshot.storage_location(),
            std::io::ErrorKind::PermissionDenied.into(),
        ))
    }

    fn load(&self, path: &Path) -> Result<ConversationSnapshot, PersistError> {
        Err(PersistError::io(path, std::io::ErrorKind::NotFound.into()))
    }
}

/// Number of entries in `dir`; a missing directory counts as empty.
pub(crate) fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
