//! Scoped conversation sessions.
//!
//! An [`AgentManager`] is entered once to produce an [`ActiveSession`].
//! The session ends in exactly one of two ways:
//!
//! - [`ActiveSession::finish`] persists the snapshot, then exports the
//!   full history if an exporter is configured
//! - [`ActiveSession::abandon`] (or dropping the session) writes nothing
//!
//! [`AgentManager::run`] wraps both: the body's `Ok` finishes the session,
//! its `Err` abandons it and is returned unchanged.

use super::agent::{Agent, AgentError, PromptResponse};
use crate::config::ContextParams;
use futures::future::BoxFuture;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use tuned_domain::{
    ConversationSnapshot, DomainError, ExportError, HistoryExporter, HistoryStore, PersistError,
    SnapshotRepository, Turn,
};

/// Errors that can occur during a session
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Failed to persist context: {0}")]
    Persist(#[from] PersistError),

    #[error("Failed to export history: {0}")]
    Export(#[from] ExportError),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// Entry point of a session. Consumed by [`enter`](Self::enter) or [`run`](Self::run).
pub struct AgentManager {
    agent: Arc<Agent>,
    params: ContextParams,
    repository: Arc<dyn SnapshotRepository>,
    pre_context: Option<ConversationSnapshot>,
    exporter: Option<Arc<dyn HistoryExporter>>,
}

impl AgentManager {
    pub fn new(
        agent: Arc<Agent>,
        params: ContextParams,
        repository: Arc<dyn SnapshotRepository>,
    ) -> Self {
        Self {
            agent,
            params,
            repository,
            pre_context: None,
            exporter: None,
        }
    }

    /// Continue an earlier conversation instead of starting a fresh one.
    ///
    /// The snapshot keeps its own id, window and storage location.
    pub fn with_pre_context(mut self, snapshot: ConversationSnapshot) -> Self {
        self.pre_context = Some(snapshot);
        self
    }

    /// Receive the full history after the snapshot is persisted.
    pub fn with_exporter(mut self, exporter: Arc<dyn HistoryExporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn params(&self) -> &ContextParams {
        &self.params
    }

    /// Open the session.
    pub fn enter(self) -> Result<ActiveSession, SessionError> {
        let store = match self.pre_context {
            Some(snapshot) => {
                debug!(
                    "Resuming context {} ({} turns)",
                    snapshot.id(),
                    snapshot.history().len()
                );
                HistoryStore::adopt(snapshot, self.repository)
            }
            None => {
                let mut store = HistoryStore::new(
                    self.agent.model().cloned(),
                    self.params.max_window,
                    self.params.store_dir.clone(),
                    self.repository,
                );
                store.create(false)?;
                debug!("Created context {}", store.snapshot().id());
                store
            }
        };

        Ok(ActiveSession {
            agent: self.agent,
            store,
            exporter: self.exporter,
        })
    }

    /// Run `body` inside a session.
    ///
    /// On `Ok` the session is finished (persisted, then exported) and the
    /// body's value is returned. On `Err` nothing is written and the body's
    /// error is returned as is.
    pub async fn run<T, E, F>(self, body: F) -> Result<T, E>
    where
        F: for<'s> FnOnce(&'s mut ActiveSession) -> BoxFuture<'s, Result<T, E>>,
        E: From<SessionError>,
    {
        let mut session = self.enter()?;
        match body(&mut session).await {
            Ok(value) => {
                session.finish()?;
                Ok(value)
            }
            Err(err) => {
                session.abandon();
                Err(err)
            }
        }
    }
}

/// An open conversation.
pub struct ActiveSession {
    agent: Arc<Agent>,
    store: HistoryStore,
    exporter: Option<Arc<dyn HistoryExporter>>,
}

impl ActiveSession {
    /// Send a prompt with the windowed history as context.
    ///
    /// The user turn is recorded before the call and stays recorded if the
    /// call fails. The reply is recorded only when it is non-empty.
    pub async fn send_prompt(
        &mut self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<PromptResponse, SessionError> {
        self.store.append(Turn::user(prompt));

        let response = self
            .agent
            .complete(self.store.windowed_history(), temperature, max_tokens)
            .await?;

        match response.response.as_deref() {
            Some(text) if !text.is_empty() => self.store.append(Turn::assistant(text)),
            _ => debug!("Empty response for completion {}", response.id),
        }

        Ok(response)
    }

    /// The current snapshot, including every turn so far.
    pub fn context(&self) -> &ConversationSnapshot {
        self.store.snapshot()
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Persist the snapshot, then export the history.
    ///
    /// Export is skipped when persisting fails.
    pub fn finish(self) -> Result<PathBuf, SessionError> {
        let path = self.store.persist()?;
        info!(
            "Saved context {} ({} turns) to {}",
            self.store.snapshot().id(),
            self.store.len(),
            path.display()
        );

        if let Some(exporter) = &self.exporter {
            self.store.export_history(exporter.as_ref())?;
            debug!("Exported history of {}", self.store.snapshot().id());
        }

        Ok(path)
    }

    /// Close without writing anything.
    pub fn abandon(self) {
        debug!(
            "Abandoned context {} without saving",
            self.store.snapshot().id()
        );
    }
}
