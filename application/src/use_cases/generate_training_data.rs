//! Training data generation.
//!
//! A generator model is asked, turn by turn, for prompt/response samples
//! matching a [`Task`]. Each parsable reply becomes a [`TrainingExample`];
//! the whole batch is handed to a [`TrainingSink`] once at the end.

use super::agent::TEMPERATURE_RANGE;
use crate::ports::llm_gateway::{CompletionGateway, CompletionRequest, GatewayError};
use crate::ports::training_sink::{SinkError, TrainingSink};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use tuned_domain::{
    ChatMessage, ConversationSnapshot, DomainError, HistoryStore, PersistError, PromptTemplate,
    SnapshotRepository, Task, TrainingExample, Turn,
};

/// Model used to generate samples unless another is configured.
pub const DEFAULT_GENERATOR_MODEL: &str = "gpt-3.5-turbo-0125";

/// Errors raised while generating training data
#[derive(Error, Debug)]
pub enum TrainingDataError {
    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Failed to deliver training data: {0}")]
    Sink(#[from] SinkError),
}

/// Shape of one generated sample.
#[derive(Debug, Deserialize)]
struct Sample {
    prompt: String,
    response: String,
}

/// Backing repository for the in-memory generator conversation; saving is
/// not supported.
struct Unsaved;

impl SnapshotRepository for Unsaved {
    fn save(&self, snapshot: &ConversationSnapshot) -> Result<PathBuf, PersistError> {
        Err(PersistError::io(
            snapshot.storage_location(),
            std::io::ErrorKind::Unsupported.into(),
        ))
    }

    fn load(&self, path: &Path) -> Result<ConversationSnapshot, PersistError> {
        Err(PersistError::io(path, std::io::ErrorKind::Unsupported.into()))
    }
}

/// Generates fine-tuning samples for a task.
pub struct TrainingDataGenerator {
    gateway: Arc<dyn CompletionGateway>,
    task: Task,
    data: serde_json::Value,
    model: String,
}

impl TrainingDataGenerator {
    /// `data` is embedded verbatim in the generator prompt.
    pub fn new(gateway: Arc<dyn CompletionGateway>, task: Task, data: serde_json::Value) -> Self {
        Self {
            gateway,
            task,
            data,
            model: DEFAULT_GENERATOR_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// System prompt given to the generator model.
    pub fn template(&self) -> String {
        PromptTemplate::training_data_system(&self.task, &self.data)
    }

    /// Ask for `n` samples and send the parsable ones to `sink` in one batch.
    ///
    /// Only the last `max_window` turns of the generator conversation are
    /// sent with each request. That conversation lives in memory only and is
    /// never persisted. Returns the number of examples delivered.
    pub async fn create_examples(
        &self,
        n: usize,
        temperature: f32,
        max_tokens: u32,
        max_window: NonZeroUsize,
        sink: &dyn TrainingSink,
    ) -> Result<usize, TrainingDataError> {
        if !TEMPERATURE_RANGE.contains(&temperature) {
            return Err(DomainError::validation(format!(
                "temperature must be within [0, 2], got {}",
                temperature
            ))
            .into());
        }

        let template = self.template();
        let mut store = HistoryStore::new(None, max_window, PathBuf::new(), Arc::new(Unsaved));
        let mut examples = Vec::with_capacity(n);

        info!("Generating {} training examples with {}", n, self.model);

        for index in 0..n {
            store.append(Turn::user(PromptTemplate::training_data_next(index)));

            let mut messages = Vec::with_capacity(max_window.get() + 1);
            messages.push(ChatMessage::system(template.clone()));
            messages.extend(store.windowed_history().iter().map(ChatMessage::from));

            let request = CompletionRequest {
                messages,
                model: self.model.clone(),
                temperature,
                max_tokens,
            };
            let response = self.gateway.complete(&request).await?;

            let Some(reply) = response.first_text().filter(|t| !t.trim().is_empty()) else {
                warn!("Sample #{} came back empty, skipping", index + 1);
                continue;
            };
            store.append(Turn::assistant(reply));

            match parse_sample(reply) {
                Some(sample) => {
                    debug!("Sample #{}: {}", index + 1, sample.prompt);
                    examples.push(TrainingExample::new(
                        self.task.short_backstory.clone(),
                        sample.prompt,
                        sample.response,
                    ));
                }
                None => warn!("Sample #{} is not a prompt/response object, skipping", index + 1),
            }
        }

        sink.send(&examples).await?;
        info!("Delivered {} of {} requested examples", examples.len(), n);
        Ok(examples.len())
    }
}

/// Parse a reply, tolerating text or code fences around the JSON object.
fn parse_sample(reply: &str) -> Option<Sample> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&reply[start..=end]).ok()
}
