//! Domain layer for tuned-agent
//!
//! This crate contains the core entities and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Task and model
//!
//! A [`Task`] describes what an agent specialises in. A [`FineTunedModel`]
//! is a model trained for a task; an agent backed by one rebuilds its system
//! prompt from the task.
//!
//! ## Conversation history
//!
//! - **Turn**: one user or assistant message
//! - **Snapshot**: the durable record of a session, written on close
//! - **Window**: the most recent slice of the log, sent to the model

pub mod context;
pub mod core;
pub mod prompt;
pub mod session;
pub mod tuning;

// Re-export commonly used types
pub use context::{
    ConversationSnapshot, ExportError, HistoryExporter, HistoryStore, PersistError,
    SnapshotRepository,
};
pub use core::{error::DomainError, model::FineTunedModel, task::Task};
pub use prompt::PromptTemplate;
pub use session::{
    entities::{Role, Turn},
    message::{ChatMessage, ChatRole},
};
pub use tuning::entities::{DataDict, FineTuningJob, JobStatus, TrainingExample};
