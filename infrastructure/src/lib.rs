//! Infrastructure layer for tuned-agent
//!
//! This crate contains adapters that implement the ports defined
//! in the application and domain layers, including configuration file loading.

pub mod config;
pub mod data;
pub mod export;
pub mod openai;
pub mod snapshot;
pub mod training;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, FileConfig, FileContextConfig, FileOpenAiConfig, FileRetryConfig,
    FileTrainingConfig,
};
pub use data::{DEFAULT_PIPELINE_DIR, prepare_data};
pub use export::JsonlHistoryExporter;
pub use openai::{DEFAULT_API_BASE, DEFAULT_API_KEY_ENV, OpenAiGateway};
pub use snapshot::JsonSnapshotRepository;
pub use training::{DEFAULT_TRAIN_DIR, JsonlTrainingSink};
