//! Application layer for tuned-agent
//!
//! This crate contains use cases, port definitions, the retry policy and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod retry;
pub mod use_cases;

// Re-export commonly used types
pub use config::ContextParams;
pub use ports::{
    fine_tuning::FineTuningGateway,
    llm_gateway::{
        CompletionChoice, CompletionGateway, CompletionRequest, CompletionResponse, GatewayError,
        TokenUsage,
    },
    pipeline::{Pipeline, PipelineError},
    training_sink::{SinkError, TrainingSink},
};
pub use retry::{BackoffPolicy, RetryingGateway};
pub use use_cases::agent::{Agent, AgentBuilder, AgentError, PromptResponse};
pub use use_cases::agent_manager::{ActiveSession, AgentManager, SessionError};
pub use use_cases::fine_tuning::{FineTuning, FineTuningError, MAX_TRAINING_FILE_BYTES};
pub use use_cases::generate_training_data::{
    DEFAULT_GENERATOR_MODEL, TrainingDataError, TrainingDataGenerator,
};
