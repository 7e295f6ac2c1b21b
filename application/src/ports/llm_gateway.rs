//! Completion gateway port
//!
//! Defines the interface for calling a chat-completion API.

use async_trait::async_trait;
use thiserror::Error;
use tuned_domain::ChatMessage;

/// Errors that can occur during a remote API call
///
/// Every variant is treated as retryable by
/// [`BackoffPolicy`](crate::retry::BackoffPolicy).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// A chat-completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Ordered messages, system prompt first
    pub messages: Vec<ChatMessage>,
    /// Model identifier
    pub model: String,
    /// Sampling temperature in `[0, 2]`
    pub temperature: f32,
    /// Maximum output tokens
    pub max_tokens: u32,
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One candidate output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionChoice {
    pub text: Option<String>,
}

/// A chat-completion response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub id: String,
    pub choices: Vec<CompletionChoice>,
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Single-choice response, mostly for tests and fallbacks.
    pub fn from_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            choices: vec![CompletionChoice {
                text: Some(text.into()),
            }],
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Text of the first choice, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.text.as_deref())
    }
}

/// Gateway for chat completions
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Send one completion request.
    async fn complete(&self, request: &CompletionRequest)
    -> Result<CompletionResponse, GatewayError>;
}
