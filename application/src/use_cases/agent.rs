//! Agent use case.
//!
//! An [`Agent`] pairs a completion model with the system prompt built from
//! its [`Task`]. It is backed either by a [`FineTunedModel`] (which carries
//! its task) or by a model name plus an explicit task.

use crate::ports::llm_gateway::{CompletionGateway, CompletionRequest, GatewayError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use tuned_domain::{ChatMessage, DomainError, FineTunedModel, PromptTemplate, Role, Task, Turn};

/// Accepted temperature range of the completion API.
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

/// Errors that can occur while prompting an agent.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Result of one prompt round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptResponse {
    /// Provider-assigned completion id
    pub id: String,
    /// The prompt that was answered
    pub prompt: String,
    /// Text of the first choice, if the model produced any
    pub response: Option<String>,
    pub temperature: f32,
    pub total_tokens: Option<u32>,
    /// Model that produced the answer
    pub fine_tuned_model: String,
}

/// A task-specialised conversational agent.
pub struct Agent {
    gateway: Arc<dyn CompletionGateway>,
    model: Option<FineTunedModel>,
    model_name: String,
    task: Task,
    template: String,
}

impl Agent {
    /// Agent backed by a fine-tuned model; the task comes from the model.
    pub fn from_model(gateway: Arc<dyn CompletionGateway>, model: FineTunedModel) -> Self {
        let template = PromptTemplate::agent_system(&model.task);
        Self {
            gateway,
            model_name: model.name.clone(),
            task: model.task.clone(),
            model: Some(model),
            template,
        }
    }

    /// Agent backed by a model name and an explicit task.
    pub fn from_task(
        gateway: Arc<dyn CompletionGateway>,
        model_name: impl Into<String>,
        task: Task,
    ) -> Result<Self, DomainError> {
        let model_name = model_name.into();
        if model_name.trim().is_empty() {
            return Err(DomainError::validation("model name cannot be empty"));
        }
        let template = PromptTemplate::agent_system(&task);
        Ok(Self {
            gateway,
            model: None,
            model_name,
            task,
            template,
        })
    }

    /// Start building an agent from optional parts.
    pub fn builder(gateway: Arc<dyn CompletionGateway>) -> AgentBuilder {
        AgentBuilder {
            gateway,
            model: None,
            model_name: None,
            task: None,
        }
    }

    /// The backing fine-tuned model, when there is one.
    pub fn model(&self) -> Option<&FineTunedModel> {
        self.model.as_ref()
    }

    /// Identifier sent to the completion API.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    /// The system prompt.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// One-shot prompt with no conversation history.
    pub async fn prompt(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<PromptResponse, AgentError> {
        self.complete(&[Turn::user(prompt)], temperature, max_tokens)
            .await
    }

    /// Prompt with the given turns as context.
    ///
    /// The echoed prompt is the last user turn in `history`.
    pub async fn complete(
        &self,
        history: &[Turn],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<PromptResponse, AgentError> {
        if !TEMPERATURE_RANGE.contains(&temperature) {
            return Err(DomainError::validation(format!(
                "temperature must be within [0, 2], got {}",
                temperature
            ))
            .into());
        }

        let prompt = history
            .iter()
            .rev()
            .find(|t| t.role() == Role::User)
            .map(|t| t.content().to_string())
            .unwrap_or_default();

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(self.template.clone()));
        messages.extend(history.iter().map(ChatMessage::from));

        let request = CompletionRequest {
            messages,
            model: self.model_name.clone(),
            temperature,
            max_tokens,
        };

        debug!(
            "Sending {} turn(s) to {} (temperature {}, max_tokens {})",
            history.len(),
            self.model_name,
            temperature,
            max_tokens
        );

        let result = self.gateway.complete(&request).await?;
        let total_tokens = result.usage.map(|u| u.total_tokens);
        let response = result.first_text().map(str::to_string);

        info!(
            "Completion {} from {} ({} tokens)",
            result.id,
            self.model_name,
            total_tokens.map_or_else(|| "?".to_string(), |t| t.to_string())
        );

        Ok(PromptResponse {
            id: result.id,
            prompt,
            response,
            temperature,
            total_tokens,
            fine_tuned_model: self.model_name.clone(),
        })
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("model_name", &self.model_name)
            .field("task", &self.task)
            .finish_non_exhaustive()
    }
}

/// Builder accepting either a model or a model name plus task.
pub struct AgentBuilder {
    gateway: Arc<dyn CompletionGateway>,
    model: Option<FineTunedModel>,
    model_name: Option<String>,
    task: Option<Task>,
}

impl AgentBuilder {
    pub fn model(mut self, model: FineTunedModel) -> Self {
        self.model = Some(model);
        self
    }

    pub fn fine_tuned_model(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    pub fn task(mut self, task: Task) -> Self {
        self.task = Some(task);
        self
    }

    /// A backing model wins over a name/task pair.
    pub fn build(self) -> Result<Agent, DomainError> {
        match (self.model, self.model_name, self.task) {
            (Some(model), _, _) => Ok(Agent::from_model(self.gateway, model)),
            (None, Some(name), Some(task)) => Agent::from_task(self.gateway, name, task),
            _ => Err(DomainError::validation(
                "an agent needs a `model` or both a `fine_tuned_model` and a `task`",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::{CompletionResponse, TokenUsage};
    use crate::use_cases::test_support::{ScriptedGateway, valid_task};

    fn usage() -> TokenUsage {
        TokenUsage {
            prompt_tokens: 200,
            completion_tokens: 300,
            total_tokens: 500,
        }
    }

    #[test]
    fn test_initiate_with_model() {
        let gateway = Arc::new(ScriptedGateway::default());
        let model = FineTunedModel::new("model", valid_task()).with_base_model("gpt-3.5-turbo");

        let agent = Agent::from_model(gateway, model);

        assert_eq!(agent.model_name(), "model");
        assert!(agent.template().contains("Short backstory"));
        assert!(agent.template().contains("Test goal"));
        assert!(agent.template().contains("Test role"));
    }

    #[test]
    fn test_builder_with_task_and_name() {
        let gateway = Arc::new(ScriptedGateway::default());
        let agent = Agent::builder(gateway)
            .task(valid_task())
            .fine_tuned_model("fine-tuned")
            .build()
            .unwrap();

        assert_eq!(agent.model_name(), "fine-tuned");
        assert!(agent.model().is_none());
        assert!(agent.template().contains("Short backstory"));
    }

    #[test]
    fn test_builder_without_model_and_task_fails() {
        let gateway = Arc::new(ScriptedGateway::default());
        let err = Agent::builder(gateway.clone()).build().unwrap_err();
        assert!(err.is_validation());

        let err = Agent::builder(gateway)
            .fine_tuned_model("only-a-name")
            .build()
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_agent_prompt() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Ok(CompletionResponse::from_text(
            "123", "answer",
        )
        .with_usage(usage()))]));
        let model = FineTunedModel::new("model", valid_task());
        let agent = Agent::from_model(gateway.clone(), model);

        let result = agent.prompt("teste", 0.5, 1000).await.unwrap();

        assert_eq!(result.id, "123");
        assert_eq!(result.prompt, "teste");
        assert_eq!(result.temperature, 0.5);
        assert_eq!(result.total_tokens, Some(500));
        assert_eq!(result.response.as_deref(), Some("answer"));
        assert_eq!(result.fine_tuned_model, "model");

        let requests = gateway.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "model");
        assert_eq!(requests[0].max_tokens, 1000);
        assert_eq!(
            requests[0].messages,
            vec![
                ChatMessage::system(agent.template()),
                ChatMessage::user("teste")
            ]
        );
    }

    #[tokio::test]
    async fn test_complete_sends_history_after_system_prompt() {
        let gateway = Arc::new(ScriptedGateway::always("ok"));
        let agent = Agent::from_task(gateway.clone(), "m", valid_task()).unwrap();
        let history = vec![
            Turn::user("first"),
            Turn::assistant("reply"),
            Turn::user("second"),
        ];

        let result = agent.complete(&history, 1.0, 50).await.unwrap();

        assert_eq!(result.prompt, "second");
        let messages = &gateway.requests()[0].messages;
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[3], ChatMessage::user("second"));
    }

    #[tokio::test]
    async fn test_out_of_range_temperature_is_rejected_before_calling() {
        let gateway = Arc::new(ScriptedGateway::always("ok"));
        let agent = Agent::from_task(gateway.clone(), "m", valid_task()).unwrap();

        let err = agent.prompt("hi", 2.5, 10).await.unwrap_err();

        assert!(matches!(err, AgentError::Validation(_)));
        assert!(gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn test_gateway_error_propagates() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Err(GatewayError::RequestFailed(
            "HTTP 500".to_string(),
        ))]));
        let agent = Agent::from_task(gateway, "m", valid_task()).unwrap();

        let err = agent.prompt("hi", 0.5, 10).await.unwrap_err();
        assert!(matches!(err, AgentError::Gateway(GatewayError::RequestFailed(_))));
    }
}
