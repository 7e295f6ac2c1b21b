//! Fine-tuned model entity

use super::task::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base model used when none is specified
pub const DEFAULT_BASE_MODEL: &str = "gpt-3.5-turbo";

/// A model produced by a fine-tuning job (Entity)
///
/// Carries the [`Task`] it was trained for so an agent backed by it can
/// rebuild the same system prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FineTunedModel {
    /// Model identifier as reported by the provider (e.g. `ft:gpt-3.5-turbo:acme::abc123`)
    pub name: String,
    pub task: Task,
    pub base_model: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FineTunedModel {
    pub fn new(name: impl Into<String>, task: Task) -> Self {
        Self {
            name: name.into(),
            task,
            base_model: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_base_model(mut self, base_model: impl Into<String>) -> Self {
        self.base_model = Some(base_model.into());
        self
    }

    /// Base model name, falling back to [`DEFAULT_BASE_MODEL`]
    pub fn base_model_or_default(&self) -> &str {
        self.base_model.as_deref().unwrap_or(DEFAULT_BASE_MODEL)
    }
}

impl std::fmt::Display for FineTunedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        Task::new("backstory", "short", "role", "goal")
    }

    #[test]
    fn test_model_serde_roundtrip() {
        let model = FineTunedModel::new("ft:model", task()).with_base_model("gpt-4o-mini");
        let json = serde_json::to_string(&model).unwrap();
        let parsed: FineTunedModel = serde_json::from_str(&json).unwrap();
        assert_eq!(model, parsed);
    }

    #[test]
    fn test_base_model_default() {
        let model = FineTunedModel::new("ft:model", task());
        assert_eq!(model.base_model_or_default(), DEFAULT_BASE_MODEL);
        assert_eq!(model.to_string(), "ft:model");
    }
}
