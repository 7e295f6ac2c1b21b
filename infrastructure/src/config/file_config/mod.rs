//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section has defaults, so a partial file is always valid.

mod context;
mod issue;
mod openai;
mod retry;
mod training;

pub use context::FileContextConfig;
pub use issue::ConfigIssue;
pub use openai::FileOpenAiConfig;
pub use retry::FileRetryConfig;
pub use training::FileTrainingConfig;

use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// API endpoint and credentials
    pub openai: FileOpenAiConfig,
    /// Conversation history settings
    pub context: FileContextConfig,
    /// Backoff for remote calls
    pub retry: FileRetryConfig,
    /// Training data and fine-tuning
    pub training: FileTrainingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.context.to_context_params().1);
        issues.extend(self.retry.to_policy().1);

        if self.openai.api_key_env.trim().is_empty() {
            issues.push(ConfigIssue::new("openai.api_key_env", "must not be empty"));
        }
        if let Some(model) = &self.openai.model
            && model.trim().is_empty()
        {
            issues.push(ConfigIssue::new("openai.model", "must not be empty"));
        }

        issues
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_to_toml_reads_back() {
        let mut config = FileConfig::default();
        config.openai.model = Some("ft:model".to_string());
        config.retry.retries = 3;

        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[retry]"));

        let parsed: FileConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[openai]
api_base = "http://localhost:8080"
api_key_env = "MY_KEY"
model = "ft:gpt-3.5-turbo:acme::abc"

[context]
store_dir = "/var/lib/tuned/contexts"
max_window = 4
export_path = "exports/history.jsonl"

[retry]
retries = 5
base_delay_ms = 200
jitter_ms = 0

[training]
train_dir = "train"
generator_model = "gpt-4o-mini"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.openai.api_base, "http://localhost:8080");
        assert_eq!(config.openai.api_key_env, "MY_KEY");
        assert_eq!(
            config.openai.model.as_deref(),
            Some("ft:gpt-3.5-turbo:acme::abc")
        );
        assert_eq!(
            config.context.store_dir,
            PathBuf::from("/var/lib/tuned/contexts")
        );
        assert_eq!(config.context.max_window, 4);
        assert_eq!(
            config.context.export_path,
            Some(PathBuf::from("exports/history.jsonl"))
        );
        assert_eq!(config.retry.retries, 5);
        assert_eq!(config.training.generator_model, "gpt-4o-mini");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[context]
max_window = 3
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.context.max_window, 3);
        // Defaults should apply
        assert_eq!(config.context.store_dir, PathBuf::from("data/contexts"));
        assert_eq!(config.openai.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.retry.retries, 8);
        assert_eq!(config.training.generator_model, "gpt-3.5-turbo-0125");
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.context.max_window, 10);
        assert_eq!(config.retry.base_delay_ms, 1000);
        assert_eq!(config.retry.jitter_ms, 1000);
        assert!(config.openai.model.is_none());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_each_issue() {
        let mut config = FileConfig::default();
        config.context.max_window = 0;
        config.openai.api_key_env = " ".to_string();

        let issues = config.validate();

        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.field == "context.max_window"));
        assert!(issues.iter().any(|i| i.field == "openai.api_key_env"));
    }
}
