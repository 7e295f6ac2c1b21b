//! OpenAI configuration from TOML (`[openai]` section)

use serde::{Deserialize, Serialize};

/// OpenAI API configuration.
///
/// # Example
///
/// ```toml
/// [openai]
/// api_base = "https://api.openai.com"
/// api_key_env = "OPENAI_API_KEY"
/// model = "ft:gpt-3.5-turbo:acme::abc123"
/// timeout_secs = 120
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Base URL, without the `/v1` suffix.
    pub api_base: String,
    /// Environment variable name for the API key.
    pub api_key_env: String,
    /// Model used by `prompt` and `chat` when none is given on the command line.
    pub model: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: None,
            timeout_secs: 120,
        }
    }
}
