//! Context configuration from TOML (`[context]` section)

use super::issue::ConfigIssue;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tuned_application::ContextParams;
use tuned_application::config::context_params::{DEFAULT_MAX_WINDOW, DEFAULT_STORE_DIR};

/// Conversation history settings.
///
/// # Example
///
/// ```toml
/// [context]
/// store_dir = "data/contexts"
/// max_window = 10
/// export_path = "data/exports/history.jsonl"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileContextConfig {
    /// Directory snapshots are written to.
    pub store_dir: PathBuf,
    /// Number of most recent turns sent with each prompt (must be positive).
    pub max_window: usize,
    /// Append the full history of every finished session to this JSONL file.
    pub export_path: Option<PathBuf>,
}

impl Default for FileContextConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            max_window: DEFAULT_MAX_WINDOW,
            export_path: None,
        }
    }
}

impl FileContextConfig {
    /// Convert to [`ContextParams`], returning validation issues.
    ///
    /// A zero window falls back to the default.
    pub fn to_context_params(&self) -> (ContextParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut params = ContextParams::default().with_store_dir(self.store_dir.clone());

        match NonZeroUsize::new(self.max_window) {
            Some(window) => params = params.with_max_window(window),
            None => issues.push(ConfigIssue::new(
                "context.max_window",
                format!("must be at least 1, using {}", DEFAULT_MAX_WINDOW),
            )),
        }

        (params, issues)
    }
}
