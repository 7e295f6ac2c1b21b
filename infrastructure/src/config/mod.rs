//! Configuration file loading for tuned-agent
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TUNED_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./tuned-agent.toml` or `./.tuned-agent.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/tuned-agent/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileConfig, FileContextConfig, FileOpenAiConfig, FileRetryConfig,
    FileTrainingConfig,
};
pub use loader::ConfigLoader;
