//! Training configuration from TOML (`[training]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tuned_application::DEFAULT_GENERATOR_MODEL;

/// Training data and fine-tuning settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTrainingConfig {
    /// Directory generated `train_*.jsonl` files are written to.
    pub train_dir: PathBuf,
    /// Model that generates training samples.
    pub generator_model: String,
    /// Base model for new fine-tuning jobs.
    pub base_model: String,
    /// Seconds between status checks while waiting for a job.
    pub poll_interval_secs: u64,
}

impl Default for FileTrainingConfig {
    fn default() -> Self {
        Self {
            train_dir: PathBuf::from(crate::training::DEFAULT_TRAIN_DIR),
            generator_model: DEFAULT_GENERATOR_MODEL.to_string(),
            base_model: tuned_domain::core::model::DEFAULT_BASE_MODEL.to_string(),
            poll_interval_secs: 30,
        }
    }
}
