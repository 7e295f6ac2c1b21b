//! JSONL training file writer.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;
use tuned_application::ports::training_sink::{SinkError, TrainingSink};
use tuned_domain::TrainingExample;

/// Default directory for generated training files.
pub const DEFAULT_TRAIN_DIR: &str = "data/train";

/// Writes each batch to a new `train_<timestamp>.jsonl` file, one example per line.
///
/// The format is the chat fine-tuning format accepted by
/// [`FineTuning`](tuned_application::FineTuning).
#[derive(Debug, Clone)]
pub struct JsonlTrainingSink {
    train_dir: PathBuf,
}

impl JsonlTrainingSink {
    pub fn new(train_dir: impl Into<PathBuf>) -> Self {
        Self {
            train_dir: train_dir.into(),
        }
    }

    pub fn train_dir(&self) -> &Path {
        &self.train_dir
    }

    /// Write a batch and return the file it went to.
    pub async fn write(&self, examples: &[TrainingExample]) -> Result<PathBuf, SinkError> {
        tokio::fs::create_dir_all(&self.train_dir).await?;

        let mut content = String::new();
        for example in examples {
            content.push_str(&serde_json::to_string(example)?);
            content.push('\n');
        }

        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S%3f");
        let path = self.train_dir.join(format!("train_{}.jsonl", stamp));
        tokio::fs::write(&path, content).await?;

        info!(
            "Wrote {} training examples to {}",
            examples.len(),
            path.display()
        );
        Ok(path)
    }
}

impl Default for JsonlTrainingSink {
    fn default() -> Self {
        Self::new(DEFAULT_TRAIN_DIR)
    }
}

#[async_trait]
impl TrainingSink for JsonlTrainingSink {
    async fn send(&self, examples: &[TrainingExample]) -> Result<(), SinkError> {
        self.write(examples).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_dated_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonlTrainingSink::new(dir.path().join("data").join("train"));
        let example = TrainingExample::new("Short backstory", "Test prompt", "Test response");

        let path = sink.write(&vec![example.clone(); 3]).await.unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("train_"));
        assert!(name.ends_with(".jsonl"));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        let parsed: TrainingExample = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed, example);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][2]["content"], "Test response");
    }

    #[tokio::test]
    async fn test_send_through_port() {
        let dir = tempfile::tempdir().unwrap();
        let sink: &dyn TrainingSink = &JsonlTrainingSink::new(dir.path());

        sink.send(&[]).await.unwrap();

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
