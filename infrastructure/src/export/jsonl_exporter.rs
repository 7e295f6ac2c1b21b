//! JSONL file exporter for conversation history.
//!
//! Each [`Turn`] is written as one JSON line with its position in the log
//! and an `exported_at` timestamp. Exports append, so several sessions can
//! share one file.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tuned_domain::{ExportError, HistoryExporter, Turn};

/// History exporter that appends one JSON object per turn.
///
/// The file (and parent directories) are only created on the first export,
/// so an abandoned session leaves nothing behind.
#[derive(Debug, Clone)]
pub struct JsonlHistoryExporter {
    path: PathBuf,
}

impl JsonlHistoryExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the path to the export file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<File, ExportError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?)
    }
}

impl HistoryExporter for JsonlHistoryExporter {
    fn export(&self, history: &[Turn]) -> Result<(), ExportError> {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let mut writer = BufWriter::new(self.open()?);

        for (index, turn) in history.iter().enumerate() {
            let record = serde_json::json!({
                "index": index,
                "role": turn.role(),
                "content": turn.content(),
                "exported_at": timestamp,
            });
            writeln!(writer, "{}", serde_json::to_string(&record)?)?;
        }
        writer.flush()?;

        debug!("Exported {} turns to {}", history.len(), self.path.display());
        Ok(())
    }
}
