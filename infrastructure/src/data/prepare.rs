//! Run a data preparation pipeline and optionally keep its output.

use std::path::{Path, PathBuf};
use tracing::info;
use tuned_application::ports::pipeline::{Pipeline, PipelineError};
use tuned_domain::DataDict;

/// Default directory for persisted pipeline output.
pub const DEFAULT_PIPELINE_DIR: &str = "data/pipelined_data";

/// File name used for output persisted on `date` (`YYYYMMDD`).
pub fn pipelined_data_file_name(date: chrono::NaiveDate) -> String {
    format!("pipelined_data_{}.json", date.format("%Y%m%d"))
}

/// Run `pipeline` and wrap its output in a [`DataDict`].
///
/// With `persist_dir`, the output is also written as JSON to
/// `<persist_dir>/pipelined_data_<YYYYMMDD>.json`, replacing an earlier
/// file from the same day.
pub fn prepare_data<P: Pipeline>(
    pipeline: &mut P,
    persist_dir: Option<&Path>,
) -> Result<DataDict<P::Output>, PipelineError> {
    let data = pipeline.run()?;

    if let Some(dir) = persist_dir {
        let path = persist(&data, dir)?;
        info!("Persisted pipeline output to {}", path.display());
    }

    Ok(DataDict { data })
}

fn persist<T: serde::Serialize>(data: &T, dir: &Path) -> Result<PathBuf, PipelineError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(pipelined_data_file_name(chrono::Local::now().date_naive()));
    std::fs::write(&path, serde_json::to_string_pretty(data)?)?;
    Ok(path)
}
