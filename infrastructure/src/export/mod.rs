//! History export adapters.
//!
//! Provides [`JsonlHistoryExporter`], a JSONL file writer that implements
//! the [`HistoryExporter`](tuned_domain::HistoryExporter) trait.

mod jsonl_exporter;

pub use jsonl_exporter::JsonlHistoryExporter;
