//! Training data output.

mod jsonl_sink;

pub use jsonl_sink::{DEFAULT_TRAIN_DIR, JsonlTrainingSink};
