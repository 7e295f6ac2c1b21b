//! Data preparation helpers.

mod prepare;

pub use prepare::{DEFAULT_PIPELINE_DIR, pipelined_data_file_name, prepare_data};
