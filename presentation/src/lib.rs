//! Presentation layer for tuned-agent
//!
//! This crate contains the CLI definition and console output formatting.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{
    AgentArgs, Cli, Command, FineTuneCommand, OutputFormat, SamplingArgs, SessionArgs,
};
pub use output::console::ConsoleFormatter;
