//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod fine_tuning;
pub mod llm_gateway;
pub mod pipeline;
pub mod training_sink;
