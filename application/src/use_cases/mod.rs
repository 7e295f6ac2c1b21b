//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod agent;
pub mod agent_manager;
pub mod fine_tuning;
pub mod generate_training_data;

#[cfg(test)]
pub(crate) mod test_support;
