//! Prompt domain
//!
//! Templates for the agent system prompt and the training-data generator.

mod template;

pub use template::PromptTemplate;
