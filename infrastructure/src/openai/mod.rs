//! OpenAI HTTP adapter.

mod gateway;
mod types;

pub use gateway::{DEFAULT_API_BASE, DEFAULT_API_KEY_ENV, OpenAiGateway};
