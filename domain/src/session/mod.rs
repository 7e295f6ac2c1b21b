//! Conversation session domain.
//!
//! - [`entities::Turn`] - a single message tagged by [`entities::Role`]
//! - [`message::ChatMessage`] - a message as sent to the completion API

pub mod entities;
pub mod message;
