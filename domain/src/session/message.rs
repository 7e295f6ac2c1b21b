//! Wire-level chat messages

use super::entities::{Role, Turn};
use serde::{Deserialize, Serialize};

/// Role of a message sent to the completion API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A message in a completion request or a training example
///
/// Unlike [`Turn`], this can carry the system prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        let role = match turn.role() {
            Role::User => ChatRole::User,
            Role::Assistant => ChatRole::Assistant,
        };
        Self {
            role,
            content: turn.content().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_turn_maps_role() {
        assert_eq!(ChatMessage::from(&Turn::user("q")), ChatMessage::user("q"));
        assert_eq!(
            ChatMessage::from(&Turn::assistant("a")),
            ChatMessage::assistant("a")
        );
    }

    #[test]
    fn test_system_serializes_lowercase() {
        let json = serde_json::to_value(ChatMessage::system("s")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "system", "content": "s"}));
    }
}
