//! Conversation messages.
//!
//! A conversation is an append-only list of [`ChatMessage`]s. The same type is
//! used on the wire: `/chat` receives the history as `[{role, content}, ...]`.

use serde::{Deserialize, Serialize};

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message typed by the person using the client.
    User,
    /// Message produced by the backend (or by the client on its behalf).
    Assistant,
}

impl Role {
    /// Label shown in front of a message in the transcript.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Agent",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author.
    pub role: Role,
    /// Message content.
    pub content: String,
}

impl ChatMessage {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Create the assistant message shown when a request fails.
    pub fn error(cause: impl std::fmt::Display) -> Self {
        Self::assistant(format!("Sorry, an error occurred: {cause}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serializes_role_lowercase() {
        let json = serde_json::to_string(&ChatMessage::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);

        let json = serde_json::to_string(&ChatMessage::assistant("hello")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hello"}"#);
    }

    #[test]
    fn test_error_message_is_assistant() {
        let msg = ChatMessage::error("connection refused");
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "Sorry, an error occurred: connection refused");
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::User.label(), "You");
        assert_eq!(Role::Assistant.label(), "Agent");
    }
}
