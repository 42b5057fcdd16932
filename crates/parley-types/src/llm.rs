//! Conversation turn types and model gateway errors for Parley.
//!
//! A conversation is an ordered list of [`Message`]s, each tagged with the
//! [`Role`] of its author. The same shape is persisted in the chat history
//! file and sent to the model API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "model" => Ok(Role::Model),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// One role-tagged turn of a conversation.
///
/// Messages are never edited after creation; a chat only grows by
/// appending new ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<String>,
}

impl Message {
    /// A single-part user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![text.into()],
        }
    }

    /// A single-part model turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![text.into()],
        }
    }

    /// All text parts concatenated.
    pub fn text(&self) -> String {
        self.parts.concat()
    }
}

/// Errors from model gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("response blocked: {0}")]
    Blocked(String),

    #[error("model returned no text")]
    EmptyResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::User, Role::Model] {
            let s = role.to_string();
            let parsed: Role = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_role_rejects_assistant() {
        assert!("assistant".parse::<Role>().is_err());
    }

    #[test]
    fn test_message_serde_shape() {
        let msg = Message::model("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json, serde_json::json!({"role": "model", "parts": ["hello"]}));
    }

    #[test]
    fn test_message_parts_default_empty() {
        let msg: Message = serde_json::from_str(r#"{"role":"user"}"#).unwrap();
        assert!(msg.parts.is_empty());
        assert_eq!(msg.text(), "");
    }

    #[test]
    fn test_message_text_joins_parts() {
        let msg = Message {
            role: Role::User,
            parts: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(msg.text(), "ab");
    }

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::Blocked("SAFETY".to_string());
        assert_eq!(err.to_string(), "response blocked: SAFETY");
    }
}
