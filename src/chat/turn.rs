//! Conversation turns.
//!
//! A turn is one message in the conversation. Turns are immutable once
//! created; the conversation only ever grows by appending new ones.

use serde::{Deserialize, Serialize};

/// Text shown as the model's reply whenever an exchange fails.
pub const FALLBACK_REPLY: &str = "An error occurred. Please try again.";

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Human-authored
    User,
    /// AI-authored
    Model,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
        }
    }
}

/// One message in the conversation.
///
/// On the wire a turn is a content object with a single text part:
/// `{"role": "user", "parts": [{"text": "..."}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireTurn", into = "WireTurn")]
pub struct Turn {
    role: Role,
    text: String,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    /// The turn shown when an exchange fails.
    pub fn fallback() -> Self {
        Self::model(FALLBACK_REPLY)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[derive(Serialize, Deserialize)]
struct WireTurn {
    role: Role,
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Serialize, Deserialize)]
struct WirePart {
    #[serde(default)]
    text: String,
}

impl From<WireTurn> for Turn {
    fn from(wire: WireTurn) -> Self {
        // Multi-part content is flattened; the client only ever sends one part.
        let text = wire.parts.into_iter().map(|p| p.text).collect::<String>();
        Turn::new(wire.role, text)
    }
}

impl From<Turn> for WireTurn {
    fn from(turn: Turn) -> Self {
        WireTurn {
            role: turn.role,
            parts: vec![WirePart { text: turn.text }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_constructors_set_role() {
        assert_eq!(Turn::user("hi").role(), Role::User);
        assert_eq!(Turn::model("hello").role(), Role::Model);
        assert!(Turn::user("hi").is_user());
        assert!(!Turn::model("hi").is_user());
    }

    #[test]
    fn test_fallback_turn() {
        let turn = Turn::fallback();
        assert_eq!(turn.role(), Role::Model);
        assert_eq!(turn.text(), "An error occurred. Please try again.");
    }

    #[test]
    fn test_serializes_as_content_parts() {
        let value = serde_json::to_value(Turn::user("**bold**")).unwrap();
        assert_eq!(
            value,
            json!({"role": "user", "parts": [{"text": "**bold**"}]})
        );
    }

    #[test]
    fn test_deserializes_multi_part_content() {
        let turn: Turn = serde_json::from_value(json!({
            "role": "model",
            "parts": [{"text": "Hello, "}, {"text": "world"}]
        }))
        .unwrap();
        assert_eq!(turn, Turn::model("Hello, world"));
    }

    #[test]
    fn test_rejects_unknown_role() {
        let result: Result<Turn, _> =
            serde_json::from_value(json!({"role": "system", "parts": []}));
        assert!(result.is_err());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Model.to_string(), "model");
    }
}
