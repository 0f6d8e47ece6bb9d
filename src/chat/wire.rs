//! Request and response bodies exchanged with the chat endpoint.

use serde::{Deserialize, Serialize};

use super::turn::Turn;

/// Body of the POST sent for every submitted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The text the user just submitted
    pub chat: String,
    /// Every turn that preceded it, oldest first
    pub history: Vec<Turn>,
}

/// Successful reply from the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
}
