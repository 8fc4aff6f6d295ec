//! Chat message data model.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single entry in a conversation history.
///
/// Assistant messages are append-only buffers: one logical assistant turn
/// may arrive as many streamed fragments, and each fragment is appended to
/// the content of the entry rather than stored as a separate message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
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

    /// Append a streamed fragment to this message's content.
    pub fn append(&mut self, fragment: &str) {
        self.content.push_str(fragment);
    }
}
