//! Conversation primitives: message history and the streaming session.

pub mod message;
pub mod session;

pub use message::{ChatMessage, ChatRole};
pub use session::{ChatTransport, ConversationSession};
