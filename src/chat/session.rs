//! Conversation session: serialized history around a streaming transport.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures_util::StreamExt;
use tokio::sync::Mutex;
use tracing::debug;

use super::message::{ChatMessage, ChatRole};
use crate::errors::LlmError;

/// The streaming send a session delegates to.
///
/// Implementations own the wire format and the connection; the session only
/// sees text chunks coming back. The prompt being asked is the last entry of
/// the supplied history.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_chat(
        &self,
        history: Vec<ChatMessage>,
    ) -> BoxStream<'static, Result<String, LlmError>>;
}

/// Owns an ordered message history and serializes all mutation of it.
///
/// `send` is a pass-through decorator around the transport's stream: the
/// caller receives the chunks unmodified, and the session's only observable
/// effect is history bookkeeping. Consecutive streamed assistant fragments
/// are coalesced into a single logical assistant message.
///
/// Safe under concurrent `send` calls: history is guarded by one coarse
/// mutex, held per append only, never across the network call.
pub struct ConversationSession<T> {
    transport: T,
    history: Arc<Mutex<Vec<ChatMessage>>>,
}

impl<T: ChatTransport> ConversationSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Send a prompt to the model and stream back its response.
    ///
    /// When `ephemeral` is true nothing is recorded: the prompt is appended
    /// to a private copy of the history for the duration of the call, and
    /// the response fragments bypass the coalescing bookkeeping. Used for
    /// one-off requests that must not pollute the long-lived conversation.
    pub async fn send(
        &self,
        prompt: &str,
        ephemeral: bool,
    ) -> BoxStream<'static, Result<String, LlmError>> {
        debug!(ephemeral, prompt_chars = prompt.len(), "sending chat prompt");

        let snapshot = if ephemeral {
            let mut view = self.history.lock().await.clone();
            view.push(ChatMessage::user(prompt));
            view
        } else {
            let mut guard = self.history.lock().await;
            guard.push(ChatMessage::user(prompt));
            guard.clone()
        };

        let upstream = self.transport.send_chat(snapshot).await;
        if ephemeral {
            return upstream;
        }

        let history = Arc::clone(&self.history);
        upstream
            .then(move |chunk| {
                let history = Arc::clone(&history);
                async move {
                    if let Ok(fragment) = &chunk {
                        record_assistant_fragment(&history, fragment).await;
                    }
                    chunk
                }
            })
            .boxed()
    }

    /// Current history, cloned under the lock.
    pub async fn history_snapshot(&self) -> Vec<ChatMessage> {
        self.history.lock().await.clone()
    }
}

/// Append a streamed assistant fragment, coalescing with the previous entry
/// when that entry is already assistant-role.
async fn record_assistant_fragment(history: &Mutex<Vec<ChatMessage>>, fragment: &str) {
    let mut guard = history.lock().await;
    match guard.last_mut() {
        Some(last) if last.role == ChatRole::Assistant => last.append(fragment),
        _ => guard.push(ChatMessage::assistant(fragment)),
    }
}
