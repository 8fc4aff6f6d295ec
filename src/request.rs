//! The request seam between the feedback cycle and the model.
//!
//! [`RequestManager`] is the contract the cycle drives; hosts plug in their
//! own transport. [`ChatRequestManager`] is the reference implementation
//! that keeps cross-round context in a [`ConversationSession`] and parses
//! responses through a [`ResponseAssembler`].

use async_trait::async_trait;
use futures_util::StreamExt;
use tracing::debug;

use crate::cancel::CancellationSignal;
use crate::chat::{ChatTransport, ConversationSession};
use crate::errors::LlmError;
use crate::suite::{GeneratedTestSuite, parser};

/// Per-round response buffer: collects streamed chunks and parses the
/// accumulated content into a suite once the stream ends.
pub trait ResponseAssembler: Send {
    /// Store one streamed chunk of the response.
    fn consume(&mut self, chunk: &str);

    /// Everything consumed since the last [`clear`](Self::clear).
    fn content(&self) -> &str;

    /// Drop buffered content; called by the cycle at the top of each round.
    fn clear(&mut self);

    /// Parse the buffered content into a suite. `None` means the content is
    /// not recognizable as test code.
    fn assemble(&self, package_name: &str) -> Option<GeneratedTestSuite>;
}

/// Assembler backed by the JUnit response parser.
#[derive(Debug, Default)]
pub struct JUnitResponseAssembler {
    raw: String,
}

impl JUnitResponseAssembler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResponseAssembler for JUnitResponseAssembler {
    fn consume(&mut self, chunk: &str) {
        self.raw.push_str(chunk);
    }

    fn content(&self) -> &str {
        &self.raw
    }

    fn clear(&mut self) {
        self.raw.clear();
    }

    fn assemble(&self, package_name: &str) -> Option<GeneratedTestSuite> {
        parser::parse_test_suite(&self.raw, package_name)
    }
}

/// Sends one prompt (plus accumulated history) to the model and classifies
/// the outcome. The suite is present iff the round produced one; every
/// failure mode is an [`LlmError`].
#[async_trait]
pub trait RequestManager: Send + Sync {
    async fn request(
        &self,
        prompt: &str,
        cancel: &dyn CancellationSignal,
        package_name: &str,
        assembler: &mut dyn ResponseAssembler,
        ephemeral: bool,
    ) -> Result<GeneratedTestSuite, LlmError>;
}

/// Reference [`RequestManager`] over a conversation session.
///
/// Streams the response into the assembler, then classifies: no content is
/// [`LlmError::EmptyResponse`], unparsable content is
/// [`LlmError::ParseFailure`], and transport-reported errors (notably
/// [`LlmError::PromptTooLong`]) pass straight through.
pub struct ChatRequestManager<T> {
    session: ConversationSession<T>,
}

impl<T: ChatTransport> ChatRequestManager<T> {
    pub fn new(transport: T) -> Self {
        Self {
            session: ConversationSession::new(transport),
        }
    }

    pub fn session(&self) -> &ConversationSession<T> {
        &self.session
    }
}

#[async_trait]
impl<T: ChatTransport> RequestManager for ChatRequestManager<T> {
    async fn request(
        &self,
        prompt: &str,
        cancel: &dyn CancellationSignal,
        package_name: &str,
        assembler: &mut dyn ResponseAssembler,
        ephemeral: bool,
    ) -> Result<GeneratedTestSuite, LlmError> {
        let mut chunks = self.session.send(prompt, ephemeral).await;
        while let Some(chunk) = chunks.next().await {
            if cancel.is_canceled() {
                break;
            }
            assembler.consume(&chunk?);
        }
        debug!(
            response_chars = assembler.content().len(),
            "response stream complete"
        );

        if assembler.content().trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        assembler
            .assemble(package_name)
            .ok_or(LlmError::ParseFailure)
    }
}

/// One-off "modify this test" request driven by user feedback.
///
/// The request is ephemeral: neither the prompt nor the reply is recorded
/// in the long-lived conversation history.
pub async fn execute_test_case_modification(
    request_manager: &dyn RequestManager,
    cancel: &dyn CancellationSignal,
    assembler: &mut dyn ResponseAssembler,
    test_case: &str,
    task: &str,
) -> Result<GeneratedTestSuite, LlmError> {
    let prompt = format!("For this test:\n```\n{test_case}\n```\nPerform the following task: {task}");
    let package_name = parser::package_from_test_code(test_case);
    assembler.clear();
    request_manager
        .request(&prompt, cancel, &package_name, assembler, true)
        .await
}
