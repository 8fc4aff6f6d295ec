//! Typed errors for a single model round.
//!
//! `LlmError` is the classification the request manager hands back when a
//! round did not produce a usable test suite. The success case is not an
//! enum variant: a round returns `Result<GeneratedTestSuite, LlmError>`, so
//! "no error but also no suite" cannot be constructed.

use thiserror::Error;

/// Failure modes of one request/response round against the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LlmError {
    /// The model (or its gateway) rejected the prompt as too large.
    ///
    /// Recoverable only through the prompt-size reduction strategy; the
    /// round does not consume budget.
    #[error("prompt exceeds the model's size limit")]
    PromptTooLong,

    /// The response stream completed without any content.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// The response carried content but no test suite could be parsed from it.
    #[error("could not parse a test suite from the model response")]
    ParseFailure,
}

impl LlmError {
    /// Whether a corrective re-prompt can address this error without
    /// shrinking the request.
    pub fn is_content_error(&self) -> bool {
        matches!(self, LlmError::EmptyResponse | LlmError::ParseFailure)
    }
}
