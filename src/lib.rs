//! LLM-driven unit test generation core.
//!
//! The crate drives automated test generation by iteratively prompting a
//! model, validating what comes back, and re-prompting on failure until a
//! usable test artifact exists or the retry budget is exhausted. The pieces:
//!
//! - [`chat`] — the conversation session: ordered message history around a
//!   streaming transport, with assistant fragments coalesced per turn;
//! - [`request`] — the request-manager seam and the reference
//!   implementation that parses responses into suites;
//! - [`reduction`] — how an oversized prompt gets smaller;
//! - [`cycle`] — the feedback state machine tying it together with the
//!   host-supplied compiler, storage, and presenter collaborators.
//!
//! The host application owns prompt construction, the model transport, the
//! compiler, and all UI; this crate owns the loop.

pub mod cancel;
pub mod chat;
pub mod compile;
pub mod cycle;
pub mod errors;
pub mod presenter;
pub mod reduction;
pub mod request;
pub mod storage;
pub mod suite;

pub use cancel::{CancellationSignal, NeverCanceled};
pub use cycle::{CycleResult, FeedbackCycle, FeedbackCycleConfig, WarningKind};
pub use errors::LlmError;
pub use suite::{GeneratedTestCase, GeneratedTestSuite};
