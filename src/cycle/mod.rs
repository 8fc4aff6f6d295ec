//! The generation feedback cycle.

pub mod runner;
pub mod types;

pub use runner::FeedbackCycle;
pub use types::{CycleResult, FeedbackCycleConfig, WarningKind};
