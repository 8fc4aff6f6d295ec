//! Result and configuration types for the feedback cycle.

use std::path::PathBuf;

use crate::suite::{GeneratedTestCase, GeneratedTestSuite};

/// Default number of counted rounds before the cycle stops retrying.
pub const DEFAULT_REQUEST_BUDGET: u32 = 3;

/// Default file name for the whole-suite artifact.
pub const DEFAULT_SUITE_FILE_NAME: &str = "GeneratedTest.java";

/// Advisory notifications fired before a corrective retry.
///
/// Purely informational (UI, telemetry); the cycle's behavior never depends
/// on what the observer does with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The response could not be parsed into a test suite.
    ParsingFailed,
    /// The response parsed but contained no test cases, or was empty.
    NoCasesGenerated,
    /// At least one generated case failed to compile.
    CompilationError,
}

/// Terminal outcome of one feedback-cycle run.
///
/// `Success` is the only variant carrying a suite, so a result with a
/// payload but a failure tag (or the reverse) cannot be constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleResult {
    /// At least one round produced cases and every case known to the run
    /// compiles. `compilable_cases` is the accumulated set across rounds in
    /// first-seen order; the suite's case list matches the final working set.
    Success {
        suite: GeneratedTestSuite,
        compilable_cases: Vec<GeneratedTestCase>,
    },
    /// The retry budget ran out before any case compiled.
    NoCompilableCasesGenerated,
    /// The external cancellation signal fired.
    Canceled,
    /// The prompt is too large and the reduction strategy is exhausted.
    PromptTooLongUnrecoverable,
    /// A generated artifact could not be saved or went missing after save.
    PersistenceFailed,
}

impl CycleResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CycleResult::Success { .. })
    }
}

/// Static inputs of one feedback-cycle run.
#[derive(Debug, Clone)]
pub struct FeedbackCycleConfig {
    /// Prompt for the first round; later rounds rewrite it.
    pub initial_prompt: String,
    /// Package the generated suite belongs to.
    pub package_name: String,
    /// Counted rounds allowed before the final packaging round (`R`).
    pub request_budget: u32,
    /// File name for the whole-suite artifact.
    pub suite_file_name: String,
    /// Directory generated tests are saved under.
    pub result_dir: PathBuf,
    /// Classpath the generated tests must compile against.
    pub build_classpath: String,
}

impl FeedbackCycleConfig {
    pub fn new(
        initial_prompt: impl Into<String>,
        package_name: impl Into<String>,
        result_dir: impl Into<PathBuf>,
        build_classpath: impl Into<String>,
    ) -> Self {
        Self {
            initial_prompt: initial_prompt.into(),
            package_name: package_name.into(),
            request_budget: DEFAULT_REQUEST_BUDGET,
            suite_file_name: DEFAULT_SUITE_FILE_NAME.to_string(),
            result_dir: result_dir.into(),
            build_classpath: build_classpath.into(),
        }
    }

    pub fn with_request_budget(mut self, budget: u32) -> Self {
        self.request_budget = budget;
        self
    }
}
