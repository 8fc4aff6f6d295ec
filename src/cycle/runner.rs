//! The feedback state machine: request, classify, persist, compile, retry.

use tracing::{debug, info, warn};

use super::types::{CycleResult, FeedbackCycleConfig, WarningKind};
use crate::cancel::CancellationSignal;
use crate::compile::TestCompiler;
use crate::errors::LlmError;
use crate::presenter::TestsPresenter;
use crate::reduction::PromptSizeReductionStrategy;
use crate::request::{RequestManager, ResponseAssembler};
use crate::storage::TestStorage;
use crate::suite::{GeneratedTestCase, test_class_name};

const EMPTY_ANSWER_PROMPT: &str =
    "You have provided an empty answer! Please answer my previous question with the same formats.";

const UNPARSABLE_PROMPT: &str =
    "The provided code is not parsable. Please, generate the correct code.";

fn compile_error_prompt(diagnostics: &str) -> String {
    format!(
        "I cannot compile the tests that you provided. The error is:\n```\n{diagnostics}\n```\nFix this issue in the provided tests.\nGenerate public classes and public methods. Response only a code with tests between ```, do not provide any other text."
    )
}

/// Drives one logical generation request through up to `R` counted rounds.
///
/// Each round asks the model, classifies what came back, persists and
/// compiles candidate cases, and either terminates or rewrites the prompt.
/// Cases that compile are accumulated across rounds and survive later
/// failed rounds; an oversized-prompt rejection is retried through the
/// reduction strategy without consuming budget.
pub struct FeedbackCycle {
    config: FeedbackCycleConfig,
    request_manager: Box<dyn RequestManager>,
    assembler: Box<dyn ResponseAssembler>,
    reduction: Box<dyn PromptSizeReductionStrategy>,
    compiler: Box<dyn TestCompiler>,
    storage: Box<dyn TestStorage>,
    presenter: Box<dyn TestsPresenter>,
    cancel: Box<dyn CancellationSignal>,
}

impl FeedbackCycle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: FeedbackCycleConfig,
        request_manager: Box<dyn RequestManager>,
        assembler: Box<dyn ResponseAssembler>,
        reduction: Box<dyn PromptSizeReductionStrategy>,
        compiler: Box<dyn TestCompiler>,
        storage: Box<dyn TestStorage>,
        presenter: Box<dyn TestsPresenter>,
        cancel: Box<dyn CancellationSignal>,
    ) -> Self {
        Self {
            config,
            request_manager,
            assembler,
            reduction,
            compiler,
            storage,
            presenter,
            cancel,
        }
    }

    /// Run the cycle to termination.
    ///
    /// `on_warning` is fired synchronously before each corrective retry; it
    /// is advisory only and cannot influence the returned result.
    pub async fn run(mut self, mut on_warning: impl FnMut(WarningKind)) -> CycleResult {
        let budget = self.config.request_budget;
        // Budget consumption happens at exactly one point per round; the
        // oversized-prompt branch never reaches it.
        let mut rounds_used: u32 = 0;
        let mut next_prompt = self.config.initial_prompt.clone();
        // Compilable cases accumulated across rounds, first-seen order.
        let mut compilable_cases: Vec<GeneratedTestCase> = Vec::new();

        loop {
            if self.cancel.is_canceled() {
                info!("generation canceled before round start");
                return CycleResult::Canceled;
            }

            let round = rounds_used + 1;
            let is_final_round = round > budget;
            if is_final_round && compilable_cases.is_empty() {
                info!(budget, "request budget exhausted without a compilable case");
                return CycleResult::NoCompilableCasesGenerated;
            }

            info!(round, is_final_round, "feedback cycle round");

            self.assembler.clear();
            let outcome = self
                .request_manager
                .request(
                    &next_prompt,
                    &*self.cancel,
                    &self.config.package_name,
                    &mut *self.assembler,
                    false,
                )
                .await;

            let suite = match outcome {
                Err(LlmError::PromptTooLong) => {
                    if self.reduction.is_reduction_possible() {
                        debug!("prompt too long; shrinking and retrying for free");
                        next_prompt = self.reduction.reduce_and_regenerate_prompt();
                        continue;
                    }
                    warn!("prompt too long and reduction options are exhausted");
                    return CycleResult::PromptTooLongUnrecoverable;
                }
                Err(LlmError::ParseFailure) => {
                    rounds_used = round;
                    warn!(round, "response was not parsable");
                    on_warning(WarningKind::ParsingFailed);
                    next_prompt = UNPARSABLE_PROMPT.to_string();
                    continue;
                }
                Err(LlmError::EmptyResponse) => {
                    rounds_used = round;
                    warn!(round, "model returned an empty response");
                    on_warning(WarningKind::NoCasesGenerated);
                    next_prompt = EMPTY_ANSWER_PROMPT.to_string();
                    continue;
                }
                Ok(suite) if suite.is_empty() => {
                    rounds_used = round;
                    warn!(round, "response parsed but contained no test cases");
                    on_warning(WarningKind::NoCasesGenerated);
                    next_prompt = EMPTY_ANSWER_PROMPT.to_string();
                    continue;
                }
                Ok(suite) => suite,
            };
            rounds_used = round;
            debug!(round, cases = suite.test_cases.len(), "suite received");

            // A request can take a long time; re-check before doing work.
            if self.cancel.is_canceled() {
                info!("generation canceled after response");
                return CycleResult::Canceled;
            }

            if is_final_round {
                // Package only what is already known to compile. The cases
                // were verified from their saved files in earlier rounds, but
                // the suite artifact on disk still holds the last full
                // response; rewrite it so it matches the returned result.
                info!(
                    cases = compilable_cases.len(),
                    "final round: packaging accumulated compilable cases"
                );
                let suite = suite.with_test_cases(compilable_cases.clone());
                let suite_path = match self.storage.save_generated_test(
                    &suite.package_name,
                    &self.presenter.render_suite(&suite),
                    &self.config.result_dir,
                    &self.config.suite_file_name,
                ) {
                    Ok(path) => path,
                    Err(error) => {
                        warn!(%error, "failed to save the repackaged test suite");
                        return CycleResult::PersistenceFailed;
                    }
                };
                if !suite_path.exists() {
                    warn!("repackaged test suite is missing after save");
                    return CycleResult::PersistenceFailed;
                }
                return CycleResult::Success {
                    suite,
                    compilable_cases,
                };
            }

            // Persist each case and the whole suite, recording paths.
            let mut case_paths = Vec::with_capacity(suite.test_cases.len());
            for index in 0..suite.test_cases.len() {
                let file_name = format!("{}.java", test_class_name(&suite.test_cases[index].name));
                let rendered = self.presenter.render_case(&suite, index);
                match self.storage.save_generated_test(
                    &suite.package_name,
                    &rendered,
                    &self.config.result_dir,
                    &file_name,
                ) {
                    Ok(path) => case_paths.push(path),
                    Err(error) => {
                        warn!(%error, "failed to save a generated test case");
                        return CycleResult::PersistenceFailed;
                    }
                }
            }
            let suite_path = match self.storage.save_generated_test(
                &suite.package_name,
                &self.presenter.render_suite(&suite),
                &self.config.result_dir,
                &self.config.suite_file_name,
            ) {
                Ok(path) => path,
                Err(error) => {
                    warn!(%error, "failed to save the generated test suite");
                    return CycleResult::PersistenceFailed;
                }
            };
            if case_paths
                .iter()
                .chain(std::iter::once(&suite_path))
                .any(|path| !path.exists())
            {
                warn!("a generated test file is missing after save");
                return CycleResult::PersistenceFailed;
            }

            // Compile the per-case files and the suite file independently.
            let case_result = self.compiler.compile_test_cases(
                &case_paths,
                &self.config.build_classpath,
                &suite.test_cases,
            );
            let suite_outcome = self
                .compiler
                .compile_code(&suite_path, &self.config.build_classpath);

            // Merge newly-compiling cases; the accumulator never shrinks.
            for case in &suite.test_cases {
                if case_result.compilable_cases.contains(case) && !compilable_cases.contains(case) {
                    compilable_cases.push(case.clone());
                }
            }

            if !case_result.all_compilable {
                warn!(
                    round,
                    compilable = compilable_cases.len(),
                    "suite contains non-compilable cases"
                );
                on_warning(WarningKind::CompilationError);
                next_prompt = compile_error_prompt(&suite_outcome.diagnostics);
                continue;
            }

            info!(round, cases = suite.test_cases.len(), "all test cases compile");
            return CycleResult::Success {
                suite,
                compilable_cases,
            };
        }
    }
}
