//! Compiler collaborator contract.
//!
//! Compilation is an external, blocking service supplied by the host; the
//! feedback cycle only consumes the verdicts.

use std::collections::HashSet;
use std::path::Path;

use crate::suite::GeneratedTestCase;

/// Verdict of compiling a single source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationOutcome {
    pub success: bool,
    /// Compiler output, used verbatim in the corrective prompt on failure.
    pub diagnostics: String,
}

/// Verdict of compiling a batch of per-case files.
#[derive(Debug, Clone, Default)]
pub struct TestCasesCompilationResult {
    pub all_compilable: bool,
    /// The subset of `cases` whose files compiled.
    pub compilable_cases: HashSet<GeneratedTestCase>,
}

/// Compiles generated tests against the project's build classpath.
pub trait TestCompiler: Send + Sync {
    /// Compile each saved case file independently. `paths` and `cases` are
    /// index-paired: `paths[i]` holds the rendered source of `cases[i]`.
    fn compile_test_cases(
        &self,
        paths: &[std::path::PathBuf],
        build_classpath: &str,
        cases: &[GeneratedTestCase],
    ) -> TestCasesCompilationResult;

    /// Compile one source file, returning the verdict and diagnostics.
    fn compile_code(&self, path: &Path, build_classpath: &str) -> CompilationOutcome;
}

/// Batch helper for implementors: fold per-file verdicts into a
/// [`TestCasesCompilationResult`] using the index pairing.
pub fn collect_case_results<F>(
    paths: &[std::path::PathBuf],
    cases: &[GeneratedTestCase],
    mut compile_one: F,
) -> TestCasesCompilationResult
where
    F: FnMut(&Path) -> bool,
{
    let mut result = TestCasesCompilationResult {
        all_compilable: true,
        compilable_cases: HashSet::new(),
    };
    for (path, case) in paths.iter().zip(cases) {
        if compile_one(path) {
            result.compilable_cases.insert(case.clone());
        } else {
            result.all_compilable = false;
        }
    }
    result
}
