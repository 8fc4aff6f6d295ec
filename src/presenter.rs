//! Rendering of suites and cases to compilable source text.

use crate::suite::{GeneratedTestSuite, test_class_name};

/// Pure formatting of generated tests; no side effects.
pub trait TestsPresenter: Send + Sync {
    /// Render the whole suite as one test class.
    fn render_suite(&self, suite: &GeneratedTestSuite) -> String;

    /// Render the case at `index` as a standalone single-test class.
    /// An out-of-range index renders the empty string.
    fn render_case(&self, suite: &GeneratedTestSuite, index: usize) -> String;
}

/// Default JUnit-style renderer: package line, imports, optional
/// `@RunWith`, then a public class wrapping the test bodies.
#[derive(Debug, Default, Clone, Copy)]
pub struct JUnitSuitePresenter;

/// Class name used for the whole-suite file.
pub const SUITE_CLASS_NAME: &str = "GeneratedTest";

impl TestsPresenter for JUnitSuitePresenter {
    fn render_suite(&self, suite: &GeneratedTestSuite) -> String {
        let body: String = suite
            .test_cases
            .iter()
            .map(|case| case.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        build_class(suite, SUITE_CLASS_NAME, &body)
    }

    fn render_case(&self, suite: &GeneratedTestSuite, index: usize) -> String {
        let Some(case) = suite.test_cases.get(index) else {
            return String::new();
        };
        build_class(suite, &test_class_name(&case.name), &case.text)
    }
}

fn build_class(suite: &GeneratedTestSuite, class_name: &str, body: &str) -> String {
    let mut out = String::new();

    if !suite.package_name.is_empty() {
        out.push_str(&format!("package {};\n\n", suite.package_name));
    }
    for import in &suite.imports {
        out.push_str(import);
        out.push('\n');
    }
    if !suite.imports.is_empty() {
        out.push('\n');
    }
    if !suite.run_with.is_empty() {
        out.push_str(&format!("@RunWith({})\n", suite.run_with));
    }
    out.push_str(&format!("public class {class_name} {{\n"));
    if !suite.other_info.is_empty() {
        out.push_str(&indent(suite.other_info.trim_end()));
        out.push_str("\n\n");
    }
    if !body.is_empty() {
        out.push_str(&indent(body));
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("    {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
