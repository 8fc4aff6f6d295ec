//! Data model for test suites produced by the model.

pub mod parser;

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// One generated test method.
///
/// Identity is structural: two cases are the same test iff their rendered
/// text is equal. The feedback cycle relies on this to deduplicate cases
/// that recur across rounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedTestCase {
    /// Method name, e.g. `testDivisionByZero`.
    pub name: String,
    /// Full rendered source of the method, including its `@Test` annotation.
    pub text: String,
}

impl PartialEq for GeneratedTestCase {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for GeneratedTestCase {}

impl Hash for GeneratedTestCase {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl std::fmt::Display for GeneratedTestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// A suite parsed out of one model response.
///
/// May hold zero test cases even when the response was syntactically valid;
/// the feedback cycle treats that as a distinct, retryable condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedTestSuite {
    pub package_name: String,
    /// Import lines, deduplicated and ordered.
    pub imports: BTreeSet<String>,
    /// Runner expression of a `@RunWith(...)` class annotation, if any.
    pub run_with: String,
    /// Class-body text preceding the first test: fields, setup methods.
    pub other_info: String,
    pub test_cases: Vec<GeneratedTestCase>,
}

impl GeneratedTestSuite {
    pub fn is_empty(&self) -> bool {
        self.test_cases.is_empty()
    }

    /// Replace the case list, keeping the suite's surrounding metadata.
    pub fn with_test_cases(mut self, test_cases: Vec<GeneratedTestCase>) -> Self {
        self.test_cases = test_cases;
        self
    }
}

/// Class name used when a single test case is materialized into its own file.
///
/// `testDivision` becomes `GeneratedTestDivision`.
pub fn test_class_name(case_name: &str) -> String {
    let mut chars = case_name.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };
    format!("Generated{capitalized}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn case_identity_ignores_name_and_follows_text() {
        let a = GeneratedTestCase {
            name: "testA".into(),
            text: "@Test\npublic void testA() {}".into(),
        };
        let b = GeneratedTestCase {
            name: "renamed".into(),
            text: "@Test\npublic void testA() {}".into(),
        };
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b), "same rendered text must deduplicate");
    }

    #[test]
    fn test_class_name_capitalizes_first_letter() {
        assert_eq!(test_class_name("testDivision"), "GeneratedTestDivision");
        assert_eq!(test_class_name("Division"), "GeneratedDivision");
        assert_eq!(test_class_name(""), "Generated");
    }
}
