//! Parses a model response into a [`GeneratedTestSuite`].
//!
//! The model is asked to answer with a JUnit test class between ``` fences.
//! Parsing is deliberately forgiving: individual test methods that cannot be
//! understood are skipped, and only a response with no recognizable class
//! body at all counts as a parse failure.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::{GeneratedTestCase, GeneratedTestSuite};

static PACKAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*package\s+([\w.]+)\s*;").unwrap());

static IMPORT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*import\s+(?:static\s+)?[\w.]+(?:\.\*)?\s*;").unwrap());

static RUN_WITH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@RunWith\(([^)]+)\)").unwrap());

static TEST_SIGNATURE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"void\s+([A-Za-z_]\w*)\s*\(\s*\)([^{]*)\{").unwrap());

/// Package declared in a piece of test source, or an empty string.
pub fn package_from_test_code(code: &str) -> String {
    PACKAGE_REGEX
        .captures(code)
        .map(|c| c[1].to_string())
        .unwrap_or_default()
}

/// Parse the raw response text into a suite with the given package name.
///
/// Returns `None` when no class body can be located; a suite with zero test
/// cases is a valid (retryable) outcome, not a parse failure.
pub fn parse_test_suite(raw_text: &str, package_name: &str) -> Option<GeneratedTestSuite> {
    if raw_text.trim().is_empty() {
        return None;
    }

    let code = extract_code_block(raw_text);
    if !code.contains('{') {
        return None;
    }

    let imports: BTreeSet<String> = IMPORT_REGEX
        .find_iter(code)
        .map(|m| m.as_str().trim().to_string())
        .filter(|line| !line.contains("evosuite") && !line.contains("RunWith"))
        .collect();

    let run_with = RUN_WITH_REGEX
        .captures(code)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default();

    let mut sections = code.split("@Test");
    let preamble = sections.next().unwrap_or_default();
    let other_info = class_body_preamble(preamble);

    let mut test_cases = Vec::new();
    for section in sections {
        let raw_test = format!("@Test{section}");
        match parse_test_case(&raw_test) {
            Some(case) => test_cases.push(case),
            None => {
                let snippet: String = raw_test.chars().take(80).collect();
                warn!(snippet, "skipping unparsable test method");
            }
        }
    }

    Some(GeneratedTestSuite {
        package_name: package_name.to_string(),
        imports,
        run_with,
        other_info,
        test_cases,
    })
}

/// Contents of the first fenced code block, or the raw text when unfenced.
fn extract_code_block(raw_text: &str) -> &str {
    let Some(open) = raw_text.find("```") else {
        return raw_text;
    };
    let after_fence = &raw_text[open + 3..];
    let body = match after_fence.find("```") {
        Some(close) => &after_fence[..close],
        None => after_fence,
    };
    // Drop a bare language tag on the fence line ("```java").
    match body.split_once('\n') {
        Some((first, rest)) if first.trim().chars().all(|c| c.is_ascii_alphanumeric()) => rest,
        _ => body,
    }
}

/// Class-body text between the class opening brace and the first `@Test`:
/// fields, `@Before` methods, helper declarations.
fn class_body_preamble(preamble: &str) -> String {
    let mut parts = preamble.split('{');
    if parts.next().is_none() {
        return String::new();
    }
    let body = parts.collect::<Vec<_>>().join("{");
    let trimmed = body.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n\n")
    }
}

/// Parse a single `@Test`-prefixed method, text spanning annotation through
/// the matching closing brace.
fn parse_test_case(raw_test: &str) -> Option<GeneratedTestCase> {
    let signature = TEST_SIGNATURE_REGEX.captures(raw_test)?;
    let name = signature[1].to_string();

    let body_open = signature.get(0)?.end() - 1;
    let body_close = matching_brace(raw_test, body_open)?;

    Some(GeneratedTestCase {
        name,
        text: raw_test[..=body_close].trim().to_string(),
    })
}

/// Index of the brace closing the one at `open`, by depth counting.
fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in text[open..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }
    None
}
