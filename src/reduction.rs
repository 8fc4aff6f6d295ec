//! Prompt-size reduction: how to shrink an oversized request.
//!
//! The feedback cycle decides *when* to retry; the strategy decides *how*
//! the next prompt gets smaller. A strategy is consulted only after the
//! model rejects a prompt as too long.

/// Policy for producing a strictly smaller prompt.
///
/// `reduce_and_regenerate_prompt` must be callable repeatedly, each call
/// reducing further, until `is_reduction_possible` turns false. Given the
/// same internal state it must produce the same prompt.
pub trait PromptSizeReductionStrategy: Send {
    /// False once every shrinking option is exhausted.
    fn is_reduction_possible(&self) -> bool;

    /// Drop the next piece of optional content and re-render the prompt.
    fn reduce_and_regenerate_prompt(&mut self) -> String;
}

/// An optional context section of a prompt.
#[derive(Debug, Clone)]
pub struct PromptSection {
    pub label: String,
    pub body: String,
}

/// Reduction over a prompt assembled from a mandatory header plus optional
/// context sections. Each reduction drops the largest remaining section, so
/// the cheapest context is sacrificed first and every step shrinks the
/// rendered prompt.
#[derive(Debug, Clone)]
pub struct SectionDroppingReduction {
    header: String,
    sections: Vec<PromptSection>,
}

impl SectionDroppingReduction {
    pub fn new(header: impl Into<String>, sections: Vec<PromptSection>) -> Self {
        Self {
            header: header.into(),
            sections,
        }
    }

    /// Render the prompt from the header and the surviving sections.
    pub fn current_prompt(&self) -> String {
        let mut out = self.header.clone();
        for section in &self.sections {
            out.push_str("\n\n");
            out.push_str(&section.label);
            out.push('\n');
            out.push_str(&section.body);
        }
        out
    }
}

impl PromptSizeReductionStrategy for SectionDroppingReduction {
    fn is_reduction_possible(&self) -> bool {
        !self.sections.is_empty()
    }

    fn reduce_and_regenerate_prompt(&mut self) -> String {
        if let Some(largest) = (0..self.sections.len())
            .max_by_key(|&i| (self.sections[i].body.len(), std::cmp::Reverse(i)))
        {
            self.sections.remove(largest);
        }
        self.current_prompt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy() -> SectionDroppingReduction {
        SectionDroppingReduction::new(
            "Generate unit tests for Calculator.",
            vec![
                PromptSection {
                    label: "Callers:".into(),
                    body: "short".into(),
                },
                PromptSection {
                    label: "Dependencies:".into(),
                    body: "a much longer body of supporting context".into(),
                },
            ],
        )
    }

    #[test]
    fn each_reduction_strictly_shrinks_the_prompt() {
        let mut s = strategy();
        let full = s.current_prompt();
        let once = s.reduce_and_regenerate_prompt();
        let twice = s.reduce_and_regenerate_prompt();
        assert!(once.len() < full.len());
        assert!(twice.len() < once.len());
    }

    #[test]
    fn largest_section_is_dropped_first() {
        let mut s = strategy();
        let reduced = s.reduce_and_regenerate_prompt();
        assert!(reduced.contains("Callers:"));
        assert!(!reduced.contains("Dependencies:"));
    }

    #[test]
    fn exhausts_after_all_sections_are_gone() {
        let mut s = strategy();
        assert!(s.is_reduction_possible());
        s.reduce_and_regenerate_prompt();
        s.reduce_and_regenerate_prompt();
        assert!(!s.is_reduction_possible());
        assert_eq!(s.reduce_and_regenerate_prompt(), s.current_prompt());
    }

    #[test]
    fn reduction_is_deterministic_for_equal_state() {
        let mut a = strategy();
        let mut b = strategy();
        assert_eq!(
            a.reduce_and_regenerate_prompt(),
            b.reduce_and_regenerate_prompt()
        );
    }
}
