//! Narrows audit results to the standards an operator asked for.
//!
//! Filtering returns new values instead of editing outcomes in place, so the
//! same stored result can be filtered for the per-test verdict and again for
//! the end-of-suite report without compounding.

use std::fmt;

use tracing::debug;

use crate::outcome::{AuditOutcome, TestRunResult};

/// Ordered, de-duplicated set of standard identifiers. Empty means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Standards(Vec<String>);

impl Standards {
    /// Builds a set, keeping first occurrences in order.
    pub fn new<I, S>(standards: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for standard in standards {
            let standard = standard.into();
            if !unique.contains(&standard) {
                unique.push(standard);
            }
        }
        Self(unique)
    }

    /// The set that reports every standard.
    pub fn all() -> Self {
        Self::default()
    }

    /// Returns true when no filter is configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Configured identifiers in order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Returns true if `tag` should be reported.
    pub fn admits(&self, tag: &str) -> bool {
        self.is_empty() || self.0.iter().any(|s| s == tag)
    }

    /// Returns true if at least one of `tags` should be reported.
    ///
    /// With an active filter an untagged outcome matches nothing.
    pub fn admits_any(&self, tags: &[String]) -> bool {
        self.is_empty() || tags.iter().any(|tag| self.admits(tag))
    }
}

impl fmt::Display for Standards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

/// Returns the outcomes of `outcomes` that match `standards`, with tags narrowed.
pub fn filter_outcomes(outcomes: &[AuditOutcome], standards: &Standards) -> Vec<AuditOutcome> {
    outcomes
        .iter()
        .filter(|outcome| standards.admits_any(&outcome.tags))
        .map(|outcome| AuditOutcome {
            tags: outcome
                .tags
                .iter()
                .filter(|tag| standards.admits(tag))
                .cloned()
                .collect(),
            ..outcome.clone()
        })
        .collect()
}

/// Filters one test's passes and violations independently.
pub fn filter_result(result: &TestRunResult, standards: &Standards) -> TestRunResult {
    let filtered = TestRunResult {
        test_name: result.test_name.clone(),
        browser_label: result.browser_label.clone(),
        passes: filter_outcomes(&result.passes, standards),
        violations: filter_outcomes(&result.violations, standards),
    };
    debug!(
        test = %result.test_name,
        passes_before = result.pass_count(),
        passes_after = filtered.pass_count(),
        violations_before = result.violation_count(),
        violations_after = filtered.violation_count(),
        "filtered by standard"
    );
    filtered
}

/// Filters every result in suite order.
pub fn filter_results<'a, I>(results: I, standards: &Standards) -> Vec<TestRunResult>
where
    I: IntoIterator<Item = &'a TestRunResult>,
{
    results
        .into_iter()
        .map(|result| filter_result(result, standards))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> TestRunResult {
        TestRunResult {
            test_name: "home".to_string(),
            browser_label: String::new(),
            passes: vec![
                AuditOutcome::new("html-has-lang", "lang").with_tags(["wcag2a", "wcag311"]),
                AuditOutcome::new("region", "landmarks").with_tags(["best-practice"]),
                AuditOutcome::new("untagged", "no tags"),
            ],
            violations: vec![
                AuditOutcome::new("color-contrast", "contrast").with_tags(["wcag2aa", "wcag143"]),
                AuditOutcome::new("image-alt", "alt").with_tags(["wcag2a", "section508"]),
            ],
        }
    }

    #[test]
    fn empty_set_passes_everything_through() {
        let result = sample();
        assert_eq!(filter_result(&result, &Standards::all()), result);
    }

    #[test]
    fn drops_unmatched_and_untagged_outcomes() {
        let filtered = filter_result(&sample(), &Standards::new(["wcag2a"]));
        let pass_ids: Vec<&str> = filtered.passes.iter().map(|o| o.rule_id.as_str()).collect();
        let violation_ids: Vec<&str> = filtered
            .violations
            .iter()
            .map(|o| o.rule_id.as_str())
            .collect();
        assert_eq!(pass_ids, ["html-has-lang"]);
        assert_eq!(violation_ids, ["image-alt"]);
    }

    #[test]
    fn narrows_tags_in_order() {
        let filtered = filter_result(&sample(), &Standards::new(["section508", "wcag2a"]));
        assert_eq!(filtered.violations[0].tags, ["wcag2a", "section508"]);
        assert_eq!(filtered.passes[0].tags, ["wcag2a"]);
    }

    #[test]
    fn source_is_untouched() {
        let result = sample();
        let _ = filter_result(&result, &Standards::new(["wcag2aa"]));
        assert_eq!(result, sample());
    }

    #[test]
    fn standards_deduplicate_and_display() {
        let standards = Standards::new(["wcag2a", "wcag2aa", "wcag2a"]);
        assert_eq!(standards.as_slice(), ["wcag2a", "wcag2aa"]);
        assert_eq!(standards.to_string(), "wcag2a,wcag2aa");
    }

    fn arb_tag() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["wcag2a", "wcag2aa", "wcag21aa", "best-practice", "section508"])
            .prop_map(str::to_string)
    }

    fn arb_outcome() -> impl Strategy<Value = AuditOutcome> {
        ("[a-z-]{1,12}", prop::collection::vec(arb_tag(), 0..4))
            .prop_map(|(id, tags)| AuditOutcome::new(id, "help").with_tags(tags))
    }

    fn arb_result() -> impl Strategy<Value = TestRunResult> {
        (
            prop::collection::vec(arb_outcome(), 0..6),
            prop::collection::vec(arb_outcome(), 0..6),
        )
            .prop_map(|(passes, violations)| TestRunResult {
                test_name: "t".to_string(),
                browser_label: String::new(),
                passes,
                violations,
            })
    }

    fn arb_standards() -> impl Strategy<Value = Standards> {
        prop::collection::vec(arb_tag(), 0..3).prop_map(Standards::new)
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent(result in arb_result(), standards in arb_standards()) {
            let once = filter_result(&result, &standards);
            let twice = filter_result(&once, &standards);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn remaining_tags_are_a_subset(result in arb_result(), standards in arb_standards()) {
            prop_assume!(!standards.is_empty());
            let filtered = filter_result(&result, &standards);
            for outcome in filtered.passes.iter().chain(&filtered.violations) {
                prop_assert!(!outcome.tags.is_empty());
                for tag in &outcome.tags {
                    prop_assert!(standards.as_slice().contains(tag));
                }
            }
        }

        #[test]
        fn empty_filter_is_total(result in arb_result()) {
            prop_assert_eq!(filter_result(&result, &Standards::all()), result);
        }
    }
}
