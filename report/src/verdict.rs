//! Per-test pass/fail verdicts.

use std::fmt;

use crate::filter::{filter_result, Standards};
use crate::outcome::TestRunResult;

/// Prefix of every verdict label.
pub const VERDICT_PREFIX: &str = "aXe";

/// Identity of the test case a verdict belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestInfo {
    /// Suite or category the test belongs to.
    pub category: String,
    /// Test name.
    pub name: String,
}

impl TestInfo {
    /// Creates a test identity.
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }

    /// `aXe - <category> - <name>`.
    pub fn label(&self) -> String {
        format!("{} - {} - {}", VERDICT_PREFIX, self.category, self.name)
    }
}

/// Outcome of one test case's audits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// At least one violation.
    Failed {
        /// Synthesized test label.
        label: String,
    },
    /// No violations and at least one pass.
    Passed {
        /// Synthesized test label.
        label: String,
    },
}

impl Verdict {
    /// Label of the test the verdict is for.
    pub fn label(&self) -> &str {
        match self {
            Self::Failed { label } | Self::Passed { label } => label,
        }
    }

    /// Returns true for [`Verdict::Failed`].
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Forwards the verdict to the test runner.
    pub fn signal(&self, sink: &mut dyn VerdictSink) {
        match self {
            Self::Failed { label } => sink.add_failure(label),
            Self::Passed { label } => sink.add_success(label),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { label } => write!(f, "FAIL {label}"),
            Self::Passed { label } => write!(f, "PASS {label}"),
        }
    }
}

/// Receives per-test verdicts; implemented by the host test runner.
pub trait VerdictSink {
    /// Marks the test failed under `label`.
    fn add_failure(&mut self, label: &str);
    /// Marks the test passed under `label`.
    fn add_success(&mut self, label: &str);
}

/// Collects verdicts in signal order.
impl VerdictSink for Vec<Verdict> {
    fn add_failure(&mut self, label: &str) {
        self.push(Verdict::Failed {
            label: label.to_string(),
        });
    }

    fn add_success(&mut self, label: &str) {
        self.push(Verdict::Passed {
            label: label.to_string(),
        });
    }
}

/// Computes the verdict for the results a test case produced.
///
/// Each result is filtered by `standards` first. Returns `None` when nothing
/// relevant remains: no passes and no violations say nothing either way.
pub fn compute_verdict<'a, I>(results: I, standards: &Standards, info: &TestInfo) -> Option<Verdict>
where
    I: IntoIterator<Item = &'a TestRunResult>,
{
    let (pass_count, violation_count) = results
        .into_iter()
        .map(|result| filter_result(result, standards))
        .fold((0usize, 0usize), |(passes, violations), result| {
            (
                passes + result.pass_count(),
                violations + result.violation_count(),
            )
        });

    if violation_count > 0 {
        Some(Verdict::Failed {
            label: info.label(),
        })
    } else if pass_count > 0 {
        Some(Verdict::Passed {
            label: info.label(),
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::AuditOutcome;

    fn run(passes: usize, violations: usize, tag: &str) -> TestRunResult {
        TestRunResult {
            test_name: "page".to_string(),
            browser_label: String::new(),
            passes: (0..passes)
                .map(|i| AuditOutcome::new(format!("pass-{i}"), "p").with_tags([tag]))
                .collect(),
            violations: (0..violations)
                .map(|i| AuditOutcome::new(format!("violation-{i}"), "v").with_tags([tag]))
                .collect(),
        }
    }

    fn info() -> TestInfo {
        TestInfo::new("checkout", "has no problems")
    }

    #[test]
    fn label_format() {
        assert_eq!(info().label(), "aXe - checkout - has no problems");
    }

    #[test]
    fn violations_fail_regardless_of_passes() {
        let results = [run(5, 0, "wcag2a"), run(1, 1, "wcag2a")];
        let verdict = compute_verdict(&results, &Standards::all(), &info());
        assert_eq!(
            verdict,
            Some(Verdict::Failed {
                label: "aXe - checkout - has no problems".to_string()
            })
        );
    }

    #[test]
    fn passes_only_is_success() {
        let verdict = compute_verdict(&[run(3, 0, "wcag2a")], &Standards::all(), &info());
        assert!(matches!(verdict, Some(Verdict::Passed { .. })));
    }

    #[test]
    fn nothing_relevant_means_no_verdict() {
        assert_eq!(compute_verdict(std::iter::empty(), &Standards::all(), &info()), None);

        let filtered_out = [run(0, 2, "best-practice")];
        assert_eq!(
            compute_verdict(&filtered_out, &Standards::new(["wcag2a"]), &info()),
            None
        );
    }

    #[test]
    fn vec_sink_records_signals() {
        let mut sink: Vec<Verdict> = Vec::new();
        Verdict::Failed {
            label: "x".to_string(),
        }
        .signal(&mut sink);
        Verdict::Passed {
            label: "y".to_string(),
        }
        .signal(&mut sink);
        assert!(sink[0].is_failure());
        assert_eq!(sink[1].label(), "y");
    }
}
