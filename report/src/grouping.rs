//! Groups filtered results by standard and by test, and derives verdicts.

use std::cmp::Reverse;
use std::collections::HashMap;

use serde::Serialize;

use crate::error::ReportError;
use crate::outcome::{AuditOutcome, ResultType, TestRunResult};

/// Pass/fail status of a rule under a standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    /// No violations and at least one pass.
    Pass,
    /// At least one violation.
    Fail,
}

impl Status {
    /// Label used in console output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
        }
    }
}

/// Pass and violation counters for one rule under one standard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTally {
    /// Rule identifier.
    pub rule_id: String,
    /// Passing outcomes seen for this rule.
    pub pass_count: usize,
    /// Violations seen for this rule.
    pub violation_count: usize,
    /// Help text of the most recent outcome.
    pub help: String,
    /// Description of the most recent outcome.
    pub description: String,
    /// Help URL of the most recent outcome.
    pub help_url: Option<String>,
}

impl RuleTally {
    fn new(rule_id: &str) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            pass_count: 0,
            violation_count: 0,
            help: String::new(),
            description: String::new(),
            help_url: None,
        }
    }

    /// Fail as soon as one violation was seen, whatever the pass count.
    pub fn status(&self) -> Status {
        if self.violation_count > 0 {
            Status::Fail
        } else {
            Status::Pass
        }
    }

    /// Returns true if the rule failed this standard.
    pub fn is_failure(&self) -> bool {
        self.status() == Status::Fail
    }
}

/// Rules tallied under one standard, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandardGroup {
    /// Standard identifier.
    pub standard: String,
    /// Tallies in the order their rule was first seen under this standard.
    pub rules: Vec<RuleTally>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl StandardGroup {
    fn new(standard: &str) -> Self {
        Self {
            standard: standard.to_string(),
            rules: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn tally_mut(&mut self, rule_id: &str) -> &mut RuleTally {
        let pos = match self.index.get(rule_id) {
            Some(&pos) => pos,
            None => {
                self.rules.push(RuleTally::new(rule_id));
                let pos = self.rules.len() - 1;
                self.index.insert(rule_id.to_string(), pos);
                pos
            }
        };
        &mut self.rules[pos]
    }

    /// Looks up the tally for `rule_id`.
    pub fn rule(&self, rule_id: &str) -> Option<&RuleTally> {
        self.index.get(rule_id).map(|&pos| &self.rules[pos])
    }
}

/// Results grouped by standard, then by rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StandardsView {
    /// Standards in first-seen order.
    pub groups: Vec<StandardGroup>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl StandardsView {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tallies every result's passes, then its violations, in suite order.
    pub fn build<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a TestRunResult>,
    {
        let mut view = Self::new();
        for result in results {
            for outcome in &result.passes {
                view.record(outcome, ResultType::Pass);
            }
            for outcome in &result.violations {
                view.record(outcome, ResultType::Violation);
            }
        }
        view
    }

    /// Counts `outcome` once under each of its tags.
    pub fn record(&mut self, outcome: &AuditOutcome, result_type: ResultType) {
        for tag in &outcome.tags {
            let tally = self.group_mut(tag).tally_mut(&outcome.rule_id);
            match result_type {
                ResultType::Pass => tally.pass_count += 1,
                ResultType::Violation => tally.violation_count += 1,
            }
            tally.help.clone_from(&outcome.help);
            tally.description.clone_from(&outcome.description);
            tally.help_url.clone_from(&outcome.help_url);
        }
    }

    /// Like [`record`](Self::record), with the result type given by its label.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidResultType`] unless the label is `pass` or
    /// `violation`; nothing is tallied in that case.
    pub fn record_labelled(
        &mut self,
        outcome: &AuditOutcome,
        result_type: &str,
    ) -> Result<(), ReportError> {
        let result_type: ResultType = result_type.parse()?;
        self.record(outcome, result_type);
        Ok(())
    }

    fn group_mut(&mut self, standard: &str) -> &mut StandardGroup {
        let pos = match self.index.get(standard) {
            Some(&pos) => pos,
            None => {
                self.groups.push(StandardGroup::new(standard));
                let pos = self.groups.len() - 1;
                self.index.insert(standard.to_string(), pos);
                pos
            }
        };
        &mut self.groups[pos]
    }

    /// Looks up the group for `standard`.
    pub fn group(&self, standard: &str) -> Option<&StandardGroup> {
        self.index.get(standard).map(|&pos| &self.groups[pos])
    }

    /// Returns true if any rule failed any standard.
    pub fn any_failure(&self) -> bool {
        self.groups
            .iter()
            .flat_map(|group| &group.rules)
            .any(RuleTally::is_failure)
    }

    /// Returns true if nothing was tallied.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Order of outcomes within a by-test group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeOrder {
    /// Engine order.
    AsReported,
    /// Most severe first; equal severities keep engine order.
    BySeverity,
}

/// Stable sort, most severe first. Outcomes without an impact sort after `minor`.
pub fn sort_by_severity(outcomes: &mut [AuditOutcome]) {
    outcomes.sort_by_key(|outcome| Reverse(outcome.impact.rank()));
}

/// One group per test in suite order, skipping tests with nothing left to report.
pub fn group_by_test<'a, I>(results: I, order: OutcomeOrder) -> Vec<TestRunResult>
where
    I: IntoIterator<Item = &'a TestRunResult>,
{
    results
        .into_iter()
        .filter(|result| !result.is_empty())
        .map(|result| {
            let mut group = result.clone();
            if order == OutcomeOrder::BySeverity {
                sort_by_severity(&mut group.passes);
                sort_by_severity(&mut group.violations);
            }
            group
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Impact;

    fn run(passes: Vec<AuditOutcome>, violations: Vec<AuditOutcome>) -> TestRunResult {
        TestRunResult {
            test_name: "page".to_string(),
            browser_label: String::new(),
            passes,
            violations,
        }
    }

    #[test]
    fn tallies_per_standard_and_rule_in_first_seen_order() {
        let results = vec![
            run(
                vec![
                    AuditOutcome::new("html-has-lang", "lang").with_tags(["wcag2a", "wcag311"]),
                    AuditOutcome::new("image-alt", "alt").with_tags(["wcag2a"]),
                ],
                vec![AuditOutcome::new("color-contrast", "contrast").with_tags(["wcag2aa"])],
            ),
            run(
                vec![AuditOutcome::new("image-alt", "alt").with_tags(["wcag2a"])],
                vec![AuditOutcome::new("image-alt", "alt v2").with_tags(["wcag2a"])],
            ),
        ];

        let view = StandardsView::build(&results);
        let standards: Vec<&str> = view.groups.iter().map(|g| g.standard.as_str()).collect();
        assert_eq!(standards, ["wcag2a", "wcag311", "wcag2aa"]);

        let wcag2a = view.group("wcag2a").unwrap();
        let rules: Vec<&str> = wcag2a.rules.iter().map(|r| r.rule_id.as_str()).collect();
        assert_eq!(rules, ["html-has-lang", "image-alt"]);

        let image_alt = wcag2a.rule("image-alt").unwrap();
        assert_eq!(image_alt.pass_count, 2);
        assert_eq!(image_alt.violation_count, 1);
        assert_eq!(image_alt.help, "alt v2");
        assert_eq!(image_alt.status(), Status::Fail);
        assert!(view.any_failure());
    }

    #[test]
    fn status_is_fail_iff_any_violation() {
        let mut tally = RuleTally::new("r");
        tally.pass_count = 10;
        assert_eq!(tally.status(), Status::Pass);
        tally.violation_count = 1;
        assert_eq!(tally.status(), Status::Fail);
    }

    #[test]
    fn untagged_outcomes_are_not_tallied() {
        let view = StandardsView::build(&[run(vec![AuditOutcome::new("r", "h")], vec![])]);
        assert!(view.is_empty());
        assert!(!view.any_failure());
    }

    #[test]
    fn invalid_result_type_is_rejected() {
        let mut view = StandardsView::new();
        let outcome = AuditOutcome::new("r", "h").with_tags(["wcag2a"]);
        assert!(matches!(
            view.record_labelled(&outcome, "incomplete"),
            Err(ReportError::InvalidResultType(_))
        ));
        assert!(view.is_empty());

        view.record_labelled(&outcome, "violation").unwrap();
        assert_eq!(view.group("wcag2a").unwrap().rules[0].violation_count, 1);
    }

    #[test]
    fn severity_sort_is_stable_and_descending() {
        let mut outcomes = vec![
            AuditOutcome::new("a", "").with_impact(Impact::Minor),
            AuditOutcome::new("b", "").with_impact(Impact::Critical),
            AuditOutcome::new("c", "").with_impact(Impact::Moderate),
            AuditOutcome::new("d", "").with_impact(Impact::Minor),
        ];
        sort_by_severity(&mut outcomes);
        let ids: Vec<&str> = outcomes.iter().map(|o| o.rule_id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a", "d"]);
    }

    #[test]
    fn outcomes_without_impact_sort_last_in_input_order() {
        let mut outcomes = vec![
            AuditOutcome::new("first-unranked", ""),
            AuditOutcome::new("minor", "").with_impact(Impact::Minor),
            AuditOutcome::new("second-unranked", ""),
            AuditOutcome::new("serious", "").with_impact(Impact::Serious),
        ];
        sort_by_severity(&mut outcomes);
        let ids: Vec<&str> = outcomes.iter().map(|o| o.rule_id.as_str()).collect();
        assert_eq!(ids, ["serious", "minor", "first-unranked", "second-unranked"]);
    }

    #[test]
    fn group_by_test_skips_empty_and_sorts() {
        let results = vec![
            run(vec![], vec![]),
            run(
                vec![],
                vec![
                    AuditOutcome::new("low", "").with_impact(Impact::Minor),
                    AuditOutcome::new("high", "").with_impact(Impact::Serious),
                ],
            ),
        ];

        let groups = group_by_test(&results, OutcomeOrder::BySeverity);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].violations[0].rule_id, "high");

        let groups = group_by_test(&results, OutcomeOrder::AsReported);
        assert_eq!(groups[0].violations[0].rule_id, "low");
    }
}
