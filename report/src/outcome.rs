//! Audit result types: rule outcomes, severities, and per-test results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ReportError;

/// Severity of a rule outcome, as reported by the audit engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    /// No severity (passes usually carry none).
    #[default]
    None,
    /// Minor impact.
    Minor,
    /// Moderate impact.
    Moderate,
    /// Serious impact.
    Serious,
    /// Critical impact.
    Critical,
}

impl Impact {
    /// Parses an engine label; anything unrecognised is [`Impact::None`].
    pub fn from_label(label: &str) -> Self {
        match label {
            "minor" => Self::Minor,
            "moderate" => Self::Moderate,
            "serious" => Self::Serious,
            "critical" => Self::Critical,
            _ => Self::None,
        }
    }

    /// Lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Serious => "serious",
            Self::Critical => "critical",
        }
    }

    /// Sort rank: `none < minor < moderate < serious < critical`.
    pub fn rank(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Minor => 1,
            Self::Moderate => 2,
            Self::Serious => 3,
            Self::Critical => 4,
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Impact {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label: Option<String> = Option::deserialize(deserializer)?;
        Ok(label.as_deref().map(Impact::from_label).unwrap_or_default())
    }
}

/// A DOM node an outcome applies to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AffectedNode {
    /// Markup snippet of the node.
    #[serde(default)]
    pub html: String,
}

impl AffectedNode {
    /// Creates a node from its markup snippet.
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

/// One rule evaluation: a pass or a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditOutcome {
    /// Stable rule identifier (`id` on the wire).
    #[serde(rename = "id", alias = "ruleId")]
    pub rule_id: String,
    /// Short human summary of the rule.
    #[serde(default)]
    pub help: String,
    /// Reference documentation for the rule.
    #[serde(default)]
    pub help_url: Option<String>,
    /// Longer description of what the rule checks.
    #[serde(default)]
    pub description: String,
    /// Severity.
    #[serde(default)]
    pub impact: Impact,
    /// Standards this rule belongs to, in engine order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Nodes the outcome applies to.
    #[serde(default, alias = "affectedNodes")]
    pub nodes: Vec<AffectedNode>,
}

impl AuditOutcome {
    /// Creates an outcome with no tags, nodes, or severity.
    pub fn new(rule_id: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            help: help.into(),
            help_url: None,
            description: String::new(),
            impact: Impact::None,
            tags: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Sets the standards tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the severity.
    pub fn with_impact(mut self, impact: Impact) -> Self {
        self.impact = impact;
        self
    }

    /// Sets the help URL.
    pub fn with_help_url(mut self, url: impl Into<String>) -> Self {
        self.help_url = Some(url.into());
        self
    }

    /// Sets the affected nodes from markup snippets.
    pub fn with_nodes<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes = nodes.into_iter().map(AffectedNode::new).collect();
        self
    }
}

/// Raw result object returned by the audit engine.
///
/// Only `passes` and `violations` are read; other engine fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAuditResults {
    /// Rules the page satisfied.
    #[serde(default)]
    pub passes: Vec<AuditOutcome>,
    /// Rules the page violated.
    #[serde(default)]
    pub violations: Vec<AuditOutcome>,
}

/// One audit execution against one test or page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunResult {
    /// Name of the test that ran the audit.
    pub test_name: String,
    /// Browser the audit ran in; empty when unknown.
    pub browser_label: String,
    /// Passing outcomes.
    pub passes: Vec<AuditOutcome>,
    /// Violations.
    pub violations: Vec<AuditOutcome>,
}

impl TestRunResult {
    /// Wraps a raw engine result for `test_name`.
    pub fn from_raw(
        test_name: impl Into<String>,
        browser_label: impl Into<String>,
        raw: RawAuditResults,
    ) -> Self {
        Self {
            test_name: test_name.into(),
            browser_label: browser_label.into(),
            passes: raw.passes,
            violations: raw.violations,
        }
    }

    /// Number of passing outcomes.
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Number of violations.
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there is nothing to report for this test.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty() && self.violations.is_empty()
    }
}

/// Which list an outcome came from when tallying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultType {
    /// A passing outcome.
    Pass,
    /// A violation.
    Violation,
}

impl FromStr for ResultType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pass" => Ok(Self::Pass),
            "violation" => Ok(Self::Violation),
            other => Err(ReportError::InvalidResultType(other.to_string())),
        }
    }
}
