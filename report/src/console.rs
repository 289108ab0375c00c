//! Console rendering of the by-standard and by-test views.
//!
//! Rendering produces [`ConsoleLine`]s tagged with a [`Tone`]; only [`paint`]
//! knows how a tone looks on a terminal.

use std::io::{self, Write};

use colored::Colorize;

use crate::config::Configuration;
use crate::filter::Standards;
use crate::grouping::{group_by_test, OutcomeOrder, StandardsView};
use crate::outcome::{AuditOutcome, TestRunResult};

const INDENT: &str = "       ";

/// Semantic tone of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Headings and summaries.
    Plain,
    /// A passing rule.
    Pass,
    /// A failing rule.
    Fail,
    /// Secondary detail (help URLs, markup).
    Muted,
}

/// One line of console output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    /// How the line should be presented.
    pub tone: Tone,
    /// Line text without color codes.
    pub text: String,
}

impl ConsoleLine {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self::new(Tone::Plain, text)
    }

    fn blank() -> Self {
        Self::plain("")
    }
}

/// Applies terminal colors for the line's tone.
pub fn paint(line: &ConsoleLine) -> String {
    match line.tone {
        Tone::Plain => line.text.clone(),
        Tone::Pass => line.text.green().to_string(),
        Tone::Fail => line.text.red().to_string(),
        Tone::Muted => line.text.dimmed().to_string(),
    }
}

/// Writes painted lines to `out`.
///
/// # Errors
///
/// Returns the underlying I/O error if `out` rejects a write.
pub fn write_lines<W: Write>(out: &mut W, lines: &[ConsoleLine]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{}", paint(line))?;
    }
    Ok(())
}

/// Describes which standards the views are restricted to.
pub fn standards_message(standards: &Standards) -> String {
    if standards.is_empty() {
        "No filters specified - reporting on all standards".to_string()
    } else {
        format!(
            "Only returning results for the following standards: {}",
            standards
        )
    }
}

/// `1 pass and 2 violations`, singular exactly when a count is 1.
pub fn summary(passes: usize, violations: usize) -> String {
    format!(
        "{} {} and {} {}",
        passes,
        if passes == 1 { "pass" } else { "passes" },
        violations,
        if violations == 1 { "violation" } else { "violations" }
    )
}

/// `1 element failed:` / `3 elements failed:`.
pub fn elements_failed(count: usize) -> String {
    format!(
        "{} {} failed:",
        count,
        if count == 1 { "element" } else { "elements" }
    )
}

/// Renders the by-standard view: one line per rule under each standard.
pub fn render_by_standard(view: &StandardsView, standards: &Standards) -> Vec<ConsoleLine> {
    let mut lines = vec![
        ConsoleLine::blank(),
        ConsoleLine::plain("--- Accessibility test results by standard ---"),
        ConsoleLine::plain(standards_message(standards)),
    ];

    for group in &view.groups {
        lines.push(ConsoleLine::blank());
        lines.push(ConsoleLine::plain(format!("Standard: {}", group.standard)));

        for rule in &group.rules {
            let status = rule.status();
            let tone = if rule.is_failure() { Tone::Fail } else { Tone::Pass };
            lines.push(ConsoleLine::new(
                tone,
                format!(
                    " {}: {} ({} pass, {} fail)",
                    status.label(),
                    rule.help,
                    rule.pass_count,
                    rule.violation_count
                ),
            ));
        }
    }

    lines
}

/// Renders the by-test view. Tests with nothing left after filtering are skipped.
pub fn render_by_test(results: &[TestRunResult], config: &Configuration) -> Vec<ConsoleLine> {
    let mut lines = vec![
        ConsoleLine::blank(),
        ConsoleLine::plain("--- Accessibility test results by page ---"),
        ConsoleLine::plain(standards_message(&config.standards_to_report)),
    ];

    for group in group_by_test(results, OutcomeOrder::AsReported) {
        lines.push(ConsoleLine::blank());
        lines.push(ConsoleLine::plain(format!("Test: {}", group.test_name)));
        lines.push(ConsoleLine::plain(format!(
            "{}{}",
            INDENT,
            summary(group.pass_count(), group.violation_count())
        )));

        if config.display_passes {
            for outcome in &group.passes {
                lines.push(ConsoleLine::new(Tone::Pass, format!(" Pass: {}", outcome.help)));
            }
        }

        if config.display_violations {
            for outcome in &group.violations {
                render_violation(outcome, config, &mut lines);
            }
        }
    }

    lines
}

fn render_violation(outcome: &AuditOutcome, config: &Configuration, lines: &mut Vec<ConsoleLine>) {
    lines.push(ConsoleLine::new(Tone::Fail, format!(" Fail: {}", outcome.help)));

    if config.display_help_url {
        if let Some(url) = &outcome.help_url {
            lines.push(ConsoleLine::new(Tone::Muted, format!("{}{}", INDENT, url)));
        }
    }

    if config.display_context {
        lines.push(ConsoleLine::blank());
        lines.push(ConsoleLine::new(
            Tone::Muted,
            format!("{}{}", INDENT, elements_failed(outcome.nodes.len())),
        ));
        for node in &outcome.nodes {
            lines.push(ConsoleLine::new(Tone::Muted, format!("{}{}", INDENT, node.html)));
        }
        lines.push(ConsoleLine::blank());
    }
}
