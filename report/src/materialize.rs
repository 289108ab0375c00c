//! Renders the by-test grouping through a template and writes the report file.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use a11y_template::{Helpers, Template};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::Configuration;
use crate::console::summary;
use crate::error::ReportError;
use crate::grouping::{group_by_test, OutcomeOrder};
use crate::outcome::{AuditOutcome, TestRunResult};

/// Template used when no `template_path` is configured.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/report.html");

/// One test in the report, outcomes most severe first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportGroup {
    /// Test name.
    pub test_name: String,
    /// `N pass(es) and M violation(s)`.
    pub summary: String,
    /// Passing outcomes.
    pub passes: Vec<AuditOutcome>,
    /// Violations.
    pub violations: Vec<AuditOutcome>,
}

/// Data handed to the template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    /// Non-empty tests in suite order.
    pub test_results: Vec<ReportGroup>,
    /// Browser the suite ran in.
    pub browser_label: String,
    /// Whether the template should list violations.
    pub display_violations: bool,
    /// Whether the template should list passes.
    pub display_passes: bool,
}

impl ReportPayload {
    /// Builds the payload from filtered results.
    pub fn build(results: &[TestRunResult], config: &Configuration) -> Self {
        let test_results = group_by_test(results, OutcomeOrder::BySeverity)
            .into_iter()
            .map(|group| ReportGroup {
                summary: summary(group.pass_count(), group.violation_count()),
                test_name: group.test_name,
                passes: group.passes,
                violations: group.violations,
            })
            .collect();

        Self {
            test_results,
            browser_label: config.browser_label.clone(),
            display_violations: config.display_violations,
            display_passes: config.display_passes,
        }
    }

    /// Returns true if no test has anything to report.
    pub fn is_empty(&self) -> bool {
        self.test_results.is_empty()
    }
}

/// The templating collaborator: turns a template and a payload into a document.
///
/// Implementations must provide the `link` and `titleCase` helpers.
pub trait TemplateRenderer {
    /// Renders `template` with `payload` as its data.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::TemplateRender`] if the template is malformed or
    /// uses something the renderer cannot provide.
    fn render(&self, template: &str, payload: &serde_json::Value) -> Result<String, ReportError>;
}

/// Renders with [`a11y_template`] and its standard helpers.
#[derive(Debug)]
pub struct BuiltinRenderer {
    helpers: Helpers,
}

impl BuiltinRenderer {
    /// Creates a renderer with `link` and `titleCase` registered.
    pub fn new() -> Self {
        Self {
            helpers: Helpers::standard(),
        }
    }
}

impl Default for BuiltinRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for BuiltinRenderer {
    fn render(&self, template: &str, payload: &serde_json::Value) -> Result<String, ReportError> {
        let template = Template::parse(template)?;
        Ok(template.render(payload, &self.helpers)?)
    }
}

/// `<dir>/a11y-<browser>.html`. An empty label is kept as is: `a11y-.html`.
pub fn report_path(dir: &Path, browser_label: &str) -> PathBuf {
    dir.join(format!("a11y-{}.html", browser_label))
}

/// Writes the HTML report for a suite.
#[derive(Debug)]
pub struct Materializer<R = BuiltinRenderer> {
    renderer: R,
}

impl Materializer<BuiltinRenderer> {
    /// Creates a materializer using the built-in template engine.
    pub fn new() -> Self {
        Self::with_renderer(BuiltinRenderer::new())
    }
}

impl Default for Materializer<BuiltinRenderer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: TemplateRenderer> Materializer<R> {
    /// Creates a materializer around another templating collaborator.
    pub fn with_renderer(renderer: R) -> Self {
        Self { renderer }
    }

    /// Renders and writes the report, returning where it was written.
    ///
    /// Returns `Ok(None)` without touching the file system when no output
    /// directory is configured or nothing survived filtering.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if the template cannot be loaded or rendered, or
    /// if the directory or file cannot be written.
    #[instrument(skip_all, fields(tests = results.len()))]
    pub fn materialize(
        &self,
        results: &[TestRunResult],
        config: &Configuration,
    ) -> Result<Option<PathBuf>, ReportError> {
        let Some(dir) = config.report_output_path.as_deref() else {
            info!("no report output path configured, skipping HTML report");
            return Ok(None);
        };

        let payload = ReportPayload::build(results, config);
        if payload.is_empty() {
            info!("no results left after filtering, skipping HTML report");
            return Ok(None);
        }

        let template = load_template(config.template_path.as_deref())?;
        let data = serde_json::to_value(&payload)?;
        let html = self.renderer.render(&template, &data)?;

        let path = report_path(dir, &config.browser_label);
        write_report(&path, &html)?;
        info!(path = %path.display(), "HTML report written");
        Ok(Some(path))
    }
}

fn load_template(path: Option<&Path>) -> Result<Cow<'static, str>, ReportError> {
    let Some(path) = path else {
        return Ok(Cow::Borrowed(DEFAULT_TEMPLATE));
    };
    fs::read_to_string(path).map(Cow::Owned).map_err(|source| {
        warn!(path = %path.display(), error = %source, "cannot load report template");
        ReportError::TemplateLoad {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Writes `content` to `path`, creating parent directories first.
fn write_report(path: &Path, content: &str) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ReportError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
