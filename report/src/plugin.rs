//! Lifecycle hooks called by the host test runner.
//!
//! A suite drives one [`A11yPlugin`]:
//! 1. [`A11yPlugin::on_prepare`] resolves configuration
//! 2. [`A11yPlugin::run_audit`] (or the selector variant) per audit a test performs
//! 3. [`A11yPlugin::post_test`] after each test case, signalling its verdict
//! 4. [`A11yPlugin::post_results`] once at the end, printing and writing reports

use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::{Configuration, RawConfig};
use crate::console::{render_by_standard, render_by_test, write_lines};
use crate::error::{DriverError, ReportError};
use crate::filter::filter_results;
use crate::grouping::StandardsView;
use crate::materialize::{BuiltinRenderer, Materializer, TemplateRenderer};
use crate::outcome::{RawAuditResults, TestRunResult};
use crate::store::ResultStore;
use crate::verdict::{compute_verdict, TestInfo, Verdict, VerdictSink};

/// What part of the current page an audit covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditScope<'a> {
    /// The whole page.
    Page,
    /// Only the elements matching a CSS selector.
    Selector(&'a str),
}

/// Runs an accessibility audit in a browser; supplied by the host.
pub trait AuditDriver {
    /// Audits `scope` of the currently loaded page.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] if the audit could not run.
    fn analyze(&mut self, scope: AuditScope<'_>) -> Result<RawAuditResults, DriverError>;
}

/// Result of the end-of-suite pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteSummary {
    /// True if any rule failed any reported standard.
    pub any_failure: bool,
    /// Where the HTML report was written, if it was.
    pub report_path: Option<PathBuf>,
}

/// Accessibility reporting for one suite run.
#[derive(Debug)]
pub struct A11yPlugin<R = BuiltinRenderer> {
    config: Configuration,
    store: ResultStore,
    materializer: Materializer<R>,
}

impl A11yPlugin<BuiltinRenderer> {
    /// Resolves configuration defaults and starts an empty suite.
    pub fn on_prepare(raw: RawConfig) -> Self {
        Self::with_renderer(raw, BuiltinRenderer::new())
    }
}

impl<R: TemplateRenderer> A11yPlugin<R> {
    /// Like [`on_prepare`](A11yPlugin::on_prepare) with another templating collaborator.
    pub fn with_renderer(raw: RawConfig, renderer: R) -> Self {
        let config = raw.resolve();
        debug!(?config, "accessibility reporting prepared");
        Self {
            config,
            store: ResultStore::new(),
            materializer: Materializer::with_renderer(renderer),
        }
    }

    /// Resolved configuration.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Results recorded so far.
    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Records a raw audit result for `test_name`.
    pub fn add_results(&mut self, test_name: impl Into<String>, raw: RawAuditResults) {
        let result = TestRunResult::from_raw(test_name, self.config.browser_label.clone(), raw);
        self.store.append(result);
    }

    /// Audits the current page and records the result.
    ///
    /// # Errors
    ///
    /// Returns the driver's error; nothing is recorded in that case.
    pub fn run_audit(
        &mut self,
        test_name: &str,
        driver: &mut dyn AuditDriver,
    ) -> Result<RawAuditResults, DriverError> {
        self.audit(test_name, driver, AuditScope::Page)
    }

    /// Audits the elements matching `selector` and records the result.
    ///
    /// # Errors
    ///
    /// Returns the driver's error; nothing is recorded in that case.
    pub fn run_audit_with_selector(
        &mut self,
        test_name: &str,
        driver: &mut dyn AuditDriver,
        selector: &str,
    ) -> Result<RawAuditResults, DriverError> {
        self.audit(test_name, driver, AuditScope::Selector(selector))
    }

    fn audit(
        &mut self,
        test_name: &str,
        driver: &mut dyn AuditDriver,
        scope: AuditScope<'_>,
    ) -> Result<RawAuditResults, DriverError> {
        let raw = driver.analyze(scope)?;
        self.add_results(test_name, raw.clone());
        Ok(raw)
    }

    /// Computes and signals the verdict of the test case that just finished.
    ///
    /// The results recorded since the previous call are always consumed.
    /// Nothing is signalled when `ignore_failures` is set or when the test
    /// produced no relevant passes or violations.
    pub fn post_test(&mut self, info: &TestInfo, sink: &mut dyn VerdictSink) -> Option<Verdict> {
        let current = self.store.drain_current();
        if self.config.ignore_failures {
            debug!(test = %info.name, "failures ignored, no verdict signalled");
            return None;
        }

        let verdict = compute_verdict(
            current.iter().map(|result| &**result),
            &self.config.standards_to_report,
            info,
        )?;
        debug!(%verdict, "test verdict");
        verdict.signal(sink);
        Some(verdict)
    }

    /// Filters the suite, prints both console views to `out`, and writes the HTML report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if console output fails or the report cannot be
    /// materialized. Console output is complete before materialization starts.
    pub fn post_results<W: Write>(&self, out: &mut W) -> Result<SuiteSummary, ReportError> {
        let standards = &self.config.standards_to_report;
        let filtered = filter_results(self.store.all().iter().map(|result| &**result), standards);

        let view = StandardsView::build(&filtered);
        write_lines(out, &render_by_standard(&view, standards)).map_err(ReportError::Console)?;
        write_lines(out, &render_by_test(&filtered, &self.config)).map_err(ReportError::Console)?;

        let report_path = self.materializer.materialize(&filtered, &self.config)?;
        let summary = SuiteSummary {
            any_failure: view.any_failure(),
            report_path,
        };
        info!(
            tests = filtered.len(),
            any_failure = summary.any_failure,
            "accessibility results reported"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::AuditOutcome;

    struct FixedDriver {
        raw: RawAuditResults,
        scopes: Vec<String>,
    }

    impl AuditDriver for FixedDriver {
        fn analyze(&mut self, scope: AuditScope<'_>) -> Result<RawAuditResults, DriverError> {
            self.scopes.push(match scope {
                AuditScope::Page => "page".to_string(),
                AuditScope::Selector(selector) => selector.to_string(),
            });
            Ok(self.raw.clone())
        }
    }

    struct BrokenDriver;

    impl AuditDriver for BrokenDriver {
        fn analyze(&mut self, _: AuditScope<'_>) -> Result<RawAuditResults, DriverError> {
            Err(DriverError::new("browser not supported"))
        }
    }

    fn raw() -> RawAuditResults {
        RawAuditResults {
            passes: vec![AuditOutcome::new("html-has-lang", "lang").with_tags(["wcag2a"])],
            violations: vec![],
        }
    }

    #[test]
    fn audits_record_results_with_scope() {
        let mut plugin = A11yPlugin::on_prepare(RawConfig {
            browser_label: Some("chrome".to_string()),
            ..RawConfig::default()
        });
        let mut driver = FixedDriver {
            raw: raw(),
            scopes: Vec::new(),
        };

        let returned = plugin.run_audit("home", &mut driver).unwrap();
        assert_eq!(returned, raw());
        plugin
            .run_audit_with_selector("nav", &mut driver, "#main-nav")
            .unwrap();

        assert_eq!(driver.scopes, ["page", "#main-nav"]);
        assert_eq!(plugin.store().len(), 2);
        assert_eq!(plugin.store().all()[1].test_name, "nav");
        assert_eq!(plugin.store().all()[1].browser_label, "chrome");
    }

    #[test]
    fn driver_failure_records_nothing() {
        let mut plugin = A11yPlugin::on_prepare(RawConfig::default());
        let err = plugin.run_audit("home", &mut BrokenDriver).unwrap_err();
        assert_eq!(err.message, "browser not supported");
        assert!(plugin.store().is_empty());
    }

    #[test]
    fn post_test_drains_current_results() {
        let mut plugin = A11yPlugin::on_prepare(RawConfig::default());
        let mut sink: Vec<Verdict> = Vec::new();
        let info = TestInfo::new("home", "renders");

        plugin.add_results("home", raw());
        assert!(plugin.post_test(&info, &mut sink).is_some());
        assert!(plugin.store().current().is_empty());

        assert!(plugin.post_test(&info, &mut sink).is_none());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn ignored_failures_still_drain() {
        let mut plugin = A11yPlugin::on_prepare(RawConfig {
            ignore_failures: Some(true),
            ..RawConfig::default()
        });
        let mut sink: Vec<Verdict> = Vec::new();
        plugin.add_results("home", raw());

        assert!(plugin
            .post_test(&TestInfo::new("home", "renders"), &mut sink)
            .is_none());
        assert!(sink.is_empty());
        assert!(plugin.store().current().is_empty());
        assert_eq!(plugin.store().len(), 1);
    }
}
