//! Accessibility audit reporting.
//!
//! Collects the raw results of accessibility audits run during a test suite,
//! narrows them to the standards an operator cares about, and reports them
//! two ways: per standard and rule, and per test.
//!
//! # Pipeline
//!
//! | Stage | Module |
//! |-------|--------|
//! | Accumulate audit results | [`store`] |
//! | Filter by standard | [`filter`] |
//! | Group and tally | [`grouping`] |
//! | Per-test verdicts | [`verdict`] |
//! | Console output | [`console`] |
//! | HTML report | [`materialize`] |
//!
//! # Entry Point
//!
//! ```no_run
//! use a11y_report::{A11yPlugin, RawAuditResults, RawConfig, TestInfo, Verdict};
//!
//! let mut plugin = A11yPlugin::on_prepare(RawConfig {
//!     standards_to_report: Some(vec!["wcag2a".to_string(), "wcag2aa".to_string()]),
//!     report_output_path: Some("reports".into()),
//!     ..RawConfig::default()
//! });
//!
//! let raw: RawAuditResults = serde_json::from_str(r#"{"passes": [], "violations": []}"#)?;
//! plugin.add_results("home page", raw);
//!
//! let mut verdicts: Vec<Verdict> = Vec::new();
//! plugin.post_test(&TestInfo::new("smoke", "home page"), &mut verdicts);
//!
//! let summary = plugin.post_results(&mut std::io::stdout())?;
//! assert!(!summary.any_failure);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod console;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod materialize;
pub mod outcome;
pub mod plugin;
pub mod store;
pub mod verdict;

pub use config::{Configuration, RawConfig};
pub use error::{ConfigError, DriverError, ReportError};
pub use filter::{filter_result, Standards};
pub use grouping::{RuleTally, Status, StandardsView};
pub use materialize::{Materializer, TemplateRenderer};
pub use outcome::{AffectedNode, AuditOutcome, Impact, RawAuditResults, ResultType, TestRunResult};
pub use plugin::{A11yPlugin, AuditDriver, AuditScope, SuiteSummary};
pub use store::ResultStore;
pub use verdict::{TestInfo, Verdict, VerdictSink};
