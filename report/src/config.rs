//! Reporting configuration and its defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::filter::Standards;

/// Configuration as supplied by the host; every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    /// Print each violation's help URL.
    #[serde(alias = "display_help_url")]
    pub display_help_url: Option<bool>,
    /// Print the markup of every node a violation applies to.
    #[serde(alias = "display_context")]
    pub display_context: Option<bool>,
    /// List passing rules per test.
    #[serde(alias = "display_passes")]
    pub display_passes: Option<bool>,
    /// List violations per test.
    #[serde(alias = "display_violations")]
    pub display_violations: Option<bool>,
    /// Never signal per-test pass/fail to the runner.
    #[serde(alias = "ignore_failures", alias = "ignoreAxeFailures")]
    pub ignore_failures: Option<bool>,
    /// Standards to report on; empty or absent means all.
    #[serde(alias = "standards_to_report")]
    pub standards_to_report: Option<Vec<String>>,
    /// Directory for the HTML report; no report is written when absent.
    #[serde(alias = "report_output_path", alias = "htmlReportPath")]
    pub report_output_path: Option<PathBuf>,
    /// Template file for the HTML report; the built-in template when absent.
    #[serde(alias = "template_path")]
    pub template_path: Option<PathBuf>,
    /// Browser the suite runs in, used in the report file name.
    #[serde(alias = "browser_label")]
    pub browser_label: Option<String>,
}

impl RawConfig {
    /// Applies defaults: display flags on, failures signalled, every standard reported.
    pub fn resolve(self) -> Configuration {
        Configuration {
            display_help_url: self.display_help_url.unwrap_or(true),
            display_context: self.display_context.unwrap_or(true),
            display_passes: self.display_passes.unwrap_or(true),
            display_violations: self.display_violations.unwrap_or(true),
            ignore_failures: self.ignore_failures.unwrap_or(false),
            standards_to_report: self
                .standards_to_report
                .map(Standards::new)
                .unwrap_or_default(),
            report_output_path: self.report_output_path,
            template_path: self.template_path,
            browser_label: self.browser_label.unwrap_or_default(),
        }
    }

    /// Loads a config file, TOML unless the extension is `.json`.
    ///
    /// A missing file yields an empty config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .map(|ext| ext == "json")
            .unwrap_or(false);

        if is_json {
            serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
        } else {
            toml::from_str(&contents).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Print each violation's help URL.
    pub display_help_url: bool,
    /// Print the markup of every node a violation applies to.
    pub display_context: bool,
    /// List passing rules per test.
    pub display_passes: bool,
    /// List violations per test.
    pub display_violations: bool,
    /// Never signal per-test pass/fail to the runner.
    pub ignore_failures: bool,
    /// Standards to report on; empty means all.
    pub standards_to_report: Standards,
    /// Directory for the HTML report.
    pub report_output_path: Option<PathBuf>,
    /// Template file for the HTML report.
    pub template_path: Option<PathBuf>,
    /// Browser the suite runs in.
    pub browser_label: String,
}

impl Configuration {
    /// Loads and resolves a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        RawConfig::load(path).map(RawConfig::resolve)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        RawConfig::default().resolve()
    }
}
