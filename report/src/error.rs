//! Error types for the reporting pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while generating reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A tally was recorded under a result type other than `pass` or `violation`.
    #[error("result type must be \"pass\" or \"violation\", got \"{0}\"")]
    InvalidResultType(String),

    /// The report template could not be read.
    #[error("cannot load report template {}", path.display())]
    TemplateLoad {
        /// Template file that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The template could not be parsed or rendered.
    #[error("cannot render report template")]
    TemplateRender(#[from] a11y_template::TemplateError),

    /// The payload could not be converted to the template data model.
    #[error("cannot serialize report payload")]
    Payload(#[from] serde_json::Error),

    /// The output directory could not be created.
    #[error("cannot create report directory {}", path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The rendered report could not be written.
    #[error("cannot write report {}", path.display())]
    Write {
        /// Report file that could not be written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Console output could not be written.
    #[error("cannot write console output")]
    Console(#[source] std::io::Error),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("cannot read config {}", path.display())]
    Read {
        /// Configuration file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML.
    #[error("invalid TOML in {}", path.display())]
    Toml {
        /// Configuration file.
        path: PathBuf,
        /// Parser failure.
        #[source]
        source: toml::de::Error,
    },

    /// The configuration file is not valid JSON.
    #[error("invalid JSON in {}", path.display())]
    Json {
        /// Configuration file.
        path: PathBuf,
        /// Parser failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Error reported by an [`AuditDriver`](crate::plugin::AuditDriver).
#[derive(Debug, Error)]
#[error("audit failed: {message}")]
pub struct DriverError {
    /// Driver-supplied description.
    pub message: String,
}

impl DriverError {
    /// Creates a driver error from a description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
