//! `a11y-report`: reports accessibility audit results saved as JSON.
//!
//! Each input file holds the raw output of one audit (`passes` and
//! `violations`). The file stem names the test and the parent directory names
//! its category.
//!
//! **Usage:**
//! ```text
//! a11y-report [--config <file>] [--browser <label>] [--output <dir>] [--standard <tag>]... <results.json>...
//! ```
//!
//! Exits non-zero if any test's verdict failed.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use a11y_report::{A11yPlugin, RawAuditResults, RawConfig, TestInfo, Verdict};
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_CATEGORY: &str = "a11y";

/// Report accessibility audit results.
#[derive(Parser)]
#[command(
    name = "a11y-report",
    about = "Aggregate accessibility audit results and report them by standard and by test"
)]
struct Args {
    /// Configuration file, TOML or JSON (default: a11y.toml, if present).
    #[arg(long, default_value = "a11y.toml")]
    config: PathBuf,

    /// Browser label used in the report file name.
    #[arg(long)]
    browser: Option<String>,

    /// Directory for the HTML report.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Standard tag to report on; repeat for several. All standards when omitted.
    #[arg(long = "standard")]
    standards: Vec<String>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short)]
    verbose: bool,

    /// Raw audit result files.
    #[arg(required = true)]
    results: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut raw = RawConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if args.browser.is_some() {
        raw.browser_label = args.browser;
    }
    if args.output.is_some() {
        raw.report_output_path = args.output;
    }
    if !args.standards.is_empty() {
        raw.standards_to_report = Some(args.standards);
    }

    let mut plugin = A11yPlugin::on_prepare(raw);
    let mut verdicts: Vec<Verdict> = Vec::new();

    for path in &args.results {
        let results = read_results(path)?;
        let info = test_info(path);
        debug!(test = %info.name, category = %info.category, "recording results");

        plugin.add_results(info.name.clone(), results);
        if let Some(verdict) = plugin.post_test(&info, &mut verdicts) {
            let status = if verdict.is_failure() {
                "FAIL".red()
            } else {
                "PASS".green()
            };
            println!("[{}] {}", status, verdict.label());
        }
    }

    let summary = plugin
        .post_results(&mut io::stdout().lock())
        .context("reporting results")?;
    if let Some(path) = &summary.report_path {
        println!();
        println!("Report written to {}", path.display());
    }

    let failed = verdicts.iter().filter(|v| v.is_failure()).count();
    if failed > 0 {
        eprintln!("Accessibility FAILED: {} test(s) had violations.", failed);
        process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(fmt::layer().without_time().with_writer(io::stderr))
        .init();
}

fn read_results(path: &Path) -> Result<RawAuditResults> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

/// Test name from the file stem, category from the parent directory.
fn test_info(path: &Path) -> TestInfo {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let category = path
        .parent()
        .and_then(Path::file_name)
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    TestInfo::new(category, name)
}
