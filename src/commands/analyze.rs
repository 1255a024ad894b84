//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads every trace log in order
//! 2. Folds the records into aggregate tables
//! 3. Renders the requested built-in reports
//! 4. Renders the declared custom lists
//! 5. Prints the grand totals

use crate::aggregator::{AnalyzeResult, Analyzer};
use crate::report::{render_report, render_summary, BuiltinReport, ListPlan, ListSpec};
use crate::utils::config::DEFAULT_MAX_ROWS;
use crate::utils::error::ListError;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Trace logs, loaded in this order
    pub files: Vec<PathBuf>,

    /// Row limit of the built-in reports and default of custom lists
    pub max_rows: i64,

    /// Built-in reports to print
    pub reports: Vec<BuiltinReport>,

    /// Raw `--list` declarations
    pub lists: Vec<String>,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            max_rows: DEFAULT_MAX_ROWS,
            reports: Vec::new(),
            lists: Vec::new(),
        }
    }
}

/// Execute the analyze command, writing reports to `out`
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * A trace log cannot be opened or read
/// * Writing to `out` fails
///
/// A bad custom list is skipped with a warning, it never fails the run.
pub fn execute_analyze<W: Write>(args: &AnalyzeArgs, out: &mut W) -> Result<()> {
    let start_time = Instant::now();

    let result = load_all(&args.files)?;

    debug!(
        "Analysis: {} call-paths, {} request paths, {} records",
        result.calls.len(),
        result.requests.len(),
        result.total_requests
    );

    for report in reports_in_order(&args.reports) {
        let spec = report.spec(args.max_rows);
        match ListPlan::build(&spec, args.max_rows) {
            Ok(plan) => write_block(out, &render_report(&plan, &result))?,
            // Built-in declarations always resolve
            Err(e) => warn!("Skipping built-in report {:?}: {}", report, e),
        }
    }

    for raw in &args.lists {
        match build_custom_plan(raw, args.max_rows) {
            Ok(plan) => write_block(out, &render_report(&plan, &result))?,
            Err(e) => warn!("Skipping list '{}': {}", raw, e),
        }
    }

    writeln!(out).context("Failed to write summary")?;
    for line in render_summary(&result) {
        writeln!(out, "{}", line).context("Failed to write summary")?;
    }

    info!("Analysis completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}

/// Load and fold every file in order
///
/// **Public** - useful for callers that only need the aggregates
pub fn load_all(files: &[PathBuf]) -> Result<AnalyzeResult> {
    let mut analyzer = Analyzer::new();

    for (i, file) in files.iter().enumerate() {
        info!("Step {}/{}: Loading {}...", i + 1, files.len(), file.display());
        analyzer
            .load_file(file)
            .with_context(|| format!("Failed to load trace log {}", file.display()))?;
    }

    Ok(analyzer.analyze())
}

/// Parse and resolve one `--list` declaration
pub fn build_custom_plan(raw: &str, default_rows: i64) -> Result<ListPlan, ListError> {
    let spec = ListSpec::parse(raw)?;
    ListPlan::build(&spec, default_rows)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.files.is_empty() {
        anyhow::bail!("At least one trace log is required");
    }

    Ok(())
}

/// Selected built-ins in their fixed order, each at most once
fn reports_in_order(selected: &[BuiltinReport]) -> impl Iterator<Item = BuiltinReport> + '_ {
    BuiltinReport::ALL
        .into_iter()
        .filter(move |report| selected.contains(report))
}

fn write_block<W: Write>(out: &mut W, lines: &[String]) -> Result<()> {
    writeln!(out).context("Failed to write report")?;
    for line in lines {
        writeln!(out, "{}", line).context("Failed to write report")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_no_files() {
        assert!(validate_args(&AnalyzeArgs::default()).is_err());
    }

    #[test]
    fn test_validate_args_valid() {
        let args = AnalyzeArgs {
            files: vec![PathBuf::from("access.xhprof")],
            ..Default::default()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_reports_in_order() {
        let selected = [
            BuiltinReport::TimeRequest,
            BuiltinReport::CalledPath,
            BuiltinReport::TimeRequest,
        ];
        let ordered: Vec<_> = reports_in_order(&selected).collect();
        assert_eq!(ordered, vec![BuiltinReport::CalledPath, BuiltinReport::TimeRequest]);
    }

    #[test]
    fn test_build_custom_plan_error() {
        assert_eq!(
            build_custom_plan("type=path", 10).unwrap_err(),
            ListError::NoSortColumn("custom path list".to_string())
        );
    }
}
