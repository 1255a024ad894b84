//! XHProf Analyze CLI
//!
//! Aggregates XHProf trace logs and prints ranked call-path
//! and request reports.

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use xhprof_analyze::commands::{execute_analyze, validate_args, AnalyzeArgs};
use xhprof_analyze::report::BuiltinReport;
use xhprof_analyze::utils::config::DEFAULT_MAX_ROWS;

/// XHProf Analyze - ranked reports from XHProf trace logs
#[derive(Parser, Debug)]
#[command(name = "xhprof-analyze")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Trace log files, one JSON record per line
    #[arg(required = true, value_name = "FILES")]
    files: Vec<PathBuf>,

    /// How many rows of each report to display (0 or less for all)
    #[arg(
        short = 'n',
        long,
        default_value_t = DEFAULT_MAX_ROWS,
        env = "XHPROF_ANALYZE_MAX_ROWS",
        allow_negative_numbers = true
    )]
    max_rows: i64,

    /// Display the most frequently called paths
    #[arg(long)]
    called_path: bool,

    /// Display the longest time paths
    #[arg(long)]
    time_path: bool,

    /// Display the longest average time paths
    #[arg(long)]
    avg_time_path: bool,

    /// Display the paths referred by the most requests
    #[arg(long)]
    referred_path: bool,

    /// Display the most frequently called requests
    #[arg(long)]
    called_request: bool,

    /// Display the longest time requests
    #[arg(long)]
    time_request: bool,

    /// Display the longest average time requests
    #[arg(long)]
    avg_time_request: bool,

    /// Display every built-in report
    #[arg(long)]
    all: bool,

    /// Custom list, e.g. 'type=path;name=Slow;rows=10;sort=avg-time,count;columns=index,avg-time,path'
    #[arg(long = "list", value_name = "DECL")]
    lists: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Built-in reports selected by flag
    fn reports(&self) -> Vec<BuiltinReport> {
        let flags = [
            (BuiltinReport::CalledPath, self.called_path),
            (BuiltinReport::TimePath, self.time_path),
            (BuiltinReport::AvgTimePath, self.avg_time_path),
            (BuiltinReport::ReferredPath, self.referred_path),
            (BuiltinReport::CalledRequest, self.called_request),
            (BuiltinReport::TimeRequest, self.time_request),
            (BuiltinReport::AvgTimeRequest, self.avg_time_request),
        ];

        flags
            .into_iter()
            .filter(|&(_, enabled)| enabled || self.all)
            .map(|(report, _)| report)
            .collect()
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let args = AnalyzeArgs {
        reports: cli.reports(),
        files: cli.files,
        max_rows: cli.max_rows,
        lists: cli.lists,
    };

    // Validate args first
    validate_args(&args)?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    execute_analyze(&args, &mut out)?;
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_all_selects_every_report() {
        let cli = Cli::parse_from(["xhprof-analyze", "--all", "a.log"]);
        assert_eq!(cli.reports(), BuiltinReport::ALL.to_vec());
    }

    #[test]
    fn test_flags_and_lists() {
        let cli = Cli::parse_from([
            "xhprof-analyze",
            "--time-request",
            "--called-path",
            "--list",
            "type=path;sort=time",
            "--list",
            "type=request;sort=count",
            "-n",
            "-1",
            "a.log",
            "b.log",
        ]);

        assert_eq!(
            cli.reports(),
            vec![BuiltinReport::CalledPath, BuiltinReport::TimeRequest]
        );
        assert_eq!(cli.lists.len(), 2);
        assert_eq!(cli.max_rows, -1);
        assert_eq!(cli.files, vec![PathBuf::from("a.log"), PathBuf::from("b.log")]);
    }

    #[test]
    fn test_files_are_required() {
        assert!(Cli::try_parse_from(["xhprof-analyze", "--all"]).is_err());
    }
}
