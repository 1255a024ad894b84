//! XHProf Analyze
//!
//! Aggregates line-delimited XHProf trace logs into per-call-path and
//! per-request statistics, and renders them as ranked text reports.
//!
//! This crate provides the core implementation for the
//! `xhprof-analyze` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! xhprof-analyze --all -n 20 /var/log/xhprof/*.log
//! xhprof-analyze --list 'type=path;name=Slow paths;sort=avg-time;rows=10' app.log
//! ```
//!
//! ## Library use
//!
//! ```no_run
//! use xhprof_analyze::aggregator::Analyzer;
//! use xhprof_analyze::report::{render_report, BuiltinReport, ListPlan};
//!
//! let mut analyzer = Analyzer::new();
//! analyzer.load_file("app.log")?;
//! let result = analyzer.analyze();
//!
//! let plan = ListPlan::build(&BuiltinReport::TimePath.spec(10), 10)?;
//! for line in render_report(&plan, &result) {
//!     println!("{}", line);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aggregator;
pub mod commands;
pub mod parser;
pub mod report;
pub mod utils;
