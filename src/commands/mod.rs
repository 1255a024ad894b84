//! CLI command implementations.
//!
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyze;

// Re-export main command functions
pub use analyze::{build_custom_plan, execute_analyze, load_all, validate_args, AnalyzeArgs};
