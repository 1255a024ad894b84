//! Aggregation of trace records into call-path and request statistics.
//!
//! This module transforms validated trace records into:
//! - One aggregate per call-path (calls, wall time, coverage)
//! - One aggregate per request path (count, wall-clock time)
//! - Grand totals over the whole run

pub mod analyzer;
pub mod metrics;

// Re-export main types
pub use analyzer::Analyzer;
pub use metrics::{AnalyzeResult, CallAggregate, RequestAggregate};
