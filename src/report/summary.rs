//! Grand totals printed after the reports.

use crate::aggregator::AnalyzeResult;

/// Summary lines of an analysis
pub fn render_summary(result: &AnalyzeResult) -> Vec<String> {
    vec![
        format!("Total Execution Time: {:.3}μs", result.total_time_micros()),
        format!("Total Function Calls: {}", result.total_calls),
        format!("Total Call Paths: {}", result.calls.len()),
        format!("Total Request Calls: {}", result.total_requests),
        format!("Total Request Paths: {}", result.requests.len()),
    ]
}
