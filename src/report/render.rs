//! Fixed-width text rendering of a report.
//!
//! Widths are fixed per column. A value wider than its column is kept
//! whole and pushes the following cells to the right.

use super::columns::{Column, Row};
use super::plan::ListPlan;
use crate::aggregator::AnalyzeResult;

/// Render a plan's rows as text lines
///
/// **Public** - title line, header line, then one line per row
pub fn render(plan: &ListPlan, rows: &[Row<'_>], totals: &AnalyzeResult) -> Vec<String> {
    let mut lines = Vec::with_capacity(rows.len() + 2);

    lines.push(format!("> {}", plan.title));
    lines.push(render_header(&plan.columns));

    for (i, row) in rows.iter().enumerate() {
        let line: String = plan
            .columns
            .iter()
            .map(|column| justify(&column.format(i + 1, *row, totals), column.width()))
            .collect();
        lines.push(line.trim_end().to_string());
    }

    lines
}

/// Build the plan and render it in one go
pub fn render_report(plan: &ListPlan, totals: &AnalyzeResult) -> Vec<String> {
    let rows = plan.execute(totals);
    render(plan, &rows, totals)
}

fn render_header(columns: &[Column]) -> String {
    let header: String = columns
        .iter()
        .map(|column| justify(column.label(), column.width()))
        .collect();
    header.trim_end().to_string()
}

fn justify(value: &str, width: usize) -> String {
    format!("{:<width$}", value, width = width)
}
