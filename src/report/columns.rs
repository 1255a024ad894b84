//! Catalog of report columns.
//!
//! Every report, built-in or declared on the command line, formats and
//! sorts its cells through this table. A column knows its label, width,
//! which list types it applies to, how to read a value out of a row and
//! how to order two rows.

use crate::aggregator::{AnalyzeResult, CallAggregate, RequestAggregate};
use crate::utils::config::{
    AVG_TIME_WIDTH, CALLS_WIDTH, COUNT_PERCENT_WIDTH, COUNT_WIDTH, COVERAGE_WIDTH, INDEX_WIDTH,
    MICROS_PER_SECOND, REQUESTS_WIDTH, TIME_PERCENT_WIDTH, TIME_WIDTH,
};
use crate::utils::error::ListError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Which aggregate table a list reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Path,
    Request,
}

impl FromStr for ListType {
    type Err = ListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "path" => Ok(ListType::Path),
            "request" => Ok(ListType::Request),
            other => Err(ListError::InvalidType(other.to_string())),
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListType::Path => f.write_str("path"),
            ListType::Request => f.write_str("request"),
        }
    }
}

/// One row of a report, borrowed from an analysis
#[derive(Debug, Clone, Copy)]
pub enum Row<'a> {
    Call(&'a CallAggregate),
    Request(&'a RequestAggregate),
}

impl<'a> Row<'a> {
    /// Name of the call-path or request
    pub fn path(&self) -> &'a str {
        match self {
            Row::Call(call) => &call.path,
            Row::Request(request) => &request.path,
        }
    }
}

/// Raw value of a cell, used for both display and ordering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Integer(u64),
    Decimal(f64),
    Text(&'a str),
}

impl CellValue<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Integer(a), CellValue::Integer(b)) => a.cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            (a, b) => a.as_f64().total_cmp(&b.as_f64()),
        }
    }

    fn as_f64(&self) -> f64 {
        match self {
            CellValue::Integer(n) => *n as f64,
            CellValue::Decimal(n) => *n,
            CellValue::Text(_) => 0.0,
        }
    }
}

impl fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(n) => write!(f, "{}", n),
            CellValue::Decimal(n) => f.write_str(&format_decimal(*n)),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// A report column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Index,
    Count,
    CountPercent,
    Time,
    TimePercent,
    AvgTime,
    MinTime,
    MaxTime,
    AvgCalls,
    MinCalls,
    MaxCalls,
    Requests,
    Coverage,
    Path,
}

/// Static description of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub column: Column,
    pub key: &'static str,
    pub aliases: &'static [&'static str],
    pub label: &'static str,
    pub width: usize,
    /// Only meaningful for call-path lists
    pub path_only: bool,
    pub sortable: bool,
}

const fn spec(
    column: Column,
    key: &'static str,
    aliases: &'static [&'static str],
    label: &'static str,
    width: usize,
    path_only: bool,
    sortable: bool,
) -> ColumnSpec {
    ColumnSpec {
        column,
        key,
        aliases,
        label,
        width,
        path_only,
        sortable,
    }
}

/// The registry, in `Column` declaration order
pub const COLUMNS: [ColumnSpec; 14] = [
    spec(Column::Index, "index", &["#"], "#", INDEX_WIDTH, false, false),
    spec(Column::Count, "count", &[], "Count", COUNT_WIDTH, false, true),
    spec(
        Column::CountPercent,
        "count-percent",
        &["count%"],
        "Count%",
        COUNT_PERCENT_WIDTH,
        false,
        true,
    ),
    spec(Column::Time, "time", &[], "Time", TIME_WIDTH, false, true),
    spec(
        Column::TimePercent,
        "time-percent",
        &["time%"],
        "Time%",
        TIME_PERCENT_WIDTH,
        false,
        true,
    ),
    spec(Column::AvgTime, "avg-time", &[], "Avg Time", AVG_TIME_WIDTH, false, true),
    spec(Column::MinTime, "min-time", &[], "Min Time", TIME_WIDTH, false, true),
    spec(Column::MaxTime, "max-time", &[], "Max Time", TIME_WIDTH, false, true),
    spec(Column::AvgCalls, "avg-calls", &[], "Avg Calls", CALLS_WIDTH, true, true),
    spec(Column::MinCalls, "min-calls", &[], "Min Calls", CALLS_WIDTH, true, true),
    spec(Column::MaxCalls, "max-calls", &[], "Max Calls", CALLS_WIDTH, true, true),
    spec(Column::Requests, "requests", &[], "Requests", REQUESTS_WIDTH, true, true),
    spec(Column::Coverage, "coverage", &["coverage%"], "Coverage%", COVERAGE_WIDTH, true, true),
    spec(Column::Path, "path", &["request", "name"], "Path", 0, false, true),
];

impl Column {
    /// Look up a column by key or alias (case-insensitive, `_` or `-`)
    pub fn from_key(key: &str) -> Option<Column> {
        let key = key.trim().to_ascii_lowercase().replace('_', "-");
        COLUMNS
            .iter()
            .find(|spec| spec.key == key || spec.aliases.contains(&key.as_str()))
            .map(|spec| spec.column)
    }

    pub fn spec(self) -> &'static ColumnSpec {
        &COLUMNS[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.spec().key
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    pub fn width(self) -> usize {
        self.spec().width
    }

    pub fn is_sortable(self) -> bool {
        self.spec().sortable
    }

    pub fn applies_to(self, list_type: ListType) -> bool {
        !self.spec().path_only || list_type == ListType::Path
    }

    /// Raw value of this column for a row
    ///
    /// Returns `None` for the index column, which depends on position,
    /// and for path-only columns read from a request row.
    pub fn value<'a>(self, row: Row<'a>, totals: &AnalyzeResult) -> Option<CellValue<'a>> {
        use CellValue::{Decimal, Integer, Text};

        let value = match (self, row) {
            (Column::Index, _) => return None,
            (Column::Path, row) => Text(row.path()),

            (Column::Count, Row::Call(c)) => Integer(c.total_called_times),
            (Column::CountPercent, Row::Call(c)) => {
                Decimal(percent(c.total_called_times as f64, totals.total_calls as f64))
            }
            (Column::Time, Row::Call(c)) => Integer(c.total_time),
            (Column::TimePercent, Row::Call(c)) => {
                Decimal(percent(c.total_time as f64, totals.total_time_micros()))
            }
            (Column::AvgTime, Row::Call(c)) => Decimal(c.avg_time),
            (Column::MinTime, Row::Call(c)) => Integer(c.min_time),
            (Column::MaxTime, Row::Call(c)) => Integer(c.max_time),
            (Column::AvgCalls, Row::Call(c)) => Decimal(c.avg_called_times),
            (Column::MinCalls, Row::Call(c)) => Integer(c.min_called_times),
            (Column::MaxCalls, Row::Call(c)) => Integer(c.max_called_times),
            (Column::Requests, Row::Call(c)) => Integer(c.requests),
            (Column::Coverage, Row::Call(c)) => {
                Decimal(percent(c.request_coverage as f64, totals.total_requests as f64))
            }

            (Column::Count, Row::Request(r)) => Integer(r.count),
            (Column::CountPercent, Row::Request(r)) => {
                Decimal(percent(r.count as f64, totals.total_requests as f64))
            }
            (Column::Time, Row::Request(r)) => Decimal(r.total_time * MICROS_PER_SECOND),
            (Column::TimePercent, Row::Request(r)) => {
                Decimal(percent(r.total_time, totals.total_time))
            }
            (Column::AvgTime, Row::Request(r)) => Decimal(r.avg_time * MICROS_PER_SECOND),
            (Column::MinTime, Row::Request(r)) => Decimal(r.min_time * MICROS_PER_SECOND),
            (Column::MaxTime, Row::Request(r)) => Decimal(r.max_time * MICROS_PER_SECOND),
            (
                Column::AvgCalls
                | Column::MinCalls
                | Column::MaxCalls
                | Column::Requests
                | Column::Coverage,
                Row::Request(_),
            ) => return None,
        };

        Some(value)
    }

    /// Display text of this column for the row at 1-based `position`
    pub fn format(self, position: usize, row: Row<'_>, totals: &AnalyzeResult) -> String {
        match self {
            Column::Index => position.to_string(),
            _ => self
                .value(row, totals)
                .map(|value| value.to_string())
                .unwrap_or_default(),
        }
    }

    /// Natural (ascending) order of two rows on this column
    pub fn compare(self, a: Row<'_>, b: Row<'_>, totals: &AnalyzeResult) -> Ordering {
        match (self.value(a, totals), self.value(b, totals)) {
            (Some(a), Some(b)) => a.compare(&b),
            _ => Ordering::Equal,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// Floor to two decimals and drop trailing zeros
///
/// **Public** - `2500.0` prints `2500`, `12.345` prints `12.34`
pub fn format_decimal(value: f64) -> String {
    let floored = (value * 100.0).floor() / 100.0;
    let text = format!("{:.2}", floored);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
