//! Configuration and constants for the analyzer.

/// Number of bytes requested from the input per read
pub const READ_SEGMENT: usize = 8096;

/// Literal marking the start of the per-call-path block of a record.
/// Used to resynchronise a line whose leading bytes are corrupted.
pub const RECOVERY_ANCHOR: &[u8] = br#"{"data":{"#;

/// The anchor is never searched in the first bytes of a line,
/// a legitimate record cannot start with it after a corrupted prefix.
pub const RECOVERY_SKIP: usize = 4;

/// Diagnostics kept in a load report. Later bad lines are only counted and logged.
pub const MAX_RETAINED_DIAGNOSTICS: usize = 100;

/// Default number of rows per report
pub const DEFAULT_MAX_ROWS: i64 = 100;

// Display widths of the report columns
pub const INDEX_WIDTH: usize = 8;
pub const COUNT_WIDTH: usize = 8;
pub const COUNT_PERCENT_WIDTH: usize = 8;
pub const TIME_WIDTH: usize = 16;
pub const TIME_PERCENT_WIDTH: usize = 8;
pub const AVG_TIME_WIDTH: usize = 16;
pub const CALLS_WIDTH: usize = 12;
pub const REQUESTS_WIDTH: usize = 10;
pub const COVERAGE_WIDTH: usize = 10;

/// Microseconds per second, request times are recorded in seconds
pub const MICROS_PER_SECOND: f64 = 1_000_000.0;
