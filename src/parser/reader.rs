//! Chunked reader for line-delimited trace logs.
//!
//! The input is consumed in fixed-size chunks. Bytes of the line being
//! assembled are kept in a buffer that grows with the longest line seen
//! and is reused for every following line. Each terminated line is one
//! candidate record:
//!
//! 1. Parse as JSON and validate; accept on success.
//! 2. If it parses but does not validate, drop it silently.
//! 3. If it does not parse, retry once from the first `{"data":{` anchor
//!    past the line start; a hit is accepted as `[FIXED]`, anything else
//!    is dropped as `[IGNORED]`.
//!
//! A malformed line never stops the load.

use super::schema::TraceRecord;
use super::validator::into_record;
use crate::utils::config::{
    MAX_RETAINED_DIAGNOSTICS, READ_SEGMENT, RECOVERY_ANCHOR, RECOVERY_SKIP,
};
use log::{debug, warn};
use serde_json::Value;
use std::fmt;
use std::io::{ErrorKind, Read};

/// Outcome of a malformed line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Line was recovered from the data anchor
    Fixed,
    /// Line was discarded
    Ignored,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Fixed => f.write_str("FIXED"),
            DiagnosticKind::Ignored => f.write_str("IGNORED"),
        }
    }
}

/// A non-fatal problem found on one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiagnostic {
    /// 1-based line number
    pub line: usize,

    pub kind: DiagnosticKind,

    /// The original JSON parse error
    pub message: String,
}

/// Summary of one load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Lines seen, including a final unterminated one
    pub lines: usize,

    /// Records handed to the sink (recovered ones included)
    pub accepted: usize,

    /// Records recovered from the data anchor
    pub fixed: usize,

    /// Malformed lines that were discarded
    pub ignored: usize,

    /// Well-formed JSON that is not a trace record
    pub skipped: usize,

    /// The first malformed lines, at most `MAX_RETAINED_DIAGNOSTICS`
    pub diagnostics: Vec<LineDiagnostic>,
}

/// Streaming line reader
///
/// **Public** - owned by the analyzer for the duration of one load
#[derive(Debug)]
pub struct StreamReader {
    chunk_size: usize,
    source: String,
    line: Vec<u8>,
    line_no: usize,
    report: LoadReport,
}

impl Default for StreamReader {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamReader {
    /// Create a reader with the default chunk size
    pub fn new() -> Self {
        Self {
            chunk_size: READ_SEGMENT,
            source: "<input>".to_string(),
            line: Vec::with_capacity(READ_SEGMENT),
            line_no: 1,
            report: LoadReport::default(),
        }
    }

    /// Override the chunk size (values below 1 are raised to 1)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Name used in diagnostics
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Read `input` to the end, feeding every accepted record to `sink`
    ///
    /// **Public** - main entry point for ingestion
    ///
    /// # Errors
    /// Any I/O error other than an interrupted read
    pub fn read_from<R, F>(mut self, mut input: R, mut sink: F) -> std::io::Result<LoadReport>
    where
        R: Read,
        F: FnMut(TraceRecord),
    {
        let mut chunk = vec![0u8; self.chunk_size];

        loop {
            let read = match input.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            self.feed(&chunk[..read], &mut sink);
        }

        Ok(self.finish(&mut sink))
    }

    /// Consume one chunk of input
    ///
    /// **Public** - lets callers drive the reader with their own chunks
    pub fn feed<F>(&mut self, chunk: &[u8], sink: &mut F)
    where
        F: FnMut(TraceRecord),
    {
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            self.line.extend_from_slice(&rest[..pos]);
            self.end_line(sink);
            rest = &rest[pos + 1..];
        }

        self.line.extend_from_slice(rest);
    }

    /// Flush a final line that had no trailing newline
    pub fn finish<F>(mut self, sink: &mut F) -> LoadReport
    where
        F: FnMut(TraceRecord),
    {
        if !self.line.is_empty() {
            self.end_line(sink);
        }

        debug!(
            "{}: {} lines, {} records accepted",
            self.source, self.report.lines, self.report.accepted
        );

        self.report
    }

    fn end_line<F>(&mut self, sink: &mut F)
    where
        F: FnMut(TraceRecord),
    {
        if !self.line.iter().all(u8::is_ascii_whitespace) {
            self.handle_candidate(sink);
        }

        // Keeps the capacity for the next line
        self.line.clear();
        self.report.lines += 1;
        self.line_no += 1;
    }

    fn handle_candidate<F>(&mut self, sink: &mut F)
    where
        F: FnMut(TraceRecord),
    {
        match serde_json::from_slice::<Value>(&self.line) {
            Ok(value) => match into_record(value) {
                Some(record) => self.accept(record, sink),
                None => {
                    debug!("{}: line {} is not a trace record, skipped", self.source, self.line_no);
                    self.report.skipped += 1;
                }
            },
            Err(err) => self.recover(err, sink),
        }
    }

    fn recover<F>(&mut self, err: serde_json::Error, sink: &mut F)
    where
        F: FnMut(TraceRecord),
    {
        let recovered = find_anchor(&self.line)
            .and_then(|pos| serde_json::from_slice::<Value>(&self.line[pos..]).ok())
            .and_then(into_record);

        let kind = match recovered {
            Some(record) => {
                self.accept(record, sink);
                self.report.fixed += 1;
                DiagnosticKind::Fixed
            }
            None => {
                self.report.ignored += 1;
                DiagnosticKind::Ignored
            }
        };

        warn!("[{}] Bad log in line {} of {}: {}", kind, self.line_no, self.source, err);

        if self.report.diagnostics.len() < MAX_RETAINED_DIAGNOSTICS {
            self.report.diagnostics.push(LineDiagnostic {
                line: self.line_no,
                kind,
                message: err.to_string(),
            });
        }
    }

    fn accept<F>(&mut self, record: TraceRecord, sink: &mut F)
    where
        F: FnMut(TraceRecord),
    {
        self.report.accepted += 1;
        sink(record);
    }
}

/// Position of the recovery anchor, never within the first bytes of the line
fn find_anchor(line: &[u8]) -> Option<usize> {
    let haystack = line.get(RECOVERY_SKIP..)?;
    haystack
        .windows(RECOVERY_ANCHOR.len())
        .position(|window| window == RECOVERY_ANCHOR)
        .map(|pos| pos + RECOVERY_SKIP)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = r#"{"data":{"main()":{"ct":1,"wt":100}},"request":"/a","totalTime":0.001}"#;

    fn read_all(input: &str, chunk_size: usize) -> (Vec<TraceRecord>, LoadReport) {
        let mut records = Vec::new();
        let report = StreamReader::new()
            .with_chunk_size(chunk_size)
            .read_from(input.as_bytes(), |r| records.push(r))
            .unwrap();
        (records, report)
    }

    #[test]
    fn test_find_anchor_skips_prefix() {
        assert_eq!(find_anchor(br#"{"data":{}}"#), None);
        assert_eq!(find_anchor(br#"garbage{"data":{}}"#), Some(7));
        assert_eq!(find_anchor(b"ab"), None);
    }

    #[test]
    fn test_empty_input() {
        let (records, report) = read_all("", 16);
        assert!(records.is_empty());
        assert_eq!(report, LoadReport::default());
    }

    #[test]
    fn test_final_line_without_newline() {
        let input = format!("{GOOD}\n{GOOD}");
        let (records, report) = read_all(&input, 7);
        assert_eq!(records.len(), 2);
        assert_eq!(report.lines, 2);
    }

    #[test]
    fn test_blank_lines_are_counted_not_reported() {
        let input = format!("\n{GOOD}\n\r\n");
        let (records, report) = read_all(&input, 1024);
        assert_eq!(records.len(), 1);
        assert_eq!(report.lines, 3);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_valid_json_wrong_shape_is_skipped() {
        let input = format!("{{\"hello\":1}}\n{GOOD}\n");
        let (records, report) = read_all(&input, 5);
        assert_eq!(records.len(), 1);
        assert_eq!(report.skipped, 1);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_recovery_from_corrupted_prefix() {
        let input = format!("2020-01-01 12:00 {GOOD}\n");
        let (records, report) = read_all(&input, 3);
        assert_eq!(records.len(), 1);
        assert_eq!(report.fixed, 1);
        assert_eq!(report.diagnostics[0].line, 1);
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::Fixed);
    }

    #[test]
    fn test_truncated_line_is_ignored() {
        let truncated = &GOOD[..30];
        let input = format!("{GOOD}\n{truncated}\n{GOOD}\n");
        let (records, report) = read_all(&input, 11);
        assert_eq!(records.len(), 2);
        assert_eq!(report.ignored, 1);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].line, 2);
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::Ignored);
    }

    #[test]
    fn test_retained_diagnostics_are_capped() {
        let input = "not json\n".repeat(MAX_RETAINED_DIAGNOSTICS * 3);
        let (records, report) = read_all(&input, 64);

        assert!(records.is_empty());
        assert_eq!(report.ignored, MAX_RETAINED_DIAGNOSTICS * 3);
        assert_eq!(report.diagnostics.len(), MAX_RETAINED_DIAGNOSTICS);
        assert_eq!(report.diagnostics[0].line, 1);
        assert_eq!(
            report.diagnostics.last().map(|d| d.line),
            Some(MAX_RETAINED_DIAGNOSTICS)
        );
    }

    #[test]
    fn test_feed_reuses_buffer_across_lines() {
        let mut reader = StreamReader::new();
        let mut count = 0;
        let mut sink = |_r: TraceRecord| count += 1;

        let long_line = format!("{GOOD}\n");
        for byte in long_line.as_bytes().chunks(4) {
            reader.feed(byte, &mut sink);
        }
        let capacity = reader.line.capacity();
        reader.feed(long_line.as_bytes(), &mut sink);
        assert!(reader.line.capacity() >= capacity);

        let report = reader.finish(&mut sink);
        assert_eq!(report.accepted, 2);
        assert_eq!(count, 2);
    }
}
