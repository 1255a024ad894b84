//! Streaming fold of trace records into call-path and request tables.
//!
//! Records are folded as the reader produces them, so memory depends on
//! the number of distinct paths, not on the size of the logs.

use super::metrics::{AnalyzeResult, CallAggregate, RequestAggregate};
use crate::parser::{LoadReport, StreamReader, TraceRecord};
use crate::utils::error::LoadError;
use log::{debug, info};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Owns the aggregate tables of one run
///
/// **Public** - constructed once per invocation
#[derive(Debug, Default)]
pub struct Analyzer {
    calls: Vec<CallAggregate>,
    call_index: HashMap<String, usize>,

    /// Sequence number of the last record that touched each call-path
    call_last_record: Vec<u64>,

    requests: Vec<RequestAggregate>,
    request_index: HashMap<String, usize>,

    total_time: f64,
    total_calls: u64,
    total_requests: u64,

    chunk_size: Option<usize>,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read files with a custom chunk size
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    /// Drop everything loaded so far
    pub fn reset(&mut self) {
        let chunk_size = self.chunk_size;
        *self = Self {
            chunk_size,
            ..Self::default()
        };
    }

    /// Load one trace log
    ///
    /// **Public** - main entry point for ingestion
    ///
    /// Only the bytes present when the file is opened are read.
    ///
    /// # Errors
    /// * `LoadError::Open` - file cannot be opened
    /// * `LoadError::Metadata` - file size cannot be determined
    /// * `LoadError::Read` - read failed midway
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<LoadReport, LoadError> {
        let path = path.as_ref();

        debug!("Loading trace log: {}", path.display());

        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let size = file
            .metadata()
            .map_err(|source| LoadError::Metadata {
                path: path.to_path_buf(),
                source,
            })?
            .len();

        let report = self
            .load_reader(file.take(size), path.display().to_string())
            .map_err(|source| LoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            "Loaded {}: {} records ({} fixed, {} ignored, {} skipped)",
            path.display(),
            report.accepted,
            report.fixed,
            report.ignored,
            report.skipped
        );

        Ok(report)
    }

    /// Load records from any byte stream
    pub fn load_reader<R: Read>(
        &mut self,
        input: R,
        source: impl Into<String>,
    ) -> std::io::Result<LoadReport> {
        let mut reader = StreamReader::new().with_source(source);
        if let Some(chunk_size) = self.chunk_size {
            reader = reader.with_chunk_size(chunk_size);
        }

        reader.read_from(input, |record| self.add_record(record))
    }

    /// Fold one record into the tables
    pub fn add_record(&mut self, record: TraceRecord) {
        let sequence = self.total_requests;
        self.total_requests += 1;

        match self.request_index.get(&record.request) {
            Some(&index) => self.requests[index].add(record.total_time),
            None => {
                self.request_index
                    .insert(record.request.clone(), self.requests.len());
                self.requests
                    .push(RequestAggregate::new(record.request, record.total_time));
            }
        }

        self.total_time += record.total_time;

        for (path, sample) in record.data {
            match self.call_index.get(&path) {
                Some(&index) => {
                    let new_request = self.call_last_record[index] != sequence;
                    self.calls[index].add(sample, new_request);
                    self.call_last_record[index] = sequence;
                }
                None => {
                    self.call_index.insert(path.clone(), self.calls.len());
                    self.calls.push(CallAggregate::new(path, sample));
                    self.call_last_record.push(sequence);
                }
            }

            self.total_calls = self.total_calls.saturating_add(sample.called_times);
        }
    }

    /// Snapshot of the tables
    ///
    /// **Public** - calling it again without new loads yields the same result
    pub fn analyze(&self) -> AnalyzeResult {
        AnalyzeResult {
            calls: self.calls.clone(),
            requests: self.requests.clone(),
            total_time: self.total_time,
            total_calls: self.total_calls,
            total_requests: self.total_requests,
        }
    }
}
