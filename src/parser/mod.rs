//! Trace log parsing.
//!
//! This module handles:
//! - Streaming line-delimited JSON logs in bounded chunks
//! - Validating each line against the trace record shape
//! - Recovering lines with a corrupted prefix

pub mod reader;
pub mod schema;
pub mod validator;

// Re-export main types
pub use reader::{DiagnosticKind, LineDiagnostic, LoadReport, StreamReader};
pub use schema::{CallSample, TraceRecord};
pub use validator::{into_record, validate};
