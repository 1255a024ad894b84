//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort loading a trace log
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to stat {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors in a custom list declaration.
///
/// These never abort the run, the offending list is skipped.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ListError {
    #[error("Malformed option '{0}', expected key=value")]
    MalformedPair(String),

    #[error("Unknown list option '{0}'")]
    UnknownOption(String),

    #[error("Missing required option 'type'")]
    MissingType,

    #[error("Invalid list type '{0}', expected 'path' or 'request'")]
    InvalidType(String),

    #[error("Invalid row count '{0}'")]
    InvalidRows(String),

    #[error("No usable column in list '{0}'")]
    NoColumns(String),

    #[error("No usable sort column in list '{0}'")]
    NoSortColumn(String),
}
