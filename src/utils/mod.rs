//! Shared pieces of the analyzer: tunable constants in `config`, and the
//! errors raised while loading trace logs or resolving list declarations.

pub mod config;
pub mod error;

pub use error::{ListError, LoadError};
