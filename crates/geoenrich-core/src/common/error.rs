//! Error types for the geocoding pipeline.
//!
//! This module defines the central `Error` enum, which captures every
//! condition that is allowed to abort a run. Per-record lookup failures are
//! absent: they are absorbed into
//! [`LookupOutcome`](crate::geocode::LookupOutcome) at the record boundary and
//! never surface here.
//!
//! ## Error Cases
//! - `MissingCredential`: No provider API key was supplied.
//! - `InputNotFound`: The input CSV does not exist.
//! - `Csv`: The input CSV could not be parsed.
//! - `Io`: A filesystem operation failed.
//! - `OutputWrite`: The output destination could not be created or persisted.
//! - `HttpClient`: The shared HTTP client could not be constructed.
//! - `InvalidConfig`: A configuration value is out of range.

use std::path::PathBuf;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for fatal pipeline conditions.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The geocoding provider credential is missing or empty.
    #[error("Missing geocoding API key")]
    MissingCredential,

    /// The input file was not found.
    #[error("Input file '{}' was not found", path.display())]
    InputNotFound { path: PathBuf },

    /// The input file is not valid CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Generic I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing or persisting the output file failed.
    #[error("Error writing to output file '{}': {reason}", path.display())]
    OutputWrite { path: PathBuf, reason: String },

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// A configuration value was rejected.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}
