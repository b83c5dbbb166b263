//! Error types for the csvgate library.
//!
//! Only configuration and I/O problems are errors. Header mismatches and
//! per-row validation failures are reported as data in
//! [`IngestResult`](crate::IngestResult).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for csvgate operations.
#[derive(Debug, Error)]
pub enum CsvGateError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV file to ingest does not exist.
    #[error("Csv file doesn't exist: {path}")]
    FileNotFound { path: PathBuf },

    /// The format store root directory does not exist.
    #[error("Directory doesn't exist: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// No column definition file for the named format.
    #[error("Format '{name}' not found: {path} file doesn't exist")]
    FormatNotFound { name: String, path: PathBuf },

    /// No schema document for the named format.
    #[error("Schema for format '{name}' not found: {path} file doesn't exist")]
    SchemaNotFound { name: String, path: PathBuf },

    /// Format name contains characters outside `[A-Za-z0-9_-]`.
    #[error("Invalid format name: {0:?}")]
    InvalidFormatName(String),

    /// Column definitions are unusable (empty, duplicate names).
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Schema document failed to compile.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Input bytes are not valid UTF-8.
    #[error("File '{path}' is not valid UTF-8")]
    Encoding { path: PathBuf },

    /// Separator cannot be used with the CSV writer.
    #[error("Invalid separator: {0:?} (must be a single ASCII character)")]
    InvalidSeparator(char),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for csvgate operations.
pub type Result<T> = std::result::Result<T, CsvGateError>;
