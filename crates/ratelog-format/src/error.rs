//! Error types for the history store and formatters.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading or writing the history file.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The history file exists but could not be opened.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The history file is malformed or a row could not be encoded.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The output directory or temporary file could not be written.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// File or directory path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The temporary file could not be renamed over the target.
    #[error("Failed to replace {path}: {source}")]
    Persist {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that can occur while rendering records.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown output format.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
