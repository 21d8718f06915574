//! Pipeline errors.

use ratelog_fetch::FetchError;
use ratelog_format::StoreError;
use ratelog_types::DateRangeError;
use thiserror::Error;

/// Fatal pipeline errors.
///
/// Individual source failures are not errors; they leave their fields empty.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] FetchError),

    /// The requested dates cannot be backfilled.
    #[error(transparent)]
    Range(#[from] DateRangeError),

    /// The history file could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),
}
