//! Error types for ratelog types.

use chrono::NaiveDate;
use thiserror::Error;

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },

    /// A relative range was requested with zero days.
    #[error("Date range must cover at least one day")]
    Empty,

    /// The start date would fall outside the supported calendar.
    #[error("Cannot go back {days} days from {end}")]
    OutOfBounds {
        /// The end date.
        end: NaiveDate,
        /// The requested number of days.
        days: u32,
    },

    /// The range ends after the latest allowed date.
    #[error("Date range ends {end}, after {latest}")]
    InFuture {
        /// The end date.
        end: NaiveDate,
        /// The latest allowed date.
        latest: NaiveDate,
    },
}

/// A column name did not match any known metric field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown field: {0}")]
pub struct UnknownField(pub String);
