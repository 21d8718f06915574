//! Per-source collection results.

use std::time::Duration;

use derive_more::Display;

use crate::{LenderQuote, Observation, QuoteFile};

/// What a source produced when it succeeded.
#[derive(Debug, Clone, PartialEq)]
pub enum SourcePayload {
    /// Lender quotes to be aggregated.
    Quotes {
        /// The quotes.
        quotes: Vec<LenderQuote>,
        /// Where they were published.
        file: QuoteFile,
    },
    /// Ready-to-store observations.
    Observations(Vec<Observation>),
}

impl SourcePayload {
    /// Quotes with no provenance attached.
    #[must_use]
    pub fn quotes(quotes: Vec<LenderQuote>) -> Self {
        Self::Quotes {
            quotes,
            file: QuoteFile::default(),
        }
    }
}

/// Why a source contributed nothing to a record.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum AbsentReason {
    /// The HTTP request failed.
    #[display("fetch failed: {_0}")]
    FetchFailed(String),
    /// The payload did not contain the expected figure.
    #[display("not found: {_0}")]
    NotFound(String),
    /// The payload could not be parsed.
    #[display("parse failed: {_0}")]
    ParseFailed(String),
    /// The source did not answer within its time budget.
    #[display("timed out after {_0:?}")]
    TimedOut(Duration),
    /// The source only publishes current snapshots and cannot be backfilled.
    #[display("snapshot-only source")]
    SnapshotOnly,
}

/// Tagged outcome of one source for one run.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceResult {
    /// The source produced data.
    Success(SourcePayload),
    /// The source produced nothing; its fields stay empty.
    Absent(AbsentReason),
}

impl SourceResult {
    /// Returns true if the source produced data.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// A source's name paired with its outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceReport {
    /// Source name, e.g. `finfam` or `fred_dgs10`.
    pub source: String,
    /// The outcome.
    pub result: SourceResult,
}

impl SourceReport {
    /// Creates a report.
    #[must_use]
    pub fn new(source: impl Into<String>, result: SourceResult) -> Self {
        Self {
            source: source.into(),
            result,
        }
    }
}
