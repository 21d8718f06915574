//! Lender quotes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single lender's 30-year fixed APR quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenderQuote {
    /// Institution name as published.
    pub institution: String,
    /// Quoted APR in percent.
    pub apr: f64,
    /// Reason the publisher itself marked this quote as anomalous, if any.
    pub publisher_flag: Option<String>,
}

impl LenderQuote {
    /// Creates an unflagged quote.
    #[must_use]
    pub fn new(institution: impl Into<String>, apr: f64) -> Self {
        Self {
            institution: institution.into(),
            apr,
            publisher_flag: None,
        }
    }

    /// Attaches a publisher outlier flag.
    #[must_use]
    pub fn flagged(mut self, reason: impl Into<String>) -> Self {
        self.publisher_flag = Some(reason.into());
        self
    }

    /// Returns true if the publisher flagged this quote.
    #[must_use]
    pub const fn is_flagged(&self) -> bool {
        self.publisher_flag.is_some()
    }
}

/// Provenance of a published quote file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteFile {
    /// URL the file was downloaded from.
    pub url: Option<String>,
    /// Date in the file name. Earlier than the run date when a live run fell
    /// back to an older file.
    pub file_date: Option<NaiveDate>,
    /// `metadata.observation_date` as published.
    pub observation_date: Option<String>,
    /// `metadata.last_updated` as published.
    pub last_updated: Option<String>,
}

