//! Aggregated quote statistics.

use serde::{Deserialize, Serialize};

/// Summary of one day's lender quotes.
///
/// `count`, `median`, `min` and `max` cover every valid quote, outliers
/// included. `best_apr` is the lowest quote left after outlier exclusion and
/// is `None` when every quote was excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Number of valid quotes.
    pub count: usize,
    /// Median APR.
    pub median: f64,
    /// Lowest APR.
    pub min: f64,
    /// Highest APR.
    pub max: f64,
    /// Lowest APR after outlier exclusion.
    pub best_apr: Option<f64>,
    /// Institution quoting `best_apr`.
    pub best_institution: Option<String>,
    /// Number of quotes excluded from the best-APR search.
    pub excluded: usize,
}
