//! Rate sources.
//!
//! Every source implements [`Source`]: it fetches its payload through the shared
//! [`FetchClient`] and hands the body to a pure parse function, so parsing can
//! be tested without the network.

mod bankrate;
mod finfam;
mod fred;
mod yahoo;
mod zillow;

pub use bankrate::{BankrateSource, parse_bankrate};
pub use finfam::{FINFAM_PRODUCT_TYPE, FinfamSource, parse_finfam};
pub use fred::{FredSource, parse_fred_csv};
pub use yahoo::{LIVE_RANGE, YahooSource, backfill_range, normalize_tnx, parse_yahoo_chart};
pub use zillow::{ZillowSource, parse_zillow};

use async_trait::async_trait;
use chrono::NaiveDate;
use ratelog_types::{AbsentReason, DailySeries, SourcePayload};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::warn;

use crate::{FetchClient, FetchError};

/// Largest rate, in percent, accepted from a scraped page.
pub const MAX_PLAUSIBLE_RATE: f64 = 25.0;

/// Whether a run collects today's data or reconstructs a past date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Scheduled run for the current date.
    Live,
    /// Historical reconstruction of a past date.
    Backfill,
}

/// What a source is asked to collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectRequest {
    /// The date the resulting record describes.
    pub date: NaiveDate,
    /// Live or backfill.
    pub mode: RunMode,
}

impl CollectRequest {
    /// A live request for `date`.
    #[must_use]
    pub const fn live(date: NaiveDate) -> Self {
        Self {
            date,
            mode: RunMode::Live,
        }
    }

    /// A backfill request for `date`.
    #[must_use]
    pub const fn backfill(date: NaiveDate) -> Self {
        Self {
            date,
            mode: RunMode::Backfill,
        }
    }
}

/// Describes what a source can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceCapabilities {
    /// Whether the source can answer for past dates.
    pub supports_backfill: bool,
}

impl SourceCapabilities {
    /// A source that serves historical data.
    pub const HISTORICAL: Self = Self {
        supports_backfill: true,
    };

    /// A source that only publishes the current snapshot.
    pub const SNAPSHOT: Self = Self {
        supports_backfill: false,
    };
}

/// Errors a source can report.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The HTTP request failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The payload was retrieved but did not contain the expected figure.
    #[error("{0}")]
    NotFound(String),

    /// The payload could not be parsed.
    #[error("{0}")]
    Parse(String),

    /// The series download already failed earlier in this run.
    #[error("{0}")]
    Unavailable(AbsentReason),
}

impl SourceError {
    /// Converts the error into the reason recorded for an absent source.
    #[must_use]
    pub fn into_absent(self) -> AbsentReason {
        match self {
            Self::Fetch(e) => AbsentReason::FetchFailed(e.to_string()),
            Self::NotFound(msg) => AbsentReason::NotFound(msg),
            Self::Parse(msg) => AbsentReason::ParseFailed(msg),
            Self::Unavailable(reason) => reason,
        }
    }
}

/// A data source contributing fields to the daily record.
#[async_trait]
pub trait Source: Send + Sync {
    /// Short identifier used in logs, e.g. `zillow` or `fred_dgs10`.
    fn name(&self) -> &str;

    /// Declares what the source supports.
    fn capabilities(&self) -> SourceCapabilities;

    /// Fetches and parses the source's contribution for `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be retrieved, does not contain
    /// the expected data or cannot be parsed.
    async fn collect(
        &self,
        client: &FetchClient,
        request: &CollectRequest,
    ) -> Result<SourcePayload, SourceError>;
}

/// A series downloaded at most once per source instance.
///
/// A failed download is remembered too, so a backfill does not retry it for
/// every date.
#[derive(Debug, Default)]
struct SeriesCache {
    cell: OnceCell<Result<DailySeries, AbsentReason>>,
}

impl SeriesCache {
    async fn get_or_download<F, Fut>(&self, download: F) -> Result<&DailySeries, SourceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<DailySeries, SourceError>>,
    {
        let cached = self
            .cell
            .get_or_init(|| async move {
                download().await.map_err(|e| {
                    warn!(error = %e, "series download failed, not retrying this run");
                    e.into_absent()
                })
            })
            .await;
        cached
            .as_ref()
            .map_err(|reason| SourceError::Unavailable(reason.clone()))
    }
}

/// Fetches `url`, treating a missing resource as [`SourceError::NotFound`].
async fn fetch_required(client: &FetchClient, url: &str) -> Result<String, SourceError> {
    client
        .fetch(url)
        .await?
        .ok_or_else(|| SourceError::NotFound(format!("{url} returned 404")))
}

/// Rejects scraped rates outside `(0, MAX_PLAUSIBLE_RATE)` percent.
fn plausible_rate(label: &str, value: f64) -> Result<f64, SourceError> {
    if value > 0.0 && value < MAX_PLAUSIBLE_RATE {
        Ok(value)
    } else {
        Err(SourceError::Parse(format!(
            "{label} value {value} is not a plausible rate"
        )))
    }
}
