//! FRED series via the public graph CSV endpoint.

use async_trait::async_trait;
use chrono::NaiveDate;
use ratelog_types::{DailySeries, Field, Observation, SourcePayload};
use tracing::debug;

use super::{
    CollectRequest, SeriesCache, Source, SourceCapabilities, SourceError, fetch_required,
};
use crate::FetchClient;
use crate::url::{FRED_BASE_URL, fred_csv_url};

/// One FRED series mapped to one record field.
///
/// The whole series is downloaded on first use and cached, so a backfill over
/// many dates makes a single request. A failed download is not retried.
#[derive(Debug)]
pub struct FredSource {
    name: String,
    series: String,
    field: Field,
    base_url: String,
    cache: SeriesCache,
}

impl FredSource {
    /// Creates a source for `series` populating `field`.
    #[must_use]
    pub fn new(series: &str, field: Field) -> Self {
        Self {
            name: format!("fred_{}", series.to_lowercase()),
            series: series.to_uppercase(),
            field,
            base_url: FRED_BASE_URL.to_string(),
            cache: SeriesCache::default(),
        }
    }

    /// 10-year treasury constant maturity rate.
    #[must_use]
    pub fn dgs10() -> Self {
        Self::new("DGS10", Field::FredDgs10)
    }

    /// Freddie Mac weekly 30-year fixed mortgage average.
    #[must_use]
    pub fn mortgage30us() -> Self {
        Self::new("MORTGAGE30US", Field::FredMortgage30us)
    }

    /// Overrides the CSV endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn series(&self, client: &FetchClient) -> Result<&DailySeries, SourceError> {
        self.cache
            .get_or_download(|| async {
                let url = fred_csv_url(&self.base_url, &self.series);
                let body = fetch_required(client, &url).await?;
                let series = parse_fred_csv(&body)?;
                debug!(series = %self.series, points = series.len(), "downloaded FRED series");
                Ok::<_, SourceError>(series)
            })
            .await
    }
}

#[async_trait]
impl Source for FredSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::HISTORICAL
    }

    async fn collect(
        &self,
        client: &FetchClient,
        request: &CollectRequest,
    ) -> Result<SourcePayload, SourceError> {
        let series = self.series(client).await?;
        let (observed, value) = series.on_or_before(request.date).ok_or_else(|| {
            SourceError::NotFound(format!(
                "{} has no value on or before {}",
                self.series, request.date
            ))
        })?;
        if observed != request.date {
            debug!(series = %self.series, %observed, requested = %request.date, "using last published value");
        }
        Ok(SourcePayload::Observations(vec![
            Observation::percent(self.field, value).with_observed_on(observed),
        ]))
    }
}

/// Parses a `fredgraph.csv` download into a series.
///
/// The first row is a header (`observation_date,SERIES`). Values of `.` or
/// empty mark days without a publication and are skipped, as are rows whose
/// date or value cannot be read.
///
/// # Errors
///
/// Returns [`SourceError::Parse`] if the body is not a two-column CSV and
/// [`SourceError::NotFound`] if it holds no values.
pub fn parse_fred_csv(body: &str) -> Result<DailySeries, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| SourceError::Parse(format!("invalid FRED CSV: {e}")))?;
    if headers.len() < 2 {
        return Err(SourceError::Parse(format!(
            "FRED CSV header has {} column(s), expected 2",
            headers.len()
        )));
    }

    let mut points = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| SourceError::Parse(format!("invalid FRED CSV: {e}")))?;
        let (Some(date), Some(value)) = (record.get(0), record.get(1)) else {
            continue;
        };
        if value.is_empty() || value == "." {
            continue;
        }
        match (
            NaiveDate::parse_from_str(date, "%Y-%m-%d"),
            value.parse::<f64>(),
        ) {
            (Ok(date), Ok(value)) => points.push((date, value)),
            _ => debug!(date, value, "skipping unreadable FRED row"),
        }
    }

    let series = DailySeries::from_points(points);
    if series.is_empty() {
        return Err(SourceError::NotFound("FRED CSV has no values".into()));
    }
    Ok(series)
}
