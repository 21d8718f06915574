//! Yahoo Finance chart API.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use ratelog_types::{DailySeries, Field, Observation, SourcePayload};
use serde::Deserialize;
use tracing::debug;

use super::{
    CollectRequest, SeriesCache, Source, SourceCapabilities, SourceError, fetch_required,
};
use crate::FetchClient;
use crate::url::{YAHOO_BASE_URL, yahoo_chart_url};

/// Chart range used by live runs.
pub const LIVE_RANGE: &str = "10d";

/// Closes above this are the CBOE index quoted at ten times the yield.
const TNX_SCALED_THRESHOLD: f64 = 20.0;

/// Converts a ^TNX close to percent.
///
/// A close greater than 20 is the index quoted at ten times the yield and is
/// divided by ten; anything else is already in percent.
///
/// ```
/// use ratelog_fetch::sources::normalize_tnx;
///
/// assert_eq!(normalize_tnx(42.5), 4.25);
/// assert_eq!(normalize_tnx(4.25), 4.25);
/// ```
#[must_use]
pub fn normalize_tnx(close: f64) -> f64 {
    if close > TNX_SCALED_THRESHOLD {
        close / 10.0
    } else {
        close
    }
}

/// Picks the shortest chart range reaching back to `earliest` from `today`.
#[must_use]
pub fn backfill_range(earliest: NaiveDate, today: NaiveDate) -> &'static str {
    // Two years of trading days with a margin for the range boundary.
    if (today - earliest).num_days() < 700 {
        "2y"
    } else {
        "max"
    }
}

/// Daily closes of one Yahoo symbol mapped to one record field.
///
/// The chart is downloaded on first use and cached. A failed download is not
/// retried.
#[derive(Debug)]
pub struct YahooSource {
    symbol: String,
    field: Field,
    range: String,
    base_url: String,
    cache: SeriesCache,
}

impl YahooSource {
    /// Creates a source for `symbol` populating `field`.
    #[must_use]
    pub fn new(symbol: impl Into<String>, field: Field) -> Self {
        Self {
            symbol: symbol.into(),
            field,
            range: LIVE_RANGE.to_string(),
            base_url: YAHOO_BASE_URL.to_string(),
            cache: SeriesCache::default(),
        }
    }

    /// CBOE 10-year treasury yield index.
    #[must_use]
    pub fn tnx() -> Self {
        Self::new("^TNX", Field::YahooTnx)
    }

    /// Sets the chart range, e.g. `10d`, `2y` or `max`.
    #[must_use]
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = range.into();
        self
    }

    /// Overrides the chart API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn series(&self, client: &FetchClient) -> Result<&DailySeries, SourceError> {
        self.cache
            .get_or_download(|| async {
                let url = yahoo_chart_url(&self.base_url, &self.symbol, &self.range);
                let body = fetch_required(client, &url).await?;
                let series = parse_yahoo_chart(&body)?;
                debug!(symbol = %self.symbol, points = series.len(), "downloaded Yahoo chart");
                Ok::<_, SourceError>(series)
            })
            .await
    }

    fn normalize(&self, close: f64) -> f64 {
        match self.field {
            Field::YahooTnx => normalize_tnx(close),
            _ => close,
        }
    }
}

#[async_trait]
impl Source for YahooSource {
    fn name(&self) -> &str {
        "yahoo"
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
        let (observed, close) = series.on_or_before(request.date).ok_or_else(|| {
            SourceError::NotFound(format!(
                "{} has no close on or before {}",
                self.symbol, request.date
            ))
        })?;
        Ok(SourcePayload::Observations(vec![
            Observation::percent(self.field, self.normalize(close)).with_observed_on(observed),
        ]))
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Parses a chart response into daily closes (raw, not normalized).
///
/// Timestamps are paired with `indicators.quote[0].close` by position and
/// null closes are skipped.
///
/// # Errors
///
/// Returns [`SourceError::Parse`] for malformed JSON and
/// [`SourceError::NotFound`] when the chart has no result or no closes.
pub fn parse_yahoo_chart(body: &str) -> Result<DailySeries, SourceError> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::Parse(format!("invalid Yahoo chart JSON: {e}")))?;

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        let reason = response
            .chart
            .error
            .and_then(|e| e.description)
            .unwrap_or_else(|| "empty chart result".to_string());
        return Err(SourceError::NotFound(reason));
    };

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    let points = result
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let date = DateTime::from_timestamp(*ts, 0)?.date_naive();
            Some((date, close?))
        });

    let series = DailySeries::from_points(points);
    if series.is_empty() {
        return Err(SourceError::NotFound("chart has no closes".into()));
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;
    use approx::assert_relative_eq;
    use ratelog_types::AbsentReason;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // 2025-01-02, 2025-01-03, 2025-01-06 at 13:00 UTC
    const CHART: &str = r#"{"chart": {"result": [{
        "meta": {"symbol": "^TNX"},
        "timestamp": [1735822800, 1735909200, 1736168400],
        "indicators": {"quote": [{"close": [45.7, null, 46.2]}]}
    }], "error": null}}"#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalize_tnx_threshold() {
        assert_relative_eq!(normalize_tnx(45.7), 4.57, epsilon = 1e-9);
        assert_relative_eq!(normalize_tnx(4.57), 4.57);
        assert_relative_eq!(normalize_tnx(20.0), 20.0);
    }

    #[test]
    fn test_parse_skips_null_closes() {
        let series = parse_yahoo_chart(CHART).unwrap();
        assert_eq!(
            series.points(),
            &[(date(2025, 1, 2), 45.7), (date(2025, 1, 6), 46.2)]
        );
    }

    #[test]
    fn test_parse_chart_error() {
        let body = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
        match parse_yahoo_chart(body) {
            Err(SourceError::NotFound(msg)) => assert!(msg.contains("delisted")),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(parse_yahoo_chart("[]"), Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_backfill_range() {
        assert_eq!(backfill_range(date(2024, 6, 1), date(2025, 1, 6)), "2y");
        assert_eq!(backfill_range(date(2020, 1, 1), date(2025, 1, 6)), "max");
    }

    #[tokio::test]
    async fn test_collect_normalizes_and_uses_last_close() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("range", "2y"))
            .and(query_param("interval", "1d"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CHART))
            .expect(1)
            .mount(&server)
            .await;

        let client = FetchClient::new(ClientConfig::default()).unwrap();
        let source = YahooSource::tnx()
            .with_range("2y")
            .with_base_url(server.uri());

        let on_gap = source
            .collect(&client, &CollectRequest::backfill(date(2025, 1, 3)))
            .await
            .unwrap();
        let SourcePayload::Observations(obs) = on_gap else {
            panic!("expected observations");
        };
        assert_eq!(obs[0].field, Field::YahooTnx);
        assert_relative_eq!(obs[0].value, 4.57, epsilon = 1e-9);
        assert_eq!(obs[0].observed_on, Some(date(2025, 1, 2)));

        let latest = source
            .collect(&client, &CollectRequest::live(date(2025, 1, 6)))
            .await
            .unwrap();
        let SourcePayload::Observations(obs) = latest else {
            panic!("expected observations");
        };
        assert_relative_eq!(obs[0].value, 4.62, epsilon = 1e-9);
        assert_eq!(obs[0].observed_on, Some(date(2025, 1, 6)));
    }

    #[tokio::test]
    async fn test_failed_chart_not_downloaded_again() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .expect(1)
            .mount(&server)
            .await;

        let client = FetchClient::new(ClientConfig::default()).unwrap();
        let source = YahooSource::tnx().with_base_url(server.uri());

        for day in [2, 3] {
            let err = source
                .collect(&client, &CollectRequest::backfill(date(2025, 1, day)))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                SourceError::Unavailable(AbsentReason::ParseFailed(_))
            ));
        }
    }
}
