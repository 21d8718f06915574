//! FinFam daily lender quote files.

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use ratelog_types::{LenderQuote, QuoteFile, SourcePayload};
use serde_json::Value;
use tracing::debug;

use super::{CollectRequest, RunMode, Source, SourceCapabilities, SourceError, fetch_required};
use crate::FetchClient;
use crate::url::{FINFAM_BASE_URL, finfam_url};

/// Product type whose quotes are aggregated.
pub const FINFAM_PRODUCT_TYPE: &str = "30-year-fixed";

/// Lender quotes published by FinFam as one JSON file per date.
#[derive(Debug, Clone)]
pub struct FinfamSource {
    base_url: String,
    lookback_days: u32,
}

impl FinfamSource {
    /// Creates a source that looks back up to `lookback_days` days for the
    /// latest file on live runs.
    #[must_use]
    pub fn new(lookback_days: u32) -> Self {
        Self {
            base_url: FINFAM_BASE_URL.to_string(),
            lookback_days,
        }
    }

    /// Overrides the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Walks back from `date` until a published file is found.
    ///
    /// Returns the file's date, URL and body.
    async fn fetch_latest(
        &self,
        client: &FetchClient,
        date: NaiveDate,
    ) -> Result<(NaiveDate, String, String), SourceError> {
        let mut last_error = None;
        for back in 0..=self.lookback_days {
            let Some(day) = date.checked_sub_days(Days::new(u64::from(back))) else {
                break;
            };
            let url = finfam_url(&self.base_url, day);
            match client.fetch(&url).await {
                Ok(Some(body)) => return Ok((day, url, body)),
                Ok(None) => debug!(%day, "no FinFam file"),
                Err(e) => {
                    debug!(%day, error = %e, "FinFam fetch failed");
                    last_error = Some(SourceError::from(e));
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            SourceError::NotFound(format!(
                "no FinFam file in the {} days up to {date}",
                self.lookback_days
            ))
        }))
    }
}

#[async_trait]
impl Source for FinfamSource {
    fn name(&self) -> &str {
        "finfam"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::HISTORICAL
    }

    async fn collect(
        &self,
        client: &FetchClient,
        request: &CollectRequest,
    ) -> Result<SourcePayload, SourceError> {
        let (day, url, body) = match request.mode {
            RunMode::Live => self.fetch_latest(client, request.date).await?,
            RunMode::Backfill => {
                let url = finfam_url(&self.base_url, request.date);
                let body = fetch_required(client, &url).await?;
                (request.date, url, body)
            }
        };
        let (quotes, mut file) = parse_finfam(&body)?;
        debug!(%day, quotes = quotes.len(), "parsed FinFam file");
        file.url = Some(url);
        file.file_date = Some(day);
        Ok(SourcePayload::Quotes { quotes, file })
    }
}

/// Extracts the 30-year fixed quotes and the `metadata` dates from a FinFam
/// rates file.
///
/// Institutions or rates with a missing name, a non-numeric or non-positive
/// APR, or an unexpected shape are skipped individually. A non-blank
/// `outlier_reason` is kept as the quote's publisher flag. The returned
/// [`QuoteFile`] has no URL or file date; those belong to the download.
///
/// # Errors
///
/// Returns [`SourceError::Parse`] if the body is not JSON or has no
/// `institutions` list.
pub fn parse_finfam(body: &str) -> Result<(Vec<LenderQuote>, QuoteFile), SourceError> {
    let data: Value = serde_json::from_str(body)
        .map_err(|e| SourceError::Parse(format!("invalid FinFam JSON: {e}")))?;
    let institutions = data
        .get("institutions")
        .and_then(Value::as_array)
        .ok_or_else(|| SourceError::Parse("FinFam file has no institutions list".into()))?;

    let mut quotes = Vec::new();
    for institution in institutions {
        let Some(name) = institution.get("name").and_then(Value::as_str) else {
            continue;
        };
        let Some(rates) = institution.get("rates").and_then(Value::as_array) else {
            continue;
        };
        quotes.extend(rates.iter().filter_map(|rate| parse_rate(name, rate)));
    }

    let metadata = |key: &str| {
        data.pointer(&format!("/metadata/{key}"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let file = QuoteFile {
        observation_date: metadata("observation_date"),
        last_updated: metadata("last_updated"),
        ..QuoteFile::default()
    };
    Ok((quotes, file))
}

fn parse_rate(institution: &str, rate: &Value) -> Option<LenderQuote> {
    if rate.get("normalized_product_type").and_then(Value::as_str) != Some(FINFAM_PRODUCT_TYPE) {
        return None;
    }
    let apr = match rate.get("apr")? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    if !apr.is_finite() || apr <= 0.0 {
        return None;
    }

    let quote = LenderQuote::new(institution, apr);
    match rate
        .get("outlier_reason")
        .and_then(Value::as_str)
        .map(str::trim)
    {
        Some(reason) if !reason.is_empty() => Some(quote.flagged(reason)),
        _ => Some(quote),
    }
}
