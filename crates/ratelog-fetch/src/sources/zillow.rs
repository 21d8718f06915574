//! Zillow Oregon mortgage rate page.

use async_trait::async_trait;
use ratelog_types::{Field, Observation, SourcePayload};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::{CollectRequest, Source, SourceCapabilities, SourceError, fetch_required, plausible_rate};
use crate::FetchClient;
use crate::extract::{extract_after, strip_markup};
use crate::url::ZILLOW_OREGON_URL;

/// Characters after an anchor searched for the figure.
const WINDOW: usize = 32;

static RATE_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)30-year fixed mortgage rates in oregon are").expect("Invalid regex pattern")
});

static RATE_TABLE_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)30-year fixed.{0,120}?\brate\b").expect("Invalid regex pattern")
});

static APR_TABLE_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)30-year fixed.{0,120}?\bapr\b").expect("Invalid regex pattern")
});

/// Scrapes the Oregon 30-year fixed rate and APR from Zillow.
#[derive(Debug, Clone)]
pub struct ZillowSource {
    url: String,
}

impl ZillowSource {
    /// Creates a source reading the public Oregon page.
    #[must_use]
    pub fn new() -> Self {
        Self {
            url: ZILLOW_OREGON_URL.to_string(),
        }
    }

    /// Overrides the page URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

impl Default for ZillowSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for ZillowSource {
    fn name(&self) -> &str {
        "zillow"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::SNAPSHOT
    }

    async fn collect(
        &self,
        client: &FetchClient,
        _request: &CollectRequest,
    ) -> Result<SourcePayload, SourceError> {
        let html = fetch_required(client, &self.url).await?;
        Ok(SourcePayload::Observations(parse_zillow(&html)?))
    }
}

/// Extracts `zillow_or_30yr` and, when present, `zillow_or_30yr_apr`.
///
/// The rate is read after the sentence "30-year fixed mortgage rates in
/// Oregon are", falling back to the rate table's "30-Year Fixed ... Rate"
/// cell.
///
/// # Errors
///
/// Returns [`SourceError::NotFound`] if no rate is present and
/// [`SourceError::Parse`] if the rate is implausible.
pub fn parse_zillow(html: &str) -> Result<Vec<Observation>, SourceError> {
    let text = strip_markup(html);

    let rate = extract_after(&text, &RATE_ANCHOR, WINDOW)
        .or_else(|| extract_after(&text, &RATE_TABLE_ANCHOR, WINDOW))
        .ok_or_else(|| SourceError::NotFound("Zillow page has no 30-year fixed rate".into()))?;
    let mut observations = vec![Observation::percent(
        Field::ZillowOr30yr,
        plausible_rate("Zillow rate", rate)?,
    )];

    match extract_after(&text, &APR_TABLE_ANCHOR, WINDOW).map(|apr| plausible_rate("Zillow APR", apr)) {
        Some(Ok(apr)) => observations.push(Observation::percent(Field::ZillowOr30yrApr, apr)),
        Some(Err(e)) => debug!(error = %e, "ignoring Zillow APR"),
        None => debug!("Zillow page has no APR"),
    }

    Ok(observations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sentence_and_table() {
        let html = r#"<div><p>Current 30-year fixed mortgage rates in Oregon are <strong>5.99%</strong>.</p>
            <table><tr><td>30-Year Fixed</td><td>Rate</td><td>6.02%</td><td>APR</td><td>6.11%</td></tr></table></div>"#;
        let observations = parse_zillow(html).unwrap();
        assert_eq!(
            observations,
            vec![
                Observation::percent(Field::ZillowOr30yr, 5.99),
                Observation::percent(Field::ZillowOr30yrApr, 6.11),
            ]
        );
    }

    #[test]
    fn test_parse_falls_back_to_table_rate() {
        let html = "<tr><th>30-Year Fixed Rate</th><td>6.82%</td></tr>";
        let observations = parse_zillow(html).unwrap();
        assert_eq!(
            observations,
            vec![Observation::percent(Field::ZillowOr30yr, 6.82)]
        );
    }

    #[test]
    fn test_parse_missing_rate() {
        let result = parse_zillow("<html><body>Rates are unavailable</body></html>");
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[test]
    fn test_parse_rejects_implausible_rate() {
        let html = "30-year fixed mortgage rates in Oregon are 599%";
        assert!(matches!(parse_zillow(html), Err(SourceError::Parse(_))));
    }
}
