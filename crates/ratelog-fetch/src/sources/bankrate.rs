//! Bankrate Oregon mortgage rate page.

use async_trait::async_trait;
use ratelog_types::{Field, Observation, SourcePayload};
use regex::Regex;
use std::sync::LazyLock;

use super::{CollectRequest, Source, SourceCapabilities, SourceError, fetch_required, plausible_rate};
use crate::FetchClient;
use crate::extract::{extract_after, strip_markup};
use crate::url::BANKRATE_OREGON_URL;

const WINDOW: usize = 32;

static SUMMARY_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)current interest rates in oregon are").expect("Invalid regex pattern")
});

static TABLE_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b30-year fixed rate\b").expect("Invalid regex pattern"));

/// Scrapes the Oregon 30-year fixed rate from Bankrate.
#[derive(Debug, Clone)]
pub struct BankrateSource {
    url: String,
}

impl BankrateSource {
    /// Creates a source reading the public Oregon page.
    #[must_use]
    pub fn new() -> Self {
        Self {
            url: BANKRATE_OREGON_URL.to_string(),
        }
    }

    /// Overrides the page URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

impl Default for BankrateSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for BankrateSource {
    fn name(&self) -> &str {
        "bankrate"
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
        Ok(SourcePayload::Observations(vec![parse_bankrate(&html)?]))
    }
}

/// Extracts `bankrate_or_30yr` from the summary sentence ("current interest
/// rates in Oregon are 6.17 percent for a 30-year fixed"), falling back to the
/// "30-Year Fixed Rate" table row.
///
/// # Errors
///
/// Returns [`SourceError::NotFound`] if no rate is present and
/// [`SourceError::Parse`] if the rate is implausible.
pub fn parse_bankrate(html: &str) -> Result<Observation, SourceError> {
    let text = strip_markup(html);
    let rate = extract_after(&text, &SUMMARY_ANCHOR, WINDOW)
        .or_else(|| extract_after(&text, &TABLE_ANCHOR, WINDOW))
        .ok_or_else(|| SourceError::NotFound("Bankrate page has no 30-year fixed rate".into()))?;
    Ok(Observation::percent(
        Field::BankrateOr30yr,
        plausible_rate("Bankrate rate", rate)?,
    ))
}
