//! Source URL construction.

use chrono::NaiveDate;

/// Base URL for FinFam dated rate files.
pub const FINFAM_BASE_URL: &str = "https://assets.finfam.app/cumort";

/// FRED graph CSV endpoint (no API key required).
pub const FRED_BASE_URL: &str = "https://fred.stlouisfed.org/graph/fredgraph.csv";

/// Yahoo Finance chart API.
pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Zillow Oregon mortgage rate page.
pub const ZILLOW_OREGON_URL: &str = "https://www.zillow.com/homeloans/mortgage-rates/oregon/";

/// Bankrate Oregon mortgage rate page.
pub const BANKRATE_OREGON_URL: &str = "https://www.bankrate.com/mortgages/mortgage-rates/oregon/";

/// Builds the URL of the FinFam rate file published for `date`.
///
/// URL format: `{base}/rates_{YYYY-MM-DD}.json`
///
/// # Example
///
/// ```
/// use ratelog_fetch::url::{finfam_url, FINFAM_BASE_URL};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
/// let url = finfam_url(FINFAM_BASE_URL, date);
/// assert_eq!(url, "https://assets.finfam.app/cumort/rates_2025-01-06.json");
/// ```
#[must_use]
pub fn finfam_url(base: &str, date: NaiveDate) -> String {
    format!(
        "{}/rates_{}.json",
        base.trim_end_matches('/'),
        date.format("%Y-%m-%d")
    )
}

/// Builds the FRED CSV download URL for a series id such as `DGS10`.
#[must_use]
pub fn fred_csv_url(base: &str, series: &str) -> String {
    format!("{base}?id={}", series.to_uppercase())
}

/// Builds the Yahoo chart URL for `symbol` over `range` at daily interval.
///
/// Index symbols start with `^`, which is percent-encoded.
#[must_use]
pub fn yahoo_chart_url(base: &str, symbol: &str, range: &str) -> String {
    format!(
        "{}/{}?range={range}&interval=1d",
        base.trim_end_matches('/'),
        encode_symbol(symbol)
    )
}

fn encode_symbol(symbol: &str) -> String {
    let mut encoded = String::with_capacity(symbol.len() + 4);
    for c in symbol.chars() {
        match c {
            '^' => encoded.push_str("%5E"),
            '=' => encoded.push_str("%3D"),
            _ => encoded.push(c),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finfam_url() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            finfam_url("http://localhost:1234/", date),
            "http://localhost:1234/rates_2024-12-31.json"
        );
    }

    #[test]
    fn test_fred_csv_url() {
        assert_eq!(
            fred_csv_url(FRED_BASE_URL, "mortgage30us"),
            "https://fred.stlouisfed.org/graph/fredgraph.csv?id=MORTGAGE30US"
        );
    }

    #[test]
    fn test_yahoo_chart_url_encodes_index_symbol() {
        assert_eq!(
            yahoo_chart_url(YAHOO_BASE_URL, "^TNX", "10d"),
            "https://query1.finance.yahoo.com/v8/finance/chart/%5ETNX?range=10d&interval=1d"
        );
    }
}
