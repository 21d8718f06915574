//! Metric fields and observations.

use std::str::FromStr;

use chrono::NaiveDate;

use crate::UnknownField;

/// A tracked floating-point metric, one per output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// Median 30-year fixed APR across FinFam lender quotes.
    FinfamMedian,
    /// Lowest FinFam APR, outliers included.
    FinfamMin,
    /// Highest FinFam APR, outliers included.
    FinfamMax,
    /// Lowest FinFam APR after outlier exclusion.
    FinfamBestApr,
    /// Zillow Oregon 30-year fixed rate.
    ZillowOr30yr,
    /// Zillow Oregon 30-year fixed APR.
    ZillowOr30yrApr,
    /// Bankrate Oregon 30-year fixed rate.
    BankrateOr30yr,
    /// FRED 10-year treasury constant maturity (DGS10).
    FredDgs10,
    /// FRED Freddie Mac 30-year mortgage average (MORTGAGE30US).
    FredMortgage30us,
    /// Yahoo CBOE 10-year treasury yield index (^TNX), in percent.
    YahooTnx,
}

impl Field {
    /// Every field, in output column order.
    pub const ALL: [Self; 10] = [
        Self::FinfamMedian,
        Self::FinfamMin,
        Self::FinfamMax,
        Self::FinfamBestApr,
        Self::ZillowOr30yr,
        Self::BankrateOr30yr,
        Self::FredDgs10,
        Self::FredMortgage30us,
        Self::YahooTnx,
        Self::ZillowOr30yrApr,
    ];

    /// Returns the CSV column name for this field.
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::FinfamMedian => "finfam_median",
            Self::FinfamMin => "finfam_min",
            Self::FinfamMax => "finfam_max",
            Self::FinfamBestApr => "finfam_best_apr",
            Self::ZillowOr30yr => "zillow_or_30yr",
            Self::ZillowOr30yrApr => "zillow_or_30yr_apr",
            Self::BankrateOr30yr => "bankrate_or_30yr",
            Self::FredDgs10 => "fred_dgs10",
            Self::FredMortgage30us => "fred_mortgage30us",
            Self::YahooTnx => "yahoo_tnx",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.column() == name)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Unit attached to an observed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Percent (e.g. `6.25` for 6.25%).
    Percent,
}

/// One numeric value extracted from one source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// The field this value populates.
    pub field: Field,
    /// The value, already normalized to the field's unit.
    pub value: f64,
    /// Unit of `value`, when known.
    pub unit: Option<Unit>,
    /// Publication date of the value when it is taken from a dated series.
    pub observed_on: Option<NaiveDate>,
}

impl Observation {
    /// Creates an observation expressed in percent.
    #[must_use]
    pub const fn percent(field: Field, value: f64) -> Self {
        Self {
            field,
            value,
            unit: Some(Unit::Percent),
            observed_on: None,
        }
    }

    /// Records the date the value was published for.
    #[must_use]
    pub const fn with_observed_on(mut self, date: NaiveDate) -> Self {
        self.observed_on = Some(date);
        self
    }
}
