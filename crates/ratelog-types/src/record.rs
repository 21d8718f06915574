//! The persisted daily row.

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::Field;

/// When a record was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunMetadata {
    /// The calendar date the row describes; the deduplication key.
    pub run_date_utc: NaiveDate,
    /// Wall-clock time of the run, informational only.
    pub run_timestamp_utc: DateTime<Utc>,
}

impl RunMetadata {
    /// Creates metadata for the given date stamped at `now`, truncated to seconds.
    #[must_use]
    pub fn new(run_date_utc: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            run_date_utc,
            run_timestamp_utc: now.trunc_subsecs(0),
        }
    }

    /// Metadata for a live run at the current instant.
    #[must_use]
    pub fn now() -> Self {
        let now = Utc::now();
        Self::new(now.date_naive(), now)
    }
}

/// One row of the history file.
///
/// Field order is the column order. Every column except the date is optional
/// and an absent value is written as an empty field. Columns missing from an
/// older file load as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Deduplication key.
    pub run_date_utc: NaiveDate,
    /// When the row was written.
    #[serde(default)]
    pub run_timestamp_utc: Option<DateTime<Utc>>,
    /// Median FinFam APR.
    #[serde(default)]
    pub finfam_median: Option<f64>,
    /// Lowest FinFam APR.
    #[serde(default)]
    pub finfam_min: Option<f64>,
    /// Highest FinFam APR.
    #[serde(default)]
    pub finfam_max: Option<f64>,
    /// Lowest FinFam APR after outlier exclusion.
    #[serde(default)]
    pub finfam_best_apr: Option<f64>,
    /// Zillow Oregon 30-year fixed rate.
    #[serde(default)]
    pub zillow_or_30yr: Option<f64>,
    /// Bankrate Oregon 30-year fixed rate.
    #[serde(default)]
    pub bankrate_or_30yr: Option<f64>,
    /// FRED DGS10.
    #[serde(default)]
    pub fred_dgs10: Option<f64>,
    /// FRED MORTGAGE30US.
    #[serde(default)]
    pub fred_mortgage30us: Option<f64>,
    /// Yahoo ^TNX in percent.
    #[serde(default)]
    pub yahoo_tnx: Option<f64>,
    /// Number of FinFam quotes aggregated.
    #[serde(default)]
    pub finfam_count: Option<u32>,
    /// Institution offering the best APR.
    #[serde(default)]
    pub finfam_best_institution: Option<String>,
    /// Zillow Oregon 30-year fixed APR.
    #[serde(default)]
    pub zillow_or_30yr_apr: Option<f64>,
    /// URL of the FinFam file the quotes came from.
    #[serde(default)]
    pub finfam_url: Option<String>,
    /// Date of the FinFam file, earlier than the run date after a lookback.
    #[serde(default)]
    pub finfam_file_date: Option<NaiveDate>,
    /// FinFam `metadata.observation_date`, verbatim.
    #[serde(default)]
    pub finfam_observation_date: Option<String>,
    /// FinFam `metadata.last_updated`, verbatim.
    #[serde(default)]
    pub finfam_last_updated: Option<String>,
    /// Publication date of the DGS10 value.
    #[serde(default)]
    pub fred_dgs10_date: Option<NaiveDate>,
    /// Publication date of the MORTGAGE30US value.
    #[serde(default)]
    pub fred_mortgage30us_date: Option<NaiveDate>,
    /// Trading date of the ^TNX close.
    #[serde(default)]
    pub yahoo_tnx_date: Option<NaiveDate>,
}

impl DailyRecord {
    /// Column names in file order.
    pub const COLUMNS: [&'static str; 21] = [
        "run_date_utc",
        "run_timestamp_utc",
        "finfam_median",
        "finfam_min",
        "finfam_max",
        "finfam_best_apr",
        "zillow_or_30yr",
        "bankrate_or_30yr",
        "fred_dgs10",
        "fred_mortgage30us",
        "yahoo_tnx",
        "finfam_count",
        "finfam_best_institution",
        "zillow_or_30yr_apr",
        "finfam_url",
        "finfam_file_date",
        "finfam_observation_date",
        "finfam_last_updated",
        "fred_dgs10_date",
        "fred_mortgage30us_date",
        "yahoo_tnx_date",
    ];

    /// Creates a record with every metric empty.
    #[must_use]
    pub const fn empty(meta: RunMetadata) -> Self {
        Self {
            run_date_utc: meta.run_date_utc,
            run_timestamp_utc: Some(meta.run_timestamp_utc),
            finfam_median: None,
            finfam_min: None,
            finfam_max: None,
            finfam_best_apr: None,
            zillow_or_30yr: None,
            bankrate_or_30yr: None,
            fred_dgs10: None,
            fred_mortgage30us: None,
            yahoo_tnx: None,
            finfam_count: None,
            finfam_best_institution: None,
            zillow_or_30yr_apr: None,
            finfam_url: None,
            finfam_file_date: None,
            finfam_observation_date: None,
            finfam_last_updated: None,
            fred_dgs10_date: None,
            fred_mortgage30us_date: None,
            yahoo_tnx_date: None,
        }
    }

    /// Returns the value stored for `field`.
    #[must_use]
    pub const fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::FinfamMedian => self.finfam_median,
            Field::FinfamMin => self.finfam_min,
            Field::FinfamMax => self.finfam_max,
            Field::FinfamBestApr => self.finfam_best_apr,
            Field::ZillowOr30yr => self.zillow_or_30yr,
            Field::ZillowOr30yrApr => self.zillow_or_30yr_apr,
            Field::BankrateOr30yr => self.bankrate_or_30yr,
            Field::FredDgs10 => self.fred_dgs10,
            Field::FredMortgage30us => self.fred_mortgage30us,
            Field::YahooTnx => self.yahoo_tnx,
        }
    }

    /// Stores `value` in `field`, replacing any previous value.
    pub const fn set(&mut self, field: Field, value: f64) {
        let slot = match field {
            Field::FinfamMedian => &mut self.finfam_median,
            Field::FinfamMin => &mut self.finfam_min,
            Field::FinfamMax => &mut self.finfam_max,
            Field::FinfamBestApr => &mut self.finfam_best_apr,
            Field::ZillowOr30yr => &mut self.zillow_or_30yr,
            Field::ZillowOr30yrApr => &mut self.zillow_or_30yr_apr,
            Field::BankrateOr30yr => &mut self.bankrate_or_30yr,
            Field::FredDgs10 => &mut self.fred_dgs10,
            Field::FredMortgage30us => &mut self.fred_mortgage30us,
            Field::YahooTnx => &mut self.yahoo_tnx,
        };
        *slot = Some(value);
    }

    /// Returns the publication date stored for `field`, for fields taken from
    /// dated series.
    #[must_use]
    pub const fn observed_on(&self, field: Field) -> Option<NaiveDate> {
        match field {
            Field::FredDgs10 => self.fred_dgs10_date,
            Field::FredMortgage30us => self.fred_mortgage30us_date,
            Field::YahooTnx => self.yahoo_tnx_date,
            _ => None,
        }
    }

    /// Stores the publication date of `field`'s value. Fields without a date
    /// column are left unchanged.
    pub const fn set_observed_on(&mut self, field: Field, date: NaiveDate) {
        match field {
            Field::FredDgs10 => self.fred_dgs10_date = Some(date),
            Field::FredMortgage30us => self.fred_mortgage30us_date = Some(date),
            Field::YahooTnx => self.yahoo_tnx_date = Some(date),
            _ => {}
        }
    }

    /// Returns how many metric fields hold a value.
    #[must_use]
    pub fn populated_fields(&self) -> usize {
        Field::ALL
            .iter()
            .filter(|field| self.get(**field).is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn meta() -> RunMetadata {
        let now = Utc.with_ymd_and_hms(2025, 1, 6, 14, 30, 0).unwrap();
        RunMetadata::new(now.date_naive(), now)
    }

    #[test]
    fn test_empty_record() {
        let record = DailyRecord::empty(meta());
        assert_eq!(record.populated_fields(), 0);
        assert_eq!(
            record.run_date_utc,
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
        );
    }

    #[test]
    fn test_set_and_get_every_field() {
        let mut record = DailyRecord::empty(meta());
        for (i, field) in Field::ALL.into_iter().enumerate() {
            record.set(field, i as f64);
        }
        for (i, field) in Field::ALL.into_iter().enumerate() {
            assert_eq!(record.get(field), Some(i as f64));
        }
        assert_eq!(record.populated_fields(), Field::ALL.len());
    }

    #[test]
    fn test_metric_columns_are_record_columns() {
        for field in Field::ALL {
            assert!(DailyRecord::COLUMNS.contains(&field.column()));
        }
    }

    #[test]
    fn test_observation_dates() {
        let mut record = DailyRecord::empty(meta());
        let friday = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();

        record.set_observed_on(Field::FredDgs10, friday);
        record.set_observed_on(Field::ZillowOr30yr, friday);

        assert_eq!(record.fred_dgs10_date, Some(friday));
        assert_eq!(record.observed_on(Field::FredDgs10), Some(friday));
        assert_eq!(record.observed_on(Field::ZillowOr30yr), None);
        assert_eq!(record.observed_on(Field::YahooTnx), None);
    }

    #[test]
    fn test_timestamp_truncated_to_seconds() {
        let now = Utc.timestamp_opt(1_736_173_800, 123_456_789).unwrap();
        let meta = RunMetadata::new(now.date_naive(), now);
        assert_eq!(meta.run_timestamp_utc.timestamp_subsec_nanos(), 0);
    }
}
