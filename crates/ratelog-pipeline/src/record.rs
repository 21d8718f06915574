//! Folding source results into one record.

use ratelog_aggregate::{AggregateStats, QuoteAggregator};
use ratelog_types::{
    DailyRecord, Field, QuoteFile, RunMetadata, SourcePayload, SourceReport, SourceResult,
};
use tracing::debug;

/// Builds the day's record from every source's report with the default
/// outlier policy.
#[must_use]
pub fn build_record(meta: &RunMetadata, reports: &[SourceReport]) -> DailyRecord {
    build_record_with(&QuoteAggregator::default(), meta, reports)
}

/// Builds the day's record, aggregating lender quotes with `aggregator`.
///
/// Quote payloads fill the `finfam_*` fields and their file provenance,
/// observations set their own field and publication date, and absent sources
/// leave their fields empty. Never fails: a day
/// where every source was absent still yields a record with only the run
/// metadata.
#[must_use]
pub fn build_record_with(
    aggregator: &QuoteAggregator,
    meta: &RunMetadata,
    reports: &[SourceReport],
) -> DailyRecord {
    let mut record = DailyRecord::empty(*meta);

    for report in reports {
        match &report.result {
            SourceResult::Success(SourcePayload::Quotes { quotes, file }) => {
                apply_file(&mut record, file);
                match aggregator.aggregate(quotes) {
                    Some(stats) => apply_stats(&mut record, stats),
                    None => debug!(source = %report.source, "no usable quotes"),
                }
            }
            SourceResult::Success(SourcePayload::Observations(observations)) => {
                for observation in observations.iter().filter(|o| o.value.is_finite()) {
                    record.set(observation.field, observation.value);
                    if let Some(observed) = observation.observed_on {
                        record.set_observed_on(observation.field, observed);
                    }
                }
            }
            SourceResult::Absent(reason) => {
                debug!(source = %report.source, %reason, "source absent from record");
            }
        }
    }

    record
}

fn apply_file(record: &mut DailyRecord, file: &QuoteFile) {
    record.finfam_url.clone_from(&file.url);
    record.finfam_file_date = file.file_date;
    record.finfam_observation_date.clone_from(&file.observation_date);
    record.finfam_last_updated.clone_from(&file.last_updated);
}

fn apply_stats(record: &mut DailyRecord, stats: AggregateStats) {
    record.set(Field::FinfamMedian, stats.median);
    record.set(Field::FinfamMin, stats.min);
    record.set(Field::FinfamMax, stats.max);
    if let Some(best) = stats.best_apr {
        record.set(Field::FinfamBestApr, best);
    }
    record.finfam_count = u32::try_from(stats.count).ok();
    record.finfam_best_institution = stats.best_institution;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{date, observations};
    use chrono::{TimeZone, Utc};
    use ratelog_aggregate::OutlierPolicy;
    use ratelog_types::{AbsentReason, LenderQuote, Observation};

    fn meta() -> RunMetadata {
        RunMetadata::new(date(2025, 1, 6), Utc.with_ymd_and_hms(2025, 1, 6, 14, 0, 0).unwrap())
    }

    fn quotes(aprs: &[f64]) -> SourceResult {
        SourceResult::Success(SourcePayload::quotes(
            aprs.iter()
                .enumerate()
                .map(|(i, apr)| LenderQuote::new(format!("Lender {i}"), *apr))
                .collect(),
        ))
    }

    #[test]
    fn test_quotes_fill_finfam_fields() {
        let record = build_record(
            &meta(),
            &[SourceReport::new("finfam", quotes(&[5.9, 6.0, 6.1, 6.2, 9.9]))],
        );
        assert_eq!(record.finfam_median, Some(6.1));
        assert_eq!(record.finfam_min, Some(5.9));
        assert_eq!(record.finfam_max, Some(9.9));
        assert_eq!(record.finfam_best_apr, Some(5.9));
        assert_eq!(record.finfam_count, Some(5));
        assert_eq!(record.finfam_best_institution.as_deref(), Some("Lender 0"));
    }

    #[test]
    fn test_empty_quotes_leave_fields_empty() {
        let reports = [SourceReport::new(
            "finfam",
            SourceResult::Success(SourcePayload::quotes(Vec::new())),
        )];
        let record = build_record(&meta(), &reports);
        assert_eq!(record.populated_fields(), 0);
        assert_eq!(record.finfam_count, None);
    }

    #[test]
    fn test_all_absent_yields_metadata_only() {
        let reports = [
            SourceReport::new("finfam", SourceResult::Absent(AbsentReason::FetchFailed("x".into()))),
            SourceReport::new("zillow", SourceResult::Absent(AbsentReason::SnapshotOnly)),
        ];
        let record = build_record(&meta(), &reports);
        assert_eq!(record.populated_fields(), 0);
        assert_eq!(record.run_date_utc, date(2025, 1, 6));
        assert!(record.run_timestamp_utc.is_some());
    }

    #[test]
    fn test_observations_set_their_fields() {
        let reports = [
            SourceReport::new(
                "zillow",
                SourceResult::Success(SourcePayload::Observations(vec![
                    Observation::percent(Field::ZillowOr30yr, 6.02),
                    Observation::percent(Field::ZillowOr30yrApr, f64::NAN),
                ])),
            ),
            SourceReport::new("yahoo", SourceResult::Success(observations(Field::YahooTnx, 4.62))),
        ];
        let record = build_record(&meta(), &reports);
        assert_eq!(record.zillow_or_30yr, Some(6.02));
        assert_eq!(record.zillow_or_30yr_apr, None);
        assert_eq!(record.yahoo_tnx, Some(4.62));
        assert_eq!(record.bankrate_or_30yr, None);
    }

    #[test]
    fn test_outlier_policy_is_applied() {
        let reports = [SourceReport::new(
            "finfam",
            quotes(&[3.0, 6.0, 6.1, 6.2, 6.3]),
        )];
        assert_eq!(build_record(&meta(), &reports).finfam_best_apr, Some(6.0));

        let aggregator = QuoteAggregator::new(OutlierPolicy::None);
        let record = build_record_with(&aggregator, &meta(), &reports);
        assert_eq!(record.finfam_best_apr, Some(3.0));
    }

    #[test]
    fn test_provenance_columns() {
        let file = QuoteFile {
            url: Some("https://example.invalid/rates_2025-01-04.json".into()),
            file_date: Some(date(2025, 1, 4)),
            observation_date: Some("2025-01-04".into()),
            last_updated: Some("2025-01-04T12:00:00Z".into()),
        };
        let reports = [
            SourceReport::new(
                "finfam",
                SourceResult::Success(SourcePayload::Quotes {
                    quotes: Vec::new(),
                    file: file.clone(),
                }),
            ),
            SourceReport::new(
                "fred_mortgage30us",
                SourceResult::Success(SourcePayload::Observations(vec![
                    Observation::percent(Field::FredMortgage30us, 6.91)
                        .with_observed_on(date(2025, 1, 2)),
                ])),
            ),
            SourceReport::new("fred_dgs10", SourceResult::Success(observations(Field::FredDgs10, 4.6))),
        ];
        let record = build_record(&meta(), &reports);

        assert_eq!(record.finfam_url, file.url);
        assert_eq!(record.finfam_file_date, Some(date(2025, 1, 4)));
        assert_eq!(record.finfam_observation_date.as_deref(), Some("2025-01-04"));
        assert_eq!(record.finfam_last_updated.as_deref(), Some("2025-01-04T12:00:00Z"));
        assert_eq!(record.finfam_median, None);
        assert_eq!(record.fred_mortgage30us, Some(6.91));
        assert_eq!(record.fred_mortgage30us_date, Some(date(2025, 1, 2)));
        assert_eq!(record.fred_dgs10, Some(4.6));
        assert_eq!(record.fred_dgs10_date, None);
    }
}
