//! The fixed source set.

use chrono::{NaiveDate, Utc};
use ratelog_fetch::RunMode;
use ratelog_fetch::Source;
use ratelog_fetch::sources::{
    BankrateSource, FinfamSource, FredSource, LIVE_RANGE, YahooSource, ZillowSource,
    backfill_range,
};

use crate::PipelineConfig;

/// Builds every source for a run.
///
/// `earliest` is the oldest date the run will ask for; backfills use it to
/// size the Yahoo chart download.
#[must_use]
pub fn default_sources(
    config: &PipelineConfig,
    mode: RunMode,
    earliest: NaiveDate,
) -> Vec<Box<dyn Source>> {
    let yahoo_range = match mode {
        RunMode::Live => LIVE_RANGE,
        RunMode::Backfill => backfill_range(earliest, Utc::now().date_naive()),
    };

    vec![
        Box::new(FinfamSource::new(config.finfam_lookback_days)),
        Box::new(ZillowSource::new()),
        Box::new(BankrateSource::new()),
        Box::new(FredSource::dgs10()),
        Box::new(FredSource::mortgage30us()),
        Box::new(YahooSource::tnx().with_range(yahoo_range)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources() {
        let sources = default_sources(
            &PipelineConfig::default(),
            RunMode::Live,
            Utc::now().date_naive(),
        );
        let names: Vec<_> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "finfam",
                "zillow",
                "bankrate",
                "fred_dgs10",
                "fred_mortgage30us",
                "yahoo"
            ]
        );

        let snapshot_only: Vec<_> = sources
            .iter()
            .filter(|s| !s.capabilities().supports_backfill)
            .map(|s| s.name())
            .collect();
        assert_eq!(snapshot_only, vec!["zillow", "bankrate"]);
    }
}
