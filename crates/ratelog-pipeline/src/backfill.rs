//! Historical backfill.

use chrono::{NaiveDate, Utc};
use ratelog_aggregate::QuoteAggregator;
use ratelog_fetch::{CollectRequest, FetchClient, RunMode, Source};
use ratelog_format::HistoryStore;
use ratelog_types::{DateRange, RunMetadata};
use tracing::info;

use crate::{PipelineConfig, PipelineError, build_record_with, collect, default_sources};

/// Backfill behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillOptions {
    /// Replace rows that already exist. Off by default so rows captured live,
    /// which include the snapshot-only sources, are kept.
    pub overwrite: bool,
}

/// Progress reported once per date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackfillEvent {
    /// A row already existed and was left alone.
    Skipped {
        /// The date.
        date: NaiveDate,
    },
    /// A row was written.
    Written {
        /// The date.
        date: NaiveDate,
        /// Metric fields populated in the row.
        fields: usize,
        /// Whether an existing row was replaced.
        replaced: bool,
    },
}

/// Totals for a completed backfill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillSummary {
    /// Rows written.
    pub written: usize,
    /// Dates skipped because a row already existed.
    pub skipped: usize,
    /// Rows in the history file afterwards.
    pub total_rows: usize,
}

/// Reconstructs rows for every date in `range` from the sources that keep
/// history.
///
/// Sources are built once, so FRED and Yahoo download each series a single
/// time for the whole range. The file is saved after every date.
///
/// # Errors
///
/// Returns an error if `range` ends after today (UTC), the HTTP client
/// cannot be created or the history file cannot be read or written.
pub async fn run_backfill(
    config: &PipelineConfig,
    range: DateRange,
    options: BackfillOptions,
    on_event: impl FnMut(BackfillEvent),
) -> Result<BackfillSummary, PipelineError> {
    let client = FetchClient::new(config.client.clone())?;
    let sources = default_sources(config, RunMode::Backfill, range.start);
    backfill_with(&client, &sources, config, range, options, on_event).await
}

/// Runs a backfill over `range` with the given sources.
///
/// # Errors
///
/// Returns an error if `range` ends after today (UTC) or the history file
/// cannot be read or written.
pub async fn backfill_with(
    client: &FetchClient,
    sources: &[Box<dyn Source>],
    config: &PipelineConfig,
    range: DateRange,
    options: BackfillOptions,
    mut on_event: impl FnMut(BackfillEvent),
) -> Result<BackfillSummary, PipelineError> {
    // Structured sources answer any later date with their last value.
    range.ensure_ends_by(Utc::now().date_naive())?;
    info!(%range, days = range.total_days(), overwrite = options.overwrite, "starting backfill");

    let mut store = HistoryStore::load(&config.output)?;
    let aggregator = QuoteAggregator::new(config.outlier_policy);
    let mut summary = BackfillSummary::default();

    for date in range.days() {
        if !options.overwrite && store.contains(date) {
            summary.skipped += 1;
            on_event(BackfillEvent::Skipped { date });
            continue;
        }

        let request = CollectRequest::backfill(date);
        let reports = collect(client, sources, &request, config.source_timeout).await;
        let record = build_record_with(&aggregator, &RunMetadata::new(date, Utc::now()), &reports);
        let fields = record.populated_fields();

        let replaced = store.upsert(record).is_some();
        store.save(&config.output)?;

        summary.written += 1;
        info!(%date, fields, replaced, "backfilled");
        on_event(BackfillEvent::Written {
            date,
            fields,
            replaced,
        });
    }

    summary.total_rows = store.len();
    info!(
        written = summary.written,
        skipped = summary.skipped,
        rows = summary.total_rows,
        "backfill complete"
    );
    Ok(summary)
}
