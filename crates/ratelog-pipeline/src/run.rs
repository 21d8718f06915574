//! The scheduled daily run.

use ratelog_aggregate::QuoteAggregator;
use ratelog_fetch::{CollectRequest, FetchClient, RunMode, Source};
use ratelog_format::{MergeOutcome, merge_and_write};
use ratelog_types::{DailyRecord, RunMetadata, SourceReport};
use tracing::info;

use crate::{PipelineConfig, PipelineError, build_record_with, collect, default_sources};

/// What a daily run produced.
#[derive(Debug, Clone)]
pub struct DailyOutcome {
    /// The row written.
    pub record: DailyRecord,
    /// Per-source outcomes, in source order.
    pub reports: Vec<SourceReport>,
    /// Result of merging the row into the history file.
    pub merge: MergeOutcome,
}

/// Collects today's (UTC) figures from every source and merges the row into
/// the history file.
///
/// Source failures leave their fields empty and do not fail the run.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created or the history file
/// cannot be read or written.
pub async fn run_daily(config: &PipelineConfig) -> Result<DailyOutcome, PipelineError> {
    let client = FetchClient::new(config.client.clone())?;
    let meta = RunMetadata::now();
    let sources = default_sources(config, RunMode::Live, meta.run_date_utc);
    run_once(&client, &sources, meta, config).await
}

/// Runs one live collection with the given sources and writes the row.
///
/// # Errors
///
/// Returns an error if the history file cannot be read or written.
pub async fn run_once(
    client: &FetchClient,
    sources: &[Box<dyn Source>],
    meta: RunMetadata,
    config: &PipelineConfig,
) -> Result<DailyOutcome, PipelineError> {
    info!(date = %meta.run_date_utc, sources = sources.len(), "starting daily run");

    let request = CollectRequest::live(meta.run_date_utc);
    let reports = collect(client, sources, &request, config.source_timeout).await;
    let aggregator = QuoteAggregator::new(config.outlier_policy);
    let record = build_record_with(&aggregator, &meta, &reports);
    let merge = merge_and_write(&config.output, record.clone())?;

    info!(
        date = %record.run_date_utc,
        path = %config.output.display(),
        fields = record.populated_fields(),
        replaced = merge.replaced,
        rows = merge.total_rows,
        "wrote daily record"
    );

    Ok(DailyOutcome {
        record,
        reports,
        merge,
    })
}
