//! Concurrent fan-out over sources.

use std::time::Duration;

use futures::future::join_all;
use ratelog_fetch::{CollectRequest, FetchClient, RunMode, Source};
use ratelog_types::{AbsentReason, SourceReport, SourceResult};
use tracing::{debug, warn};

/// Runs every source concurrently and waits for all of them.
///
/// Each source gets at most `timeout`. Failures and timeouts become
/// [`SourceResult::Absent`] and are logged; they never fail the run. In
/// backfill mode, sources that only publish current snapshots are reported as
/// [`AbsentReason::SnapshotOnly`] without being called.
///
/// Reports are returned in the order of `sources`.
pub async fn collect(
    client: &FetchClient,
    sources: &[Box<dyn Source>],
    request: &CollectRequest,
    timeout: Duration,
) -> Vec<SourceReport> {
    join_all(
        sources
            .iter()
            .map(|source| collect_one(client, source.as_ref(), request, timeout)),
    )
    .await
}

async fn collect_one(
    client: &FetchClient,
    source: &dyn Source,
    request: &CollectRequest,
    timeout: Duration,
) -> SourceReport {
    let name = source.name();

    if request.mode == RunMode::Backfill && !source.capabilities().supports_backfill {
        debug!(source = name, date = %request.date, "snapshot-only source skipped");
        return SourceReport::new(name, SourceResult::Absent(AbsentReason::SnapshotOnly));
    }

    let result = match tokio::time::timeout(timeout, source.collect(client, request)).await {
        Ok(Ok(payload)) => {
            debug!(source = name, date = %request.date, "source succeeded");
            SourceResult::Success(payload)
        }
        Ok(Err(e)) => {
            warn!(source = name, date = %request.date, error = %e, "source failed");
            SourceResult::Absent(e.into_absent())
        }
        Err(_) => {
            warn!(source = name, date = %request.date, ?timeout, "source timed out");
            SourceResult::Absent(AbsentReason::TimedOut(timeout))
        }
    };
    SourceReport::new(name, result)
}
