//! Single daily run.

use anyhow::{Context, Result};
use ratelog_lib::prelude::*;

use crate::display::{print_absent_sources, print_record};

/// Collects today's figures and merges them into the history file.
pub(crate) async fn run(config: &PipelineConfig) -> Result<()> {
    let outcome = run_daily(config)
        .await
        .with_context(|| format!("Daily run failed for {}", config.output.display()))?;

    print_record(&outcome.record);
    print_absent_sources(&outcome.reports);

    let action = if outcome.merge.replaced {
        "Replaced"
    } else {
        "Added"
    };
    println!(
        "{action} row in {} ({} rows)",
        config.output.display(),
        outcome.merge.total_rows
    );
    Ok(())
}
