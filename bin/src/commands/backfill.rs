//! Historical backfill command.

use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use ratelog_lib::BackfillEvent;
use ratelog_lib::prelude::*;

use crate::display::parse_date;

/// Backfills `days` days ending today, or the explicit `start..=end` range.
pub(crate) async fn backfill(
    config: &PipelineConfig,
    days: u32,
    start: Option<&str>,
    end: Option<&str>,
    overwrite: bool,
    quiet: bool,
) -> Result<()> {
    let today = Utc::now().date_naive();
    let end = end.map(parse_date).transpose()?.unwrap_or(today);
    let range = match start {
        Some(start) => DateRange::new(parse_date(start)?, end)?,
        None => DateRange::last_n_days(end, days)?,
    };

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(range.total_days() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} days ({percent}%) {msg}")
                .context("Invalid progress template")?
                .progress_chars("#>-"),
        );
        pb
    };

    let summary = run_backfill(config, range, BackfillOptions { overwrite }, |event| {
        match event {
            BackfillEvent::Skipped { date } => pb.set_message(format!("{date} kept")),
            BackfillEvent::Written { date, fields, .. } => {
                pb.set_message(format!("{date} {fields} fields"));
            }
        }
        pb.inc(1);
    })
    .await
    .with_context(|| format!("Backfill of {range} failed"))?;

    pb.finish_with_message("done");

    println!(
        "Backfilled {range}: {} written, {} skipped, {} rows in {}",
        summary.written,
        summary.skipped,
        summary.total_rows,
        config.output.display()
    );
    Ok(())
}
