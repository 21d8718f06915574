//! Display utilities and argument parsing for the ratelog CLI.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::ValueEnum;
use ratelog_lib::prelude::*;

/// Output format for the history command.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Table,
    Csv,
    Json,
    Ndjson,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Table => Self::Table,
            Format::Csv => Self::Csv,
            Format::Json => Self::Json,
            Format::Ndjson => Self::Ndjson,
        }
    }
}

/// Parses a `YYYY-MM-DD` argument.
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{value}', expected YYYY-MM-DD"))
}

/// Prints every field of a record, marking empty ones.
pub(crate) fn print_record(record: &DailyRecord) {
    println!("Date: {}", record.run_date_utc);
    for field in Field::ALL {
        match (record.get(field), record.observed_on(field)) {
            (Some(value), Some(observed)) if observed != record.run_date_utc => {
                println!("  {:<22} {value:.3} (as of {observed})", field.column());
            }
            (Some(value), _) => println!("  {:<22} {value:.3}", field.column()),
            (None, _) => println!("  {:<22} -", field.column()),
        }
    }
    if let Some(file_date) = record
        .finfam_file_date
        .filter(|date| *date != record.run_date_utc)
    {
        println!("  {:<22} {file_date}", "finfam_file_date");
    }
    if let Some(count) = record.finfam_count {
        println!("  {:<22} {count}", "finfam_count");
    }
    if let Some(institution) = &record.finfam_best_institution {
        println!("  {:<22} {institution}", "finfam_best_institution");
    }
}

/// Prints one line per source that contributed nothing.
pub(crate) fn print_absent_sources(reports: &[SourceReport]) {
    for report in reports {
        if let SourceResult::Absent(reason) = &report.result {
            println!("  {} unavailable: {reason}", report.source);
        }
    }
}
