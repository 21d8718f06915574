//! Rendering records for display.

use std::io::Write;

use ratelog_types::{DailyRecord, Field};

use crate::FormatError;
use crate::store::write_csv;

/// Columns shown by the table view, after the date.
const TABLE_FIELDS: [Field; 7] = [
    Field::FinfamBestApr,
    Field::FinfamMedian,
    Field::ZillowOr30yr,
    Field::BankrateOr30yr,
    Field::FredMortgage30us,
    Field::FredDgs10,
    Field::YahooTnx,
];

/// Output format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Aligned text table of the headline rates.
    #[default]
    Table,
    /// CSV with every column, as stored.
    Csv,
    /// JSON array.
    Json,
    /// Newline-delimited JSON.
    Ndjson,
}

impl OutputFormat {
    /// Returns the format name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Table, Self::Csv, Self::Json, Self::Ndjson]
    }

    /// Writes `records` to `writer` in this format.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn write<W: Write>(&self, records: &[&DailyRecord], mut writer: W) -> Result<(), FormatError> {
        match self {
            Self::Table => write_table(records, &mut writer)?,
            Self::Csv => write_csv(records.iter().copied(), &mut writer)?,
            Self::Json => {
                serde_json::to_writer_pretty(&mut writer, records)?;
                writeln!(writer)?;
            }
            Self::Ndjson => {
                for record in records {
                    serde_json::to_writer(&mut writer, record)?;
                    writeln!(writer)?;
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

fn write_table<W: Write>(records: &[&DailyRecord], writer: &mut W) -> Result<(), FormatError> {
    write!(writer, "{:<12}", "date")?;
    for field in TABLE_FIELDS {
        write!(writer, " {:>18}", field.column())?;
    }
    writeln!(writer)?;

    for record in records {
        write!(writer, "{:<12}", record.run_date_utc)?;
        for field in TABLE_FIELDS {
            match record.get(field) {
                Some(value) => write!(writer, " {value:>18.3}")?,
                None => write!(writer, " {:>18}", "-")?,
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ratelog_types::RunMetadata;

    fn record() -> DailyRecord {
        let now = Utc.with_ymd_and_hms(2025, 1, 6, 14, 30, 0).unwrap();
        let mut record = DailyRecord::empty(RunMetadata::new(now.date_naive(), now));
        record.set(Field::FinfamBestApr, 5.875);
        record.set(Field::YahooTnx, 4.62);
        record
    }

    fn render(format: OutputFormat) -> String {
        let record = record();
        let mut out = Vec::new();
        format.write(&[&record], &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Ndjson);
        assert!("parquet".parse::<OutputFormat>().is_err());
        for format in OutputFormat::all() {
            assert_eq!(format.name().parse::<OutputFormat>().unwrap(), *format);
        }
    }

    #[test]
    fn test_table_marks_missing_values() {
        let text = render(OutputFormat::Table);
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("2025-01-06"));
        assert!(row.contains("5.875"));
        assert!(row.contains("4.620"));
        assert_eq!(row.matches(" -").count(), 5);
    }

    #[test]
    fn test_ndjson_one_object_per_line() {
        let text = render(OutputFormat::Ndjson);
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["run_date_utc"], "2025-01-06");
        assert_eq!(value["finfam_best_apr"], 5.875);
        assert!(value["zillow_or_30yr"].is_null());
    }

    #[test]
    fn test_csv_uses_store_layout() {
        let text = render(OutputFormat::Csv);
        assert!(text.starts_with("run_date_utc,run_timestamp_utc,"));
        assert_eq!(text.lines().count(), 2);
    }
}
