//! The CSV history file.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use ratelog_types::DailyRecord;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::StoreError;

/// Result of merging one record into the history file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Whether a row with the same date was replaced.
    pub replaced: bool,
    /// Rows in the file after the write.
    pub total_rows: usize,
}

/// All rows of the history file, keyed and ordered by run date.
///
/// There is never more than one row per date: inserting a record for a date
/// already present replaces the earlier row.
///
/// Columns in a loaded file that no record field covers, such as those
/// written by other tools, are carried through and written back after the
/// known columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryStore {
    records: BTreeMap<NaiveDate, DailyRecord>,
    extra_columns: Vec<String>,
    extra_values: BTreeMap<NaiveDate, Vec<String>>,
}

impl HistoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the history file at `path`.
    ///
    /// A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is not valid CSV.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        match File::open(path) {
            Ok(file) => {
                let store = Self::from_reader(file)?;
                debug!(path = %path.display(), rows = store.len(), "loaded history");
                Ok(store)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no history file yet");
                Ok(Self::new())
            }
            Err(source) => Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Reads rows from CSV with a header line.
    ///
    /// Columns are matched by name: columns missing from the input load as
    /// empty and unknown columns are kept verbatim. When a date appears twice
    /// the later row wins.
    ///
    /// # Errors
    ///
    /// Returns an error if a row cannot be decoded.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let extras: Vec<(usize, &str)> = headers
            .iter()
            .enumerate()
            .filter(|(_, name)| !DailyRecord::COLUMNS.contains(name))
            .collect();

        let mut store = Self::new();
        store.extra_columns = extras.iter().map(|(_, name)| (*name).to_string()).collect();
        if !extras.is_empty() {
            debug!(columns = ?store.extra_columns, "keeping unrecognized columns");
        }

        for row in reader.records() {
            let row = row?;
            let record: DailyRecord = row.deserialize(Some(&headers))?;
            let date = record.run_date_utc;
            store.upsert(record);
            if !extras.is_empty() {
                let values = extras
                    .iter()
                    .map(|(idx, _)| row.get(*idx).unwrap_or_default().to_string())
                    .collect();
                store.extra_values.insert(date, values);
            }
        }
        Ok(store)
    }

    /// Inserts `record`, returning the row it replaced, if any.
    ///
    /// Values the replaced row held in unrecognized columns go with it.
    pub fn upsert(&mut self, record: DailyRecord) -> Option<DailyRecord> {
        self.extra_values.remove(&record.run_date_utc);
        self.records.insert(record.run_date_utc, record)
    }

    /// Returns the loaded columns that no record field covers, in file order.
    #[must_use]
    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    /// Returns the value of the unrecognized `column` in the row for `date`.
    #[must_use]
    pub fn extra_value(&self, date: NaiveDate, column: &str) -> Option<&str> {
        let idx = self.extra_columns.iter().position(|c| c == column)?;
        self.extra_values
            .get(&date)
            .and_then(|values| values.get(idx))
            .map(String::as_str)
    }

    /// Returns true if a row exists for `date`.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.records.contains_key(&date)
    }

    /// Returns the row for `date`.
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.records.get(&date)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over rows in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = &DailyRecord> {
        self.records.values()
    }

    /// Returns the most recent `n` rows, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<&DailyRecord> {
        self.records
            .values()
            .skip(self.records.len().saturating_sub(n))
            .collect()
    }

    /// Writes every row as CSV, header first, with unrecognized columns
    /// after the known ones.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), StoreError> {
        let blank = vec![String::new(); self.extra_columns.len()];
        let rows = self.records.iter().map(|(date, record)| {
            let extras = self.extra_values.get(date).unwrap_or(&blank);
            (record, extras.as_slice())
        });
        write_rows(writer, &self.extra_columns, rows)?;
        Ok(())
    }

    /// Atomically replaces the file at `path` with the store's contents.
    ///
    /// Parent directories are created as needed. Rows are written to a
    /// temporary file in the target directory, synced, then renamed over the
    /// target, so readers see either the old or the new file.
    ///
    /// # Errors
    ///
    /// Returns an error if any step of the write fails.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let write_err = |source| StoreError::Write {
            path: dir.clone(),
            source,
        };

        fs::create_dir_all(&dir).map_err(write_err)?;
        let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
        self.write_to(&mut tmp)?;
        // Temporary files are private; keep the mode of the file being replaced.
        match fs::metadata(path) {
            Ok(existing) => tmp
                .as_file()
                .set_permissions(existing.permissions())
                .map_err(write_err)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(path).map_err(|e| StoreError::Persist {
            path: path.to_path_buf(),
            source: e.error,
        })?;

        debug!(path = %path.display(), rows = self.len(), "saved history");
        Ok(())
    }
}

/// Writes `records` as CSV with the full header, even when there are no rows.
///
/// # Errors
///
/// Returns an error if a row cannot be encoded or writing fails.
pub fn write_csv<'a, W: Write>(
    records: impl IntoIterator<Item = &'a DailyRecord>,
    writer: W,
) -> Result<(), csv::Error> {
    let no_extras: &[String] = &[];
    write_rows(
        writer,
        &[],
        records.into_iter().map(|record| (record, no_extras)),
    )
}

fn write_rows<'a, W: Write>(
    writer: W,
    extra_columns: &[String],
    rows: impl IntoIterator<Item = (&'a DailyRecord, &'a [String])>,
) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(
        DailyRecord::COLUMNS
            .iter()
            .copied()
            .chain(extra_columns.iter().map(String::as_str)),
    )?;
    for row in rows {
        // A (record, values) tuple is written as one flat row.
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Loads the history at `path`, inserts `record` replacing any row with the
/// same date, and atomically rewrites the file.
///
/// # Errors
///
/// Returns an error if the existing file cannot be read or the new file
/// cannot be written.
pub fn merge_and_write(path: &Path, record: DailyRecord) -> Result<MergeOutcome, StoreError> {
    let mut store = HistoryStore::load(path)?;
    let replaced = store.upsert(record).is_some();
    store.save(path)?;
    Ok(MergeOutcome {
        replaced,
        total_rows: store.len(),
    })
}
