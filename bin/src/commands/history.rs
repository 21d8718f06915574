//! Show recent rows from the history file.

use anyhow::{Context, Result};
use ratelog_lib::prelude::*;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::display::Format;

/// Prints the most recent `limit` rows.
pub(crate) fn history(path: &Path, limit: usize, format: Format) -> Result<()> {
    let store = HistoryStore::load(path)
        .with_context(|| format!("Failed to load history from {}", path.display()))?;

    if store.is_empty() {
        eprintln!("No rows in {}", path.display());
        return Ok(());
    }

    let rows = store.recent(limit);
    let mut out = BufWriter::new(std::io::stdout().lock());
    OutputFormat::from(format).write(&rows, &mut out)?;
    out.flush()?;
    Ok(())
}
