//! History storage and record formatting for the ratelog rate tracker.
//!
//! - [`HistoryStore`] - Rows keyed by run date, loaded from and atomically
//!   saved to a CSV file
//! - [`merge_and_write`] - Load, replace-or-insert one row, rewrite
//! - [`OutputFormat`] - Table, CSV or JSON rendering of records

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ratelog/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod formatter;
mod store;

pub use error::{FormatError, StoreError};
pub use formatter::OutputFormat;
pub use store::{HistoryStore, MergeOutcome, merge_and_write, write_csv};
