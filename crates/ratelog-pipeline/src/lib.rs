//! Collection pipeline for the ratelog rate tracker.
//!
//! - [`run_daily`] - One live run: collect, build, merge into the history file
//! - [`run_backfill`] - Reconstruct rows for a range of past dates
//! - [`collect`] - Concurrent fan-out with per-source timeouts
//! - [`build_record`] - Fold per-source results into a [`DailyRecord`]
//!
//! [`DailyRecord`]: ratelog_types::DailyRecord

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ratelog/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod backfill;
mod collect;
mod config;
mod error;
mod record;
mod run;
mod sources;

#[cfg(test)]
mod testing;

pub use backfill::{BackfillEvent, BackfillOptions, BackfillSummary, backfill_with, run_backfill};
pub use collect::collect;
pub use config::{DEFAULT_OUTPUT, PipelineConfig};
pub use error::PipelineError;
pub use record::{build_record, build_record_with};
pub use run::{DailyOutcome, run_daily, run_once};
pub use sources::default_sources;
