//! Core types for the ratelog rate tracker.
//!
//! This crate provides the fundamental data structures used throughout ratelog:
//!
//! - [`Field`] / [`Observation`] - A tracked metric and one extracted value
//! - [`LenderQuote`] - A single lender's APR quote
//! - [`SourceResult`] - Tagged success-or-absent outcome of one source
//! - [`DailySeries`] - Dated values from a structured series
//! - [`DailyRecord`] - The persisted row, keyed by run date
//! - [`DateRange`] - Date range for backfills

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ratelog/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod date_range;
mod error;
mod field;
mod quote;
mod record;
mod series;
mod source;

pub use date_range::{DateRange, DayIterator};
pub use error::{DateRangeError, UnknownField};
pub use field::{Field, Observation, Unit};
pub use quote::{LenderQuote, QuoteFile};
pub use record::{DailyRecord, RunMetadata};
pub use series::DailySeries;
pub use source::{AbsentReason, SourcePayload, SourceReport, SourceResult};
