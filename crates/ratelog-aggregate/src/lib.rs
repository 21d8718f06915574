//! Lender quote aggregation for the ratelog rate tracker.
//!
//! - [`QuoteAggregator`] - Computes [`AggregateStats`] under an [`OutlierPolicy`]
//! - [`aggregate`] - Shorthand using the default policy

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ratelog/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod stats;

pub use aggregator::{OutlierPolicy, QuoteAggregator, aggregate};
pub use stats::AggregateStats;
