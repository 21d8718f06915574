//! Daily mortgage and treasury rate collection.
//!
//! This is a facade crate that re-exports functionality from the ratelog
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```no_run
//! use ratelog_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::default().with_output("data/mortgage_daily.csv");
//!     let outcome = run_daily(&config).await?;
//!     println!(
//!         "{}: best APR {:?}",
//!         outcome.record.run_date_utc, outcome.record.finfam_best_apr
//!     );
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ratelog/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use ratelog_types::*;

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use ratelog_fetch::{
    ClientConfig, CollectRequest, FetchClient, FetchError, RunMode, Source, SourceCapabilities,
    SourceError, extract, sources, url,
};

// Re-export aggregation
#[cfg(feature = "aggregate")]
pub use ratelog_aggregate::{AggregateStats, OutlierPolicy, QuoteAggregator, aggregate};

// Re-export storage and formatting
#[cfg(feature = "format")]
pub use ratelog_format::{
    FormatError, HistoryStore, MergeOutcome, OutputFormat, StoreError, merge_and_write,
};

// Re-export the pipeline
#[cfg(feature = "pipeline")]
pub use ratelog_pipeline::{
    BackfillEvent, BackfillOptions, BackfillSummary, DEFAULT_OUTPUT, DailyOutcome,
    PipelineConfig, PipelineError, build_record, collect, default_sources, run_backfill,
    run_daily,
};

/// Prelude module for convenient imports.
///
/// ```
/// use ratelog_lib::prelude::*;
/// ```
pub mod prelude {
    pub use ratelog_types::{
        AbsentReason, DailyRecord, DailySeries, DateRange, DateRangeError, Field, LenderQuote,
        Observation, QuoteFile, RunMetadata, SourcePayload, SourceReport, SourceResult,
    };

    #[cfg(feature = "fetch")]
    pub use ratelog_fetch::{ClientConfig, FetchClient, RunMode, Source};

    #[cfg(feature = "aggregate")]
    pub use ratelog_aggregate::{AggregateStats, OutlierPolicy, aggregate};

    #[cfg(feature = "format")]
    pub use ratelog_format::{HistoryStore, OutputFormat};

    #[cfg(feature = "pipeline")]
    pub use ratelog_pipeline::{
        BackfillOptions, PipelineConfig, run_backfill, run_daily,
    };
}
