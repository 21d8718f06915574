//! HTTP client and source parsing for the ratelog rate tracker.
//!
//! This crate provides the collection side of the pipeline:
//!
//! - [`FetchClient`] - HTTP client with browser headers, timeouts and retries
//! - [`url`] - Source URL construction
//! - [`extract::extract_first_float`] - Numeric extraction from scraped text
//! - [`sources::Source`] - The per-source fetch and parse contract, with one
//!   implementation per upstream

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ratelog/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
pub mod extract;
pub mod sources;
pub mod url;

pub use client::{BROWSER_USER_AGENT, ClientConfig, DEFAULT_ACCEPT, FetchClient, FetchError};
pub use sources::{CollectRequest, RunMode, Source, SourceCapabilities, SourceError};
