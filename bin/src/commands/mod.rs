//! CLI command implementations.

pub(crate) mod backfill;
pub(crate) mod history;
pub(crate) mod run;
