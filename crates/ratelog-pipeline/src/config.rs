//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

use ratelog_aggregate::OutlierPolicy;
use ratelog_fetch::ClientConfig;

/// Default location of the history file.
pub const DEFAULT_OUTPUT: &str = "data/mortgage_daily.csv";

/// Settings for a daily run or backfill.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// History CSV path.
    pub output: PathBuf,
    /// HTTP client settings.
    pub client: ClientConfig,
    /// Upper bound on one source's total time, retries included.
    pub source_timeout: Duration,
    /// Days FinFam may look back for its latest file on live runs.
    pub finfam_lookback_days: u32,
    /// Outlier rule for the best-APR figure.
    pub outlier_policy: OutlierPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            client: ClientConfig::default(),
            source_timeout: Duration::from_secs(120),
            finfam_lookback_days: 10,
            outlier_policy: OutlierPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Sets the history file path.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Sets the per-source timeout.
    #[must_use]
    pub const fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }
}
