//! Log subscriber setup.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs the global subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence; otherwise the level follows the flags.
pub(crate) fn init(verbose: u8, quiet: bool) -> Result<()> {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
