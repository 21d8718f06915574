//! ratelog CLI - Daily mortgage and treasury rate collector.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use ratelog_lib::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

mod commands;
mod display;
mod logging;

use display::Format;

#[derive(Parser)]
#[command(name = "ratelog")]
#[command(about = "Daily mortgage and treasury rate collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (errors only, no progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// History CSV path
    #[arg(long, global = true, env = "RATELOG_OUTPUT", default_value = ratelog_lib::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Per-source timeout in seconds
    #[arg(long, global = true, default_value = "120")]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect today's rates and merge them into the history file
    Run,

    /// Reconstruct rows for past dates from sources that keep history
    Backfill {
        /// Number of days ending today (ignored when --start is given)
        #[arg(short, long, default_value = "30")]
        days: u32,

        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        end: Option<String>,

        /// Replace rows that already exist
        #[arg(long)]
        overwrite: bool,
    },

    /// Show the most recent rows
    History {
        /// Number of rows
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    logging::init(cli.verbose, cli.quiet)?;

    let config = PipelineConfig::default()
        .with_output(cli.output)
        .with_source_timeout(Duration::from_secs(cli.timeout));

    match command {
        Commands::Run => commands::run::run(&config).await,
        Commands::Backfill {
            days,
            start,
            end,
            overwrite,
        } => {
            commands::backfill::backfill(
                &config,
                days,
                start.as_deref(),
                end.as_deref(),
                overwrite,
                cli.quiet,
            )
            .await
        }
        Commands::History { limit, format } => {
            commands::history::history(&config.output, limit, format)
        }
    }
}
