//! trial-stats command-line driver
//!
//! Exit codes:
//!   0 - Success
//!   1 - Invalid settings, unreadable or malformed input, or a failed write

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use trial_stats::cli::{run_aggregate, Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    debug!("trial-stats v{}", trial_stats::VERSION);

    match cli.command {
        Command::Aggregate(args) => {
            let report = run_aggregate(&args)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
    }
    Ok(())
}

/// Log to stderr; RUST_LOG overrides the verbosity flag
fn init_logging(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow!(e))
}
