//! divgrowth CLI binary.
//!
//! Screens dividend-paying securities from a JSON snapshot of dividends,
//! splits and prices.

mod cmd;
mod data;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::data::SnapshotSource;

#[derive(Parser)]
#[command(name = "divgrowth")]
#[command(about = "Dividend growth screening from split-adjusted payout histories", long_about = None)]
#[command(version)]
struct Cli {
    /// Snapshot file (JSON) with dividends, splits and prices
    #[arg(short, long, global = true, env = "DIVGROWTH_DATA")]
    data: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter securities by dividend yield, growth and consistency
    Filter(cmd::filter::FilterArgs),

    /// Show split-adjusted dividend statistics for one security
    Stats {
        /// Ticker symbol
        symbol: String,

        /// Current calendar year; it and later years are excluded (defaults to this year)
        #[arg(long)]
        as_of_year: Option<i32>,
    },
}

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let path = cli
        .data
        .context("No snapshot given: pass --data or set DIVGROWTH_DATA")?;
    let source = SnapshotSource::load(&path)
        .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
    let current_year = Utc::now().year();

    match cli.command {
        Commands::Filter(args) => {
            cmd::filter::run_filter(&source, &args, current_year)?;
        }
        Commands::Stats { symbol, as_of_year } => {
            cmd::stats::show_stats(&source, &symbol, as_of_year.unwrap_or(current_year))?;
        }
    }

    Ok(())
}
