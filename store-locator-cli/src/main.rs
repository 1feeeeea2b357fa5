//! Store Locator CLI Application
//!
//! This is the command-line front end for the store-locator library.
//! It adds:
//! - TOML configuration loading
//! - Logging setup
//! - Live position tracking printed to the terminal
//! - Zone, mapping and catalog queries

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

/// Store Locator - indoor position overlay for the store floor-plan
#[derive(Parser, Debug)]
#[command(name = "store-locator")]
#[command(about = "Track shopper positions and locate zones and products on the store map", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the position endpoint and print the marker position
    Track {
        /// Position endpoint (overrides the config file)
        #[arg(long, value_name = "URL")]
        url: Option<String>,

        /// Stop after this many updates (at least 1)
        #[arg(long, value_name = "COUNT", value_parser = clap::value_parser!(u64).range(1..))]
        limit: Option<u64>,
    },

    /// Map a sensor-space position onto the floor-plan
    Map {
        /// Sensor-space x in meters
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        /// Sensor-space y in meters
        #[arg(long, allow_negative_numbers = true)]
        y: f64,

        /// Sensor field width in meters (overrides the config file)
        #[arg(long)]
        width: Option<f64>,

        /// Sensor field height in meters (overrides the config file)
        #[arg(long)]
        height: Option<f64>,
    },

    /// Show where a zone is on the floor-plan
    Zone {
        /// Zone id, e.g. "A1"
        id: String,
    },

    /// List all known zones
    Zones,

    /// Search the product catalog
    Search {
        /// Product name or section
        query: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Store Locator CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using locator library v{}", store_locator::VERSION);

    let app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => {
            log::debug!("No configuration file given, using defaults");
            config::AppConfig::default()
        }
    };

    let output = commands::Output { json: args.json };

    match args.command {
        Command::Track { url, limit } => commands::track(&app_config, url, limit, output).await,
        Command::Map {
            x,
            y,
            width,
            height,
        } => commands::map(&app_config, x, y, width, height, output),
        Command::Zone { id } => commands::zone(&app_config, &id, output),
        Command::Zones => commands::zones(&app_config, output),
        Command::Search { query } => commands::search(&app_config, &query, output),
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
