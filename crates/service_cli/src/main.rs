//! mcpricer - Command Line Driver for the Path-Dependent Monte Carlo Pricer
//!
//! # Commands
//!
//! - `mcpricer price` - Price the configured contract and check the golden value
//! - `mcpricer device` - Describe the compute device
//!
//! # Configuration
//!
//! Settings come from `mcpricer.toml` (or `--config`), then `MCPRICER_*`
//! environment variables, then command-line flags.

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod report;

pub use error::{CliError, Result};

use crate::commands::price::PriceOverrides;
use crate::config::PricerSettings;

/// Path-dependent Monte Carlo option pricer
#[derive(Parser)]
#[command(name = "mcpricer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "mcpricer.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price plain vanilla, Asian, lookback and barrier payoffs
    Price {
        /// Number of Monte Carlo paths
        #[arg(short, long)]
        num_paths: Option<usize>,

        /// Seed of the lane streams
        #[arg(short, long)]
        seed: Option<u64>,

        /// Lanes per group (power of two)
        #[arg(short, long)]
        group_size: Option<usize>,

        /// Precision (single, double, both)
        #[arg(short, long)]
        precision: Option<String>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Describe the compute device
    Device {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let settings = PricerSettings::load(&cli.config)?;
    debug!(config = %cli.config, ?settings, "Loaded settings");

    match cli.command {
        Commands::Price {
            num_paths,
            seed,
            group_size,
            precision,
            format,
        } => {
            let overrides = PriceOverrides {
                num_paths,
                seed,
                group_size,
                precision,
            };
            commands::price::run(settings, &overrides, &format)
        }
        Commands::Device { format } => commands::device::run(&settings, &format),
    }
}
