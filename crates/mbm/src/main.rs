//! MBM session cache operator CLI.
//!
//! Inspects the effective cache configuration and exercises a cache instance
//! under concurrent load.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{config, soak};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// MBM session token cache tools
#[derive(Parser)]
#[command(name = "mbm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file applied on top of the discovered layers
    #[arg(long, global = true, env = "MBM_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configuration management
    Config(config::ConfigArgs),

    /// Run concurrent request workers against a session cache
    Soak(soak::SoakArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "mbm=debug,mbm_session=debug,mbm_config=debug,info"
    } else {
        "mbm=info,mbm_session=info,warn"
    };

    use tracing_subscriber::prelude::*;
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(env_filter),
        )
        .init();

    let ctx = commands::Context {
        config_path: cli.config,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Config(args) => config::run(args, &ctx).await,
        Commands::Soak(args) => soak::run(args, &ctx).await,
    }
}
