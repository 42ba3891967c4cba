//! Strata CLI
//!
//! Command-line interface for deploying medallion pipelines to a warehouse.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Strata medallion pipeline deployer", long_about = None)]
struct Cli {
    /// Warehouse account URL
    #[arg(long, env = "STRATA_ACCOUNT_URL")]
    account_url: Option<String>,

    /// Bearer token for the warehouse SQL API
    #[arg(long, env = "STRATA_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "strata_warehouse=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        account_url: cli.account_url,
        token: cli.token,
    };

    handle_command(cli.command, &config).await
}
