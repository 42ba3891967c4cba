//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod deploy;
mod render;
mod validate;

use anyhow::{Context, Result};
use clap::Subcommand;
use strata_core::DomainConfig;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Build a domain's chain and activate it in the warehouse
    Deploy {
        /// Path to the domain configuration JSON file
        config: String,
    },
    /// Validate a domain configuration offline
    Validate {
        /// Path to the domain configuration JSON file
        config: String,
    },
    /// Print the SQL a deploy would submit, without executing anything
    Render {
        /// Path to the domain configuration JSON file
        config: String,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Deploy { config: path } => deploy::handle_deploy(&path, config).await,
        Commands::Validate { config: path } => validate::handle_validate(&path),
        Commands::Render { config: path } => render::handle_render(&path),
    }
}

/// Load a domain configuration from a JSON file
pub(crate) fn load_domain_config(path: &str) -> Result<DomainConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse config file: {path}"))
}
