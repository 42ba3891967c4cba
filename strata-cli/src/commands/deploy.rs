//! Deploy command handler
//!
//! Builds the chain for a domain configuration and activates it against the
//! configured warehouse account.

use anyhow::{Context, Result, bail};
use colored::*;
use strata_warehouse::{SnowflakeClient, deploy};

use crate::config::Config;

pub async fn handle_deploy(path: &str, config: &Config) -> Result<()> {
    let domain_config = super::load_domain_config(path)?;

    let Some(account_url) = &config.account_url else {
        bail!("No warehouse account URL set (use --account-url or STRATA_ACCOUNT_URL)");
    };
    let Some(token) = &config.token else {
        bail!("No warehouse token set (use --token or STRATA_TOKEN)");
    };

    let client = SnowflakeClient::new(account_url, token);
    let summary = deploy::define_and_activate(&client, &domain_config)
        .await
        .with_context(|| format!("Deployment failed for domain '{}'", domain_config.domain))?;

    println!("{} {}", "✓".green().bold(), summary.message);
    for task in &summary.task_names {
        println!("  {} {}", "task".dimmed(), task);
    }

    Ok(())
}
