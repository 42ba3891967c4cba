//! Validate command handler
//!
//! Runs the full definition-time validation (schema lookup, schedule parse,
//! chain assembly) without contacting the warehouse.

use anyhow::{Context, Result};
use colored::*;
use strata_core::definition;

pub fn handle_validate(path: &str) -> Result<()> {
    let domain_config = super::load_domain_config(path)?;

    let chain = definition::build_chain(&domain_config)
        .with_context(|| format!("Invalid configuration for domain '{}'", domain_config.domain))?;

    println!(
        "{} Chain for {} is valid ({} stages)",
        "✓".green().bold(),
        chain.domain.bold(),
        chain.stages().len()
    );
    for stage in chain.stages() {
        match &stage.predecessor {
            Some(predecessor) => {
                println!("  {} {} {}", stage.name, "after".dimmed(), predecessor)
            }
            None => println!(
                "  {} {}",
                stage.name,
                format!(
                    "every {}",
                    stage.schedule.as_ref().map(|s| s.as_str()).unwrap_or("?")
                )
                .dimmed()
            ),
        }
    }

    Ok(())
}
