//! Render command handler
//!
//! Prints every statement a deploy would submit, in submission order:
//! registration DDL first (topological), then RESUME statements (reverse
//! topological). Useful for reviewing generated SQL before deploying.

use anyhow::{Context, Result};
use colored::*;
use strata_core::{definition, render};

pub fn handle_render(path: &str) -> Result<()> {
    let domain_config = super::load_domain_config(path)?;

    let chain = definition::build_chain(&domain_config)
        .with_context(|| format!("Invalid configuration for domain '{}'", domain_config.domain))?;
    let ctx = domain_config.context();

    for stage in chain.stages() {
        println!("{}", format!("-- register {}", stage.name).yellow());
        println!("{}\n", render::task_ddl(stage, &ctx));
    }
    for stage in chain.stages().iter().rev() {
        println!("{}", format!("-- enable {}", stage.name).yellow());
        println!("{};\n", render::resume_statement(&stage.name, &ctx));
    }

    Ok(())
}
