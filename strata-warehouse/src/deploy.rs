//! Deployment service
//!
//! Registers a chain's stages with the warehouse task scheduler and enables
//! them. Registration runs in topological order so no task ever references a
//! not-yet-registered predecessor; enabling runs in reverse topological order
//! so every consumer is live before its producer starts firing.

use serde::{Deserialize, Serialize};

use strata_core::chain::Chain;
use strata_core::context::WarehouseContext;
use strata_core::definition::{self, DomainConfig};
use strata_core::handle::ExecutionHandle;
use strata_core::render;

use crate::error::DeployError;
use crate::executor::WarehouseExecutor;

/// Outcome of a successful deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Feature domain the chain belongs to
    pub domain: String,
    /// Task names in registration (topological) order
    pub task_names: Vec<String>,
    /// Human-readable outcome line
    pub message: String,
}

impl std::fmt::Display for PipelineSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Register every stage of a chain with the warehouse scheduler
///
/// Stages are submitted in the chain's topological order as CREATE OR
/// REPLACE TASK statements; an existing definition under the same name is
/// fully replaced. On failure the already-registered prefix is left in
/// place (suspended, never enabled here), and the error names the stage
/// that failed.
pub async fn register_chain(
    executor: &dyn WarehouseExecutor,
    ctx: &WarehouseContext,
    chain: &Chain,
) -> Result<Vec<ExecutionHandle>, DeployError> {
    let mut handles = Vec::with_capacity(chain.stages().len());

    for stage in chain.stages() {
        let statement = render::task_ddl(stage, ctx);
        let rowset = executor
            .execute(&statement)
            .await
            .map_err(|source| DeployError::StageRegistration {
                stage: stage.name.clone(),
                source,
            })?;

        tracing::info!("Registered stage: {}", stage.name);

        handles.push(ExecutionHandle {
            stage_name: stage.name.clone(),
            statement,
            statement_handle: rowset.statement_handle,
            submitted_at: chrono::Utc::now(),
        });
    }

    Ok(handles)
}

/// Enable every stage of a registered chain
///
/// RESUME statements are issued in reverse topological order: a downstream
/// consumer enabled early simply has nothing to consume on its first tick,
/// whereas a producer enabled without live consumers could fire a
/// downstream-less completion in schedulers that auto-trigger eagerly.
pub async fn resume_chain(
    executor: &dyn WarehouseExecutor,
    ctx: &WarehouseContext,
    chain: &Chain,
) -> Result<(), DeployError> {
    for stage in chain.stages().iter().rev() {
        let statement = render::resume_statement(&stage.name, ctx);
        executor
            .execute(&statement)
            .await
            .map_err(|source| DeployError::Activation {
                stage: stage.name.clone(),
                source,
            })?;

        tracing::info!("Enabled stage: {}", stage.name);
    }

    Ok(())
}

/// Register and enable a chain
pub async fn activate(
    executor: &dyn WarehouseExecutor,
    ctx: &WarehouseContext,
    chain: &Chain,
) -> Result<Vec<ExecutionHandle>, DeployError> {
    let handles = register_chain(executor, ctx, chain).await?;
    resume_chain(executor, ctx, chain).await?;
    Ok(handles)
}

/// Build the chain for a domain configuration, activate it, and summarize
///
/// Validation errors (unknown domain, bad schedule, broken chain links) are
/// raised here before any statement reaches the warehouse.
pub async fn define_and_activate(
    executor: &dyn WarehouseExecutor,
    config: &DomainConfig,
) -> Result<PipelineSummary, DeployError> {
    let chain = definition::build_chain(config)?;
    let ctx = config.context();

    let handles = activate(executor, &ctx, &chain).await?;

    let task_names: Vec<String> = handles.into_iter().map(|h| h.stage_name).collect();
    let message = format!(
        "Successfully created and started {} tasks for {}",
        task_names.len(),
        chain.domain
    );

    tracing::info!("{}", message);

    Ok(PipelineSummary {
        domain: chain.domain,
        task_names,
        message,
    })
}
