//! Warehouse execution trait
//!
//! Everything the pipeline needs from the warehouse is one synchronous
//! statement at a time. The warehouse guarantees a single MERGE statement
//! applies atomically; concurrency over table contents is entirely its
//! concern.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ClientError;

/// Result of executing one statement
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    /// Statement handle assigned by the warehouse, when it provides one
    pub statement_handle: Option<Uuid>,
    /// Result rows, column values in select order
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// Synchronous statement execution against the warehouse
///
/// Used both for stage registration (DDL) and ad-hoc queries. Implementations
/// must not retry internally: transient unavailability is surfaced to the
/// caller, whose retry policy owns recovery.
#[async_trait]
pub trait WarehouseExecutor: Send + Sync {
    /// Execute a single SQL statement and return its result rows
    async fn execute(&self, statement: &str) -> Result<RowSet, ClientError>;
}
