//! Execution handles
//!
//! A handle records that a stage definition was submitted to the warehouse
//! scheduler. The scheduler owns the task lifecycle; the pipeline tracks
//! nothing beyond "submitted" and the identifiers needed to talk about it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled, recurring instantiation of a stage inside the warehouse
///
/// Re-registering the same stage replaces the prior definition wholesale,
/// so a handle is only valid until the next registration of that stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionHandle {
    /// Name of the registered stage (also the warehouse task name)
    pub stage_name: String,
    /// The DDL statement that was submitted
    pub statement: String,
    /// Statement handle returned by the warehouse, when it provides one
    pub statement_handle: Option<Uuid>,
    /// When the registration was submitted
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}
