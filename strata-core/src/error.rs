//! Error types for pipeline definition and assembly
//!
//! All variants here are raised synchronously, before any statement is sent
//! to the warehouse. Remote failures have their own types in
//! `strata-warehouse`.

use thiserror::Error;

/// Result type alias for definition-time operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while defining or assembling a pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// The schema registry has no entry for the requested feature domain
    #[error("unknown feature domain: {0}")]
    UnknownDomain(String),

    /// The recurring-interval expression for a raw-ingest stage is malformed
    #[error("invalid schedule '{schedule}': {reason}")]
    InvalidSchedule {
        /// The schedule expression as given
        schedule: String,
        /// Why it was rejected
        reason: String,
    },

    /// A dependency link inside a chain is broken or a stage name collides
    #[error("chain integrity violation at stage '{stage}': {reason}")]
    ChainIntegrity {
        /// Name of the offending stage
        stage: String,
        /// Which link or uniqueness rule was violated
        reason: String,
    },
}

impl Error {
    /// Create a chain integrity error for a named stage
    pub fn chain_integrity(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ChainIntegrity {
            stage: stage.into(),
            reason: reason.into(),
        }
    }
}
