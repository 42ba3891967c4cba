//! Error types for warehouse communication and deployment

use thiserror::Error;

/// Errors from the warehouse SQL client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The warehouse returned an error status code
    #[error("warehouse error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the warehouse
        message: String,
    },

    /// Failed to parse the warehouse response
    #[error("failed to parse response: {0}")]
    ParseError(String),

    /// Internal error
    #[error("internal error: {0}")]
    InternalError(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }
}

/// Errors raised while registering or enabling a chain
///
/// Definition errors are raised before any remote call. Registration and
/// activation errors may leave a partial chain behind; registration is
/// replace-style idempotent, so re-running the whole deployment after fixing
/// the cause is the recovery path. No rollback or retry happens here.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Validation failed while building the chain
    #[error(transparent)]
    Definition(#[from] strata_core::Error),

    /// The registration call for a stage failed
    #[error("failed to register stage '{stage}': {source}")]
    StageRegistration {
        /// Stage whose CREATE TASK statement failed
        stage: String,
        source: ClientError,
    },

    /// The enable call for a registered stage failed
    #[error("failed to enable stage '{stage}': {source}")]
    Activation {
        /// Stage whose RESUME statement failed
        stage: String,
        source: ClientError,
    },
}
