//! Configuration module
//!
//! Handles CLI configuration including the warehouse account endpoint.

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Warehouse account URL; required for deployment, not for offline
    /// validation or rendering
    pub account_url: Option<String>,
    /// Bearer token for the warehouse SQL API
    pub token: Option<String>,
}
