//! REST SQL client for the warehouse
//!
//! Submits statements to a Snowflake-style SQL endpoint
//! (`POST /api/v2/statements`) with bearer-token auth. One statement per
//! request, executed synchronously on the warehouse side.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ClientError;
use crate::executor::{RowSet, WarehouseExecutor};

/// HTTP client for the warehouse SQL API
#[derive(Debug, Clone)]
pub struct SnowflakeClient {
    /// Base URL of the account endpoint
    base_url: String,
    /// Bearer token for the SQL API
    token: String,
    /// HTTP client instance
    client: Client,
}

#[derive(Serialize)]
struct StatementRequest<'a> {
    statement: &'a str,
    /// Seconds the warehouse may spend before aborting the statement
    timeout: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatementResponse {
    statement_handle: Option<Uuid>,
    #[serde(default)]
    data: Vec<Vec<serde_json::Value>>,
}

impl SnowflakeClient {
    /// Create a new client for an account endpoint
    ///
    /// # Arguments
    /// * `base_url` - Account base URL (e.g. "https://acme.snowflakecomputing.com")
    /// * `token` - Bearer token for the SQL API
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client: Client::new(),
        }
    }

    /// Create a client with a custom HTTP client (timeouts, proxies, TLS)
    pub fn with_client(
        base_url: impl Into<String>,
        token: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        }
    }

    /// Get the account base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn submit(&self, statement: &str) -> Result<RowSet, ClientError> {
        let response = self
            .client
            .post(format!("{}/api/v2/statements", self.base_url))
            .bearer_auth(&self.token)
            .json(&StatementRequest {
                statement,
                timeout: 60,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        let body: StatementResponse = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))?;

        Ok(RowSet {
            statement_handle: body.statement_handle,
            rows: body.data,
        })
    }
}

#[async_trait]
impl WarehouseExecutor for SnowflakeClient {
    async fn execute(&self, statement: &str) -> Result<RowSet, ClientError> {
        tracing::debug!("Executing statement: {}", statement.lines().next().unwrap_or(""));
        self.submit(statement).await
    }
}
