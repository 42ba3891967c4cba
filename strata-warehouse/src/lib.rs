//! Strata Warehouse
//!
//! The boundary to the external warehouse execution service.
//!
//! This crate provides:
//! - `WarehouseExecutor`: the one-statement-at-a-time execution trait the
//!   pipeline core is deployed through
//! - `SnowflakeClient`: a REST SQL client implementing the trait
//! - The deployment service: registering a chain's stages in topological
//!   order and enabling them in reverse
//!
//! # Example
//!
//! ```no_run
//! use strata_warehouse::{SnowflakeClient, deploy};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), strata_warehouse::DeployError> {
//!     let raw = std::fs::read_to_string("demos/sales.json").unwrap();
//!     let config: strata_core::DomainConfig = serde_json::from_str(&raw).unwrap();
//!     let client = SnowflakeClient::new("https://account.snowflakecomputing.com", "token");
//!
//!     let summary = deploy::define_and_activate(&client, &config).await?;
//!     println!("{}", summary.message);
//!     Ok(())
//! }
//! ```

pub mod deploy;
pub mod error;
pub mod executor;
mod snowflake;

pub use deploy::PipelineSummary;
pub use error::{ClientError, DeployError};
pub use executor::{RowSet, WarehouseExecutor};
pub use snowflake::SnowflakeClient;
