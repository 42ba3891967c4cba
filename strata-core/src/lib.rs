//! Strata Core
//!
//! Core types and logic for the Strata pipeline deployer.
//!
//! This crate contains:
//! - Domain types: FeatureDomain, Stage, Chain, ExecutionHandle
//! - The structured merge specification and its SQL renderer
//! - The schema registry and chain assembly rules
//!
//! Everything here is pure: no I/O, no warehouse calls. Submitting the
//! rendered statements to a warehouse lives in `strata-warehouse`.

pub mod chain;
pub mod context;
pub mod definition;
pub mod error;
pub mod expr;
pub mod handle;
pub mod merge;
pub mod render;
pub mod schema;
pub mod stage;

pub use chain::Chain;
pub use context::WarehouseContext;
pub use definition::DomainConfig;
pub use error::Error;
pub use handle::ExecutionHandle;
