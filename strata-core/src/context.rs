//! Warehouse execution context
//!
//! The original deployment scripts kept database/schema/warehouse names as
//! ambient session state. Here the context is an explicit value passed into
//! every operation that renders or submits a statement.

use serde::{Deserialize, Serialize};

/// Identifiers that qualify every object a pipeline touches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseContext {
    /// Database holding the feature store objects
    pub database: String,
    /// Schema within the database
    pub schema: String,
    /// Virtual warehouse that scheduled tasks run on
    pub warehouse: String,
}

impl WarehouseContext {
    pub fn new(
        database: impl Into<String>,
        schema: impl Into<String>,
        warehouse: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
            warehouse: warehouse.into(),
        }
    }

    /// Fully qualify an object name as `database.schema.object`
    pub fn qualify(&self, object: &str) -> String {
        format!("{}.{}.{}", self.database, self.schema, object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify() {
        let ctx = WarehouseContext::new("FEATURESTORE_DB", "FEATURESTORE_SCHEMA", "FEATURESTORE_WH");
        assert_eq!(
            ctx.qualify("SILVER_FD_SALES_CLEAN"),
            "FEATURESTORE_DB.FEATURESTORE_SCHEMA.SILVER_FD_SALES_CLEAN"
        );
    }
}
