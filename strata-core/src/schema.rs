//! Record schema registry
//!
//! Per feature-domain definition of merge key, required columns, and
//! derived-column formulas. Centralizing these keeps validation and
//! derivation rules in one place, testable independently of SQL generation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::expr::Expr;

/// A named derived-column formula over clean-layer columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedColumn {
    /// Target column name in the feature table
    pub name: String,
    /// Expression computing it
    pub expr: Expr,
}

/// One gold-layer projection of a feature domain
///
/// A domain may fan out into several groups (e.g. wine acidity and wine
/// dioxide), each with its own feature table. A group with no derived
/// columns is a plain pass-through projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedGroup {
    /// Suffix appended to the generated task name (e.g. "ACID"); none for
    /// domains with a single feature table
    pub suffix: Option<String>,
    /// Clean-layer columns projected unchanged
    pub columns: Vec<String>,
    /// Derived columns computed from the clean layer
    #[serde(default)]
    pub derived: Vec<DerivedColumn>,
}

/// Immutable definition of one business dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDomain {
    /// Domain name, e.g. "FD_SALES"
    pub name: String,
    /// Ingestion pipe feeding the raw table
    pub source_feed: String,
    /// Column(s) used to match rows during upsert
    pub merge_key: Vec<String>,
    /// Columns that must be non-null for promotion to the clean layer
    pub required_columns: Vec<String>,
    /// Full column set of the clean table
    pub clean_columns: Vec<String>,
    /// Gold-layer projections
    pub derived_groups: Vec<DerivedGroup>,
}

/// Pure lookup of feature-domain definitions by name
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    domains: HashMap<String, FeatureDomain>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a domain, replacing any previous definition under that name
    pub fn register(&mut self, domain: FeatureDomain) {
        self.domains.insert(domain.name.clone(), domain);
    }

    /// Look up a domain definition
    pub fn get(&self, name: &str) -> Result<&FeatureDomain> {
        self.domains
            .get(name)
            .ok_or_else(|| Error::UnknownDomain(name.to_string()))
    }

    /// Names of all registered domains
    pub fn domain_names(&self) -> Vec<&str> {
        self.domains.keys().map(String::as_str).collect()
    }
}
