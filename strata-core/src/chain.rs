//! Dependency chain assembler
//!
//! Wires stages into an ordered chain per feature domain. The predecessor
//! graph must be a tree rooted at the raw-ingest stage; fan-out is allowed
//! only at the clean-to-feature boundary. Assembly validates every link
//! before anything is sent to the warehouse.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::stage::Stage;

/// Topologically ordered stages implementing one domain's pipeline
///
/// Order is raw-ingest, clean, then the feature stages in the sibling order
/// given at assembly. The chain owns its stages by value; stages are never
/// shared across chains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    /// Feature domain this chain belongs to
    pub domain: String,
    stages: Vec<Stage>,
}

impl Chain {
    /// Assemble and validate a chain from its three layers
    ///
    /// Checks that the clean stage is gated on the raw-ingest stage, that
    /// every feature stage is gated on the clean stage, and that stage names
    /// are unique within the chain.
    pub fn assemble(
        domain: impl Into<String>,
        raw_ingest: Stage,
        clean: Stage,
        features: Vec<Stage>,
    ) -> Result<Self> {
        if raw_ingest.predecessor.is_some() {
            return Err(Error::chain_integrity(
                &raw_ingest.name,
                "raw-ingest stage must be the chain root and have no predecessor",
            ));
        }
        if clean.predecessor.as_deref() != Some(raw_ingest.name.as_str()) {
            return Err(Error::chain_integrity(
                &clean.name,
                format!(
                    "clean stage must be gated on '{}', found {:?}",
                    raw_ingest.name, clean.predecessor
                ),
            ));
        }
        for feature in &features {
            if feature.predecessor.as_deref() != Some(clean.name.as_str()) {
                return Err(Error::chain_integrity(
                    &feature.name,
                    format!(
                        "feature stage must be gated on '{}', found {:?}",
                        clean.name, feature.predecessor
                    ),
                ));
            }
        }

        let mut stages = Vec::with_capacity(2 + features.len());
        stages.push(raw_ingest);
        stages.push(clean);
        stages.extend(features);

        let mut seen = HashSet::new();
        for stage in &stages {
            if !seen.insert(stage.name.as_str()) {
                return Err(Error::chain_integrity(
                    &stage.name,
                    "stage name is not unique within the chain",
                ));
            }
        }

        Ok(Self {
            domain: domain.into(),
            stages,
        })
    }

    /// Stages in topological order (producers before consumers)
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Stage names in topological order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }
}
