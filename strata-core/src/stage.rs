//! Stage transform builders
//!
//! A `Stage` is a pure declaration of one scheduled transformation step:
//! name, body, and the predecessor it is gated on. Three builders cover the
//! medallion layers: raw ingest (feed refresh), clean upsert (quarantined
//! merge), and feature derive (projection plus derived columns).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::merge::{ColumnMapping, MergeSpec};
use crate::schema::{DerivedGroup, FeatureDomain};

/// Validated recurring-interval expression, e.g. "3 MINUTES"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule(String);

impl Schedule {
    /// Parse and validate a recurring-interval expression
    ///
    /// Accepts `<n> MINUTE` or `<n> MINUTES` with n >= 1, the only interval
    /// form the warehouse task scheduler takes.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidSchedule {
            schedule: input.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = input.split_whitespace();
        let count = parts
            .next()
            .ok_or_else(|| invalid("empty schedule"))?
            .parse::<u64>()
            .map_err(|_| invalid("interval count must be a positive integer"))?;
        let unit = parts.next().ok_or_else(|| invalid("missing interval unit"))?;

        if count == 0 {
            return Err(invalid("interval count must be at least 1"));
        }
        if parts.next().is_some() {
            return Err(invalid("trailing tokens after interval unit"));
        }
        if !unit.eq_ignore_ascii_case("MINUTE") && !unit.eq_ignore_ascii_case("MINUTES") {
            return Err(invalid("interval unit must be MINUTE or MINUTES"));
        }

        Ok(Self(format!("{} {}", count, unit.to_ascii_uppercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What a stage executes on each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageBody {
    /// Refresh an ingestion pipe into the raw table (append semantics)
    RefreshFeed { pipe: String },
    /// Run a declarative upsert
    Merge(MergeSpec),
}

/// One scheduled transformation step, not yet registered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Unique task name within the chain
    pub name: String,
    /// Table (or feed target) this stage writes
    pub target: String,
    /// What the stage executes
    pub body: StageBody,
    /// Recurring schedule; only the root stage of a chain has one
    pub schedule: Option<Schedule>,
    /// Name of the stage this one is gated on; None only for the chain root
    pub predecessor: Option<String>,
}

/// Build the raw-ingest stage for a domain
///
/// On each scheduled tick the task refreshes the domain's ingestion pipe,
/// pulling newly-arrived records into the raw table. No merge key: the feed
/// is the unit of dedup at this layer.
pub fn raw_ingest_stage(domain: &FeatureDomain, schedule: &str, raw_table: &str) -> Result<Stage> {
    let schedule = Schedule::parse(schedule)?;
    Ok(Stage {
        name: format!("LOAD_{}_STAGE_INTO_BRONZE_RAW", domain.name),
        target: raw_table.to_string(),
        body: StageBody::RefreshFeed {
            pipe: domain.source_feed.clone(),
        },
        schedule: Some(schedule),
        predecessor: None,
    })
}

/// Build the clean-upsert stage for a domain
///
/// Merges raw into clean on the domain merge key, considering only raw rows
/// where every required column is non-null. Malformed rows stay in raw for
/// later reconciliation.
pub fn clean_upsert_stage(
    domain: &FeatureDomain,
    raw_table: &str,
    clean_table: &str,
    predecessor: &str,
) -> Stage {
    let spec = MergeSpec {
        source: raw_table.to_string(),
        target: clean_table.to_string(),
        merge_key: domain.merge_key.clone(),
        columns: domain
            .clean_columns
            .iter()
            .map(|c| ColumnMapping::passthrough(c.as_str()))
            .collect(),
        require_non_null: domain.required_columns.clone(),
    };
    Stage {
        name: format!("LOAD_{}_BRONZE_RAW_INTO_SILVER_CLEAN", domain.name),
        target: clean_table.to_string(),
        body: StageBody::Merge(spec),
        schedule: None,
        predecessor: Some(predecessor.to_string()),
    }
}

/// Build one feature-derive stage for a domain
///
/// Merges clean into the group's feature table, projecting the group's base
/// columns unchanged plus its derived expressions. Matched rows are fully
/// recomputed; several groups may share the same predecessor (fan-out).
pub fn feature_derive_stage(
    domain: &FeatureDomain,
    clean_table: &str,
    feature_table: &str,
    group: &DerivedGroup,
    predecessor: &str,
) -> Stage {
    let mut columns: Vec<ColumnMapping> = group
        .columns
        .iter()
        .map(|c| ColumnMapping::passthrough(c.as_str()))
        .collect();
    columns.extend(
        group
            .derived
            .iter()
            .map(|d| ColumnMapping::derived(&d.name, d.expr.clone())),
    );

    let spec = MergeSpec {
        source: clean_table.to_string(),
        target: feature_table.to_string(),
        merge_key: domain.merge_key.clone(),
        columns,
        require_non_null: Vec::new(),
    };

    let name = match &group.suffix {
        Some(suffix) => format!("LOAD_{}_SILVER_CLEAN_INTO_GOLD_{}", domain.name, suffix),
        None => format!("LOAD_{}_SILVER_CLEAN_INTO_GOLD", domain.name),
    };

    Stage {
        name,
        target: feature_table.to_string(),
        body: StageBody::Merge(spec),
        schedule: None,
        predecessor: Some(predecessor.to_string()),
    }
}
