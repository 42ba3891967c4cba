//! Domain configuration and chain building
//!
//! `DomainConfig` is the static, serializable description of one feature
//! domain's pipeline: context identifiers, schedule, table names, schema,
//! and derived-column definitions. `build_chain` turns it into a validated
//! `Chain` without touching the warehouse.

use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::context::WarehouseContext;
use crate::error::Result;
use crate::schema::{DerivedColumn, DerivedGroup, FeatureDomain, SchemaRegistry};
use crate::stage::{clean_upsert_stage, feature_derive_stage, raw_ingest_stage};

/// One gold-layer feature table and its projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTableConfig {
    /// Target feature table name
    pub table: String,
    /// Suffix for the generated task name (e.g. "ACID"); omit when the
    /// domain has a single feature table
    #[serde(default)]
    pub suffix: Option<String>,
    /// Clean-layer columns projected unchanged
    pub columns: Vec<String>,
    /// Derived columns computed from the clean layer
    #[serde(default)]
    pub derived: Vec<DerivedColumn>,
}

/// Static configuration of one feature domain's pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Warehouse context identifiers
    pub database: String,
    pub schema: String,
    pub warehouse: String,

    /// Feature domain name, e.g. "FD_SALES"
    pub domain: String,
    /// Ingestion pipe feeding the raw table
    pub source_feed: String,
    /// Recurring schedule for the raw-ingest stage, e.g. "3 MINUTES"
    pub schedule: String,

    /// Merge key column(s)
    pub merge_key: Vec<String>,
    /// Columns required non-null for promotion to the clean layer
    pub required_columns: Vec<String>,
    /// Full column set of the clean table
    pub clean_columns: Vec<String>,

    /// Bronze and silver table names
    pub raw_table: String,
    pub clean_table: String,
    /// Gold projections; more than one entry fans the chain out
    pub feature_tables: Vec<FeatureTableConfig>,
}

impl DomainConfig {
    /// The warehouse context this pipeline deploys into
    pub fn context(&self) -> WarehouseContext {
        WarehouseContext::new(&self.database, &self.schema, &self.warehouse)
    }

    /// The immutable domain definition carried by this configuration
    pub fn to_domain(&self) -> FeatureDomain {
        FeatureDomain {
            name: self.domain.clone(),
            source_feed: self.source_feed.clone(),
            merge_key: self.merge_key.clone(),
            required_columns: self.required_columns.clone(),
            clean_columns: self.clean_columns.clone(),
            derived_groups: self
                .feature_tables
                .iter()
                .map(|f| DerivedGroup {
                    suffix: f.suffix.clone(),
                    columns: f.columns.clone(),
                    derived: f.derived.clone(),
                })
                .collect(),
        }
    }
}

/// Build the validated chain for a domain configuration
///
/// Registers the domain schema, builds the three stage layers, and assembles
/// them. Purely definitional: any error here is raised before a single
/// statement exists to submit.
pub fn build_chain(config: &DomainConfig) -> Result<Chain> {
    let mut registry = SchemaRegistry::new();
    registry.register(config.to_domain());
    let domain = registry.get(&config.domain)?;

    let raw = raw_ingest_stage(domain, &config.schedule, &config.raw_table)?;
    let clean = clean_upsert_stage(domain, &config.raw_table, &config.clean_table, &raw.name);

    let features = config
        .feature_tables
        .iter()
        .zip(&domain.derived_groups)
        .map(|(table, group)| {
            feature_derive_stage(domain, &config.clean_table, &table.table, group, &clean.name)
        })
        .collect();

    Chain::assemble(&config.domain, raw, clean, features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::expr::Expr;

    fn wine_config() -> DomainConfig {
        DomainConfig {
            database: "FEATURESTORE_DB".into(),
            schema: "FEATURESTORE_SCHEMA".into(),
            warehouse: "FEATURESTORE_WH".into(),
            domain: "FD_WINE".into(),
            source_feed: "FD_WINE_DATA_PIPE".into(),
            schedule: "3 MINUTES".into(),
            merge_key: vec!["ID".into()],
            required_columns: vec!["FIXED_ACIDITY".into(), "VOLATILE_ACIDITY".into()],
            clean_columns: vec![
                "ID".into(),
                "FIXED_ACIDITY".into(),
                "VOLATILE_ACIDITY".into(),
                "FREE_SULFER_DIOXIDE".into(),
                "TOTAL_SULFER_DIOXIDE".into(),
            ],
            raw_table: "BRONZE_FD_WINE_RAW".into(),
            clean_table: "SILVER_FD_WINE_CLEAN".into(),
            feature_tables: vec![
                FeatureTableConfig {
                    table: "GOLD_FD_WINE_ACIDITY".into(),
                    suffix: Some("ACID".into()),
                    columns: vec!["ID".into(), "FIXED_ACIDITY".into(), "VOLATILE_ACIDITY".into()],
                    derived: vec![DerivedColumn {
                        name: "SUM_ACIDITY".into(),
                        expr: Expr::Add(
                            Box::new(Expr::col("FIXED_ACIDITY")),
                            Box::new(Expr::col("VOLATILE_ACIDITY")),
                        ),
                    }],
                },
                FeatureTableConfig {
                    table: "GOLD_FD_WINE_DIOXIDE".into(),
                    suffix: Some("DIOXIDE".into()),
                    columns: vec![
                        "ID".into(),
                        "FREE_SULFER_DIOXIDE".into(),
                        "TOTAL_SULFER_DIOXIDE".into(),
                    ],
                    derived: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_build_chain_fans_out_over_feature_tables() {
        let chain = build_chain(&wine_config()).unwrap();
        assert_eq!(
            chain.stage_names(),
            vec![
                "LOAD_FD_WINE_STAGE_INTO_BRONZE_RAW",
                "LOAD_FD_WINE_BRONZE_RAW_INTO_SILVER_CLEAN",
                "LOAD_FD_WINE_SILVER_CLEAN_INTO_GOLD_ACID",
                "LOAD_FD_WINE_SILVER_CLEAN_INTO_GOLD_DIOXIDE",
            ]
        );
    }

    #[test]
    fn test_invalid_schedule_fails_before_assembly() {
        let mut config = wine_config();
        config.schedule = "whenever".into();
        assert!(matches!(
            build_chain(&config),
            Err(Error::InvalidSchedule { .. })
        ));
    }

    #[test]
    fn test_fan_out_projections_are_independent() {
        use crate::expr::{Row, ScalarValue};
        use crate::stage::StageBody;

        let chain = build_chain(&wine_config()).unwrap();
        let mut clean_row = Row::new();
        clean_row.insert("ID".into(), ScalarValue::Number(1.0));
        clean_row.insert("FIXED_ACIDITY".into(), ScalarValue::Number(7.0));
        clean_row.insert("VOLATILE_ACIDITY".into(), ScalarValue::Number(3.0));
        clean_row.insert("FREE_SULFER_DIOXIDE".into(), ScalarValue::Number(11.0));
        clean_row.insert("TOTAL_SULFER_DIOXIDE".into(), ScalarValue::Number(34.0));

        // Run only the acidity stage; the dioxide stage has not run at all
        let StageBody::Merge(acid) = &chain.stages()[2].body else {
            panic!("feature stage must be a merge");
        };
        let mut acid_table = Vec::new();
        acid.apply(&mut acid_table, std::slice::from_ref(&clean_row));
        assert_eq!(
            acid_table[0].get("SUM_ACIDITY"),
            Some(&ScalarValue::Number(10.0))
        );
        assert!(!acid_table[0].contains_key("FREE_SULFER_DIOXIDE"));

        // The dioxide stage produces its projection without the other
        let StageBody::Merge(dioxide) = &chain.stages()[3].body else {
            panic!("feature stage must be a merge");
        };
        let mut dioxide_table = Vec::new();
        dioxide.apply(&mut dioxide_table, std::slice::from_ref(&clean_row));
        assert_eq!(
            dioxide_table[0].get("TOTAL_SULFER_DIOXIDE"),
            Some(&ScalarValue::Number(34.0))
        );
        assert!(!dioxide_table[0].contains_key("FIXED_ACIDITY"));
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = wine_config();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: DomainConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
