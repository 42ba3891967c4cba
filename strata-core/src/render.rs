//! SQL renderer
//!
//! The single place where merge specifications and stage declarations become
//! warehouse SQL. Keeping rendering separate from the declarations means the
//! merge semantics stay testable without ever generating a statement.

use crate::context::WarehouseContext;
use crate::expr::Expr;
use crate::merge::MergeSpec;
use crate::stage::{Stage, StageBody};

/// Render the CREATE OR REPLACE TASK statement registering a stage
///
/// Replace-style registration makes re-running a definition idempotent: the
/// prior task definition is fully replaced, never merged.
pub fn task_ddl(stage: &Stage, ctx: &WarehouseContext) -> String {
    let timing = match (&stage.schedule, &stage.predecessor) {
        (Some(schedule), _) => format!("schedule='{}'", schedule.as_str()),
        (None, Some(predecessor)) => format!("after {}", ctx.qualify(predecessor)),
        // Unreachable for assembled chains; render a minute schedule so the
        // statement is still well-formed.
        (None, None) => "schedule='1 MINUTE'".to_string(),
    };

    let body = match &stage.body {
        StageBody::RefreshFeed { pipe } => format!("ALTER PIPE {pipe} REFRESH"),
        StageBody::Merge(spec) => merge_sql(spec, ctx),
    };

    format!(
        "CREATE OR REPLACE TASK {name}\n    warehouse={warehouse}\n    {timing}\nAS\n{body};",
        name = ctx.qualify(&stage.name),
        warehouse = ctx.warehouse,
    )
}

/// Render the ALTER TASK ... RESUME statement enabling a stage
pub fn resume_statement(stage_name: &str, ctx: &WarehouseContext) -> String {
    format!("ALTER TASK {} RESUME", ctx.qualify(stage_name))
}

/// Render a merge specification to a MERGE statement
pub fn merge_sql(spec: &MergeSpec, ctx: &WarehouseContext) -> String {
    let projection = spec
        .columns
        .iter()
        .map(|m| match &m.expr {
            Expr::Column(source) if *source == m.target => source.clone(),
            expr => format!("{} AS {}", expr.to_sql(), m.target),
        })
        .collect::<Vec<_>>()
        .join(",\n        ");

    let filter = if spec.require_non_null.is_empty() {
        String::new()
    } else {
        let predicates = spec
            .require_non_null
            .iter()
            .map(|c| format!("{c} IS NOT NULL"))
            .collect::<Vec<_>>()
            .join(" AND ");
        format!("\n    WHERE {predicates}")
    };

    let on = spec
        .merge_key
        .iter()
        .map(|k| format!("TARGET.{k} = SOURCE.{k}"))
        .collect::<Vec<_>>()
        .join(" AND ");

    let updates = spec
        .columns
        .iter()
        .map(|m| format!("TARGET.{0} = SOURCE.{0}", m.target))
        .collect::<Vec<_>>()
        .join(",\n    ");

    let insert_columns = spec
        .columns
        .iter()
        .map(|m| m.target.clone())
        .collect::<Vec<_>>()
        .join(", ");

    let insert_values = spec
        .columns
        .iter()
        .map(|m| format!("SOURCE.{}", m.target))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "MERGE INTO {target} AS TARGET\n\
         USING (\n    SELECT\n        {projection}\n    FROM {source}{filter}\n) AS SOURCE\n\
         ON {on}\n\
         WHEN MATCHED THEN UPDATE SET\n    {updates}\n\
         WHEN NOT MATCHED THEN\n    INSERT ({insert_columns})\n    VALUES ({insert_values})",
        target = ctx.qualify(&spec.target),
        source = ctx.qualify(&spec.source),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::ColumnMapping;
    use crate::stage::{clean_upsert_stage, raw_ingest_stage};

    fn ctx() -> WarehouseContext {
        WarehouseContext::new("FEATURESTORE_DB", "FEATURESTORE_SCHEMA", "FEATURESTORE_WH")
    }

    fn sales_domain() -> crate::schema::FeatureDomain {
        crate::schema::FeatureDomain {
            name: "FD_SALES".into(),
            source_feed: "FD_SALES_DATA_PIPE".into(),
            merge_key: vec!["transaction_id".into()],
            required_columns: vec!["transaction_id".into(), "total_amount".into()],
            clean_columns: vec!["transaction_id".into(), "total_amount".into()],
            derived_groups: vec![],
        }
    }

    #[test]
    fn test_raw_ingest_ddl_refreshes_pipe_on_schedule() {
        let stage = raw_ingest_stage(&sales_domain(), "3 MINUTES", "BRONZE_FD_SALES_RAW").unwrap();
        let ddl = task_ddl(&stage, &ctx());

        assert!(ddl.starts_with(
            "CREATE OR REPLACE TASK FEATURESTORE_DB.FEATURESTORE_SCHEMA.LOAD_FD_SALES_STAGE_INTO_BRONZE_RAW"
        ));
        assert!(ddl.contains("schedule='3 MINUTES'"));
        assert!(ddl.contains("ALTER PIPE FD_SALES_DATA_PIPE REFRESH"));
        assert!(!ddl.contains("after "));
    }

    #[test]
    fn test_clean_ddl_gates_on_predecessor_and_filters_nulls() {
        let domain = sales_domain();
        let stage = clean_upsert_stage(
            &domain,
            "BRONZE_FD_SALES_RAW",
            "SILVER_FD_SALES_CLEAN",
            "LOAD_FD_SALES_STAGE_INTO_BRONZE_RAW",
        );
        let ddl = task_ddl(&stage, &ctx());

        assert!(ddl.contains(
            "after FEATURESTORE_DB.FEATURESTORE_SCHEMA.LOAD_FD_SALES_STAGE_INTO_BRONZE_RAW"
        ));
        assert!(ddl.contains("WHERE transaction_id IS NOT NULL AND total_amount IS NOT NULL"));
        assert!(ddl.contains("ON TARGET.transaction_id = SOURCE.transaction_id"));
        assert!(ddl.contains("TARGET.total_amount = SOURCE.total_amount"));
    }

    #[test]
    fn test_derived_column_rendered_with_alias() {
        let spec = MergeSpec {
            source: "SILVER_FD_WINE_CLEAN".into(),
            target: "GOLD_FD_WINE_ACIDITY".into(),
            merge_key: vec!["ID".into()],
            columns: vec![
                ColumnMapping::passthrough("ID"),
                ColumnMapping::derived(
                    "SUM_ACIDITY",
                    Expr::Add(
                        Box::new(Expr::col("FIXED_ACIDITY")),
                        Box::new(Expr::col("VOLATILE_ACIDITY")),
                    ),
                ),
            ],
            require_non_null: vec![],
        };
        let sql = merge_sql(&spec, &ctx());

        assert!(sql.contains("(FIXED_ACIDITY + VOLATILE_ACIDITY) AS SUM_ACIDITY"));
        // Derived values are recomputed in the subquery only; the update and
        // insert branches read the alias
        assert!(sql.contains("TARGET.SUM_ACIDITY = SOURCE.SUM_ACIDITY"));
        assert!(sql.contains("INSERT (ID, SUM_ACIDITY)"));
        assert!(sql.contains("VALUES (SOURCE.ID, SOURCE.SUM_ACIDITY)"));
    }

    #[test]
    fn test_resume_statement() {
        assert_eq!(
            resume_statement("LOAD_FD_SALES_STAGE_INTO_BRONZE_RAW", &ctx()),
            "ALTER TASK FEATURESTORE_DB.FEATURESTORE_SCHEMA.LOAD_FD_SALES_STAGE_INTO_BRONZE_RAW RESUME"
        );
    }

    #[test]
    fn test_identical_definitions_render_identically() {
        let domain = sales_domain();
        let a = clean_upsert_stage(&domain, "B", "S", "RAW");
        let b = clean_upsert_stage(&domain, "B", "S", "RAW");
        assert_eq!(task_ddl(&a, &ctx()), task_ddl(&b, &ctx()));
    }
}
