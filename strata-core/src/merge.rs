//! Structured merge specification
//!
//! A `MergeSpec` captures upsert semantics as data: source, target, merge
//! key, column map, and an optional non-null quarantine filter. One renderer
//! turns it into warehouse MERGE SQL; `apply` runs the same semantics over
//! in-memory rows so the convergence and quarantine properties can be tested
//! without a warehouse.

use serde::{Deserialize, Serialize};

use crate::expr::{Expr, Row};

/// One target column and the expression that produces it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Target column name (also the projection alias in the USING subquery)
    pub target: String,
    /// Expression over source columns
    pub expr: Expr,
}

impl ColumnMapping {
    /// Map a source column straight through under the same name
    pub fn passthrough(column: impl Into<String>) -> Self {
        let column = column.into();
        Self {
            expr: Expr::Column(column.clone()),
            target: column,
        }
    }

    /// Map a derived expression to a new target column
    pub fn derived(target: impl Into<String>, expr: Expr) -> Self {
        Self {
            target: target.into(),
            expr,
        }
    }
}

/// Declarative upsert from one table into another
///
/// Matched rows have every mapped column overwritten by the source value
/// (last-write-wins); unmatched rows are inserted in full. Rows failing the
/// quarantine filter are excluded from the source and never promoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeSpec {
    /// Source table (unqualified)
    pub source: String,
    /// Target table (unqualified)
    pub target: String,
    /// Column(s) used to match source rows to target rows
    pub merge_key: Vec<String>,
    /// Target columns and the expressions computing them
    pub columns: Vec<ColumnMapping>,
    /// Source columns that must be non-null for a row to be considered
    pub require_non_null: Vec<String>,
}

impl MergeSpec {
    /// Whether a source row passes the quarantine filter
    fn passes_filter(&self, row: &Row) -> bool {
        self.require_non_null
            .iter()
            .all(|col| row.get(col).is_some_and(|v| !v.is_null()))
    }

    /// Key values identifying a projected row
    fn key_of(&self, row: &Row) -> Vec<Option<crate::expr::ScalarValue>> {
        self.merge_key.iter().map(|k| row.get(k).cloned()).collect()
    }

    /// Project a source row through the column map
    fn project(&self, source: &Row) -> Row {
        self.columns
            .iter()
            .map(|m| (m.target.clone(), m.expr.eval(source)))
            .collect()
    }

    /// Apply the merge to in-memory rows
    ///
    /// Source rows are processed in order, so redelivering the same key
    /// converges on the latest delivery. Target rows never multiply: one row
    /// per merge key regardless of how often the source redelivers it.
    pub fn apply(&self, target_rows: &mut Vec<Row>, source_rows: &[Row]) {
        for source in source_rows {
            if !self.passes_filter(source) {
                continue;
            }
            let projected = self.project(source);
            let key = self.key_of(&projected);
            match target_rows.iter_mut().find(|r| self.key_of(r) == key) {
                Some(existing) => {
                    for (col, value) in projected {
                        existing.insert(col, value);
                    }
                }
                None => target_rows.push(projected),
            }
        }
    }
}
