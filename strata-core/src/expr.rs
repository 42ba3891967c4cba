//! Derived-column expressions
//!
//! A small expression language for gold-layer columns: column references,
//! literals, arithmetic, and CASE WHEN over comparison predicates. Each
//! expression renders to warehouse SQL and can also be evaluated against an
//! in-memory row, so merge semantics are testable without a live warehouse.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A scalar cell value as it appears in a warehouse row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ScalarValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            ScalarValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// A row keyed by column name
pub type Row = BTreeMap<String, ScalarValue>;

/// Expression over source-layer columns
///
/// Serialized form is externally tagged, e.g.
/// `{"mul": [{"column": "total_amount"}, {"literal": 0.9}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Reference to a source column
    Column(String),
    /// Constant value
    Literal(ScalarValue),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    /// CASE WHEN <predicate> THEN <then> ELSE <otherwise> END
    Case {
        when: Predicate,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

/// Boolean condition used inside CASE expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Gt(Box<Expr>, Box<Expr>),
    Ge(Box<Expr>, Box<Expr>),
    Lt(Box<Expr>, Box<Expr>),
    Le(Box<Expr>, Box<Expr>),
    Eq(Box<Expr>, Box<Expr>),
    And(Box<Predicate>, Box<Predicate>),
}

impl Expr {
    /// Shorthand for a column reference
    pub fn col(name: impl Into<String>) -> Self {
        Expr::Column(name.into())
    }

    /// Shorthand for a numeric literal
    pub fn num(value: f64) -> Self {
        Expr::Literal(ScalarValue::Number(value))
    }

    /// Render the expression to SQL
    pub fn to_sql(&self) -> String {
        match self {
            Expr::Column(name) => name.clone(),
            Expr::Literal(value) => render_literal(value),
            Expr::Add(lhs, rhs) => format!("({} + {})", lhs.to_sql(), rhs.to_sql()),
            Expr::Sub(lhs, rhs) => format!("({} - {})", lhs.to_sql(), rhs.to_sql()),
            Expr::Mul(lhs, rhs) => format!("({} * {})", lhs.to_sql(), rhs.to_sql()),
            Expr::Div(lhs, rhs) => format!("({} / {})", lhs.to_sql(), rhs.to_sql()),
            Expr::Case {
                when,
                then,
                otherwise,
            } => format!(
                "CASE WHEN {} THEN {} ELSE {} END",
                when.to_sql(),
                then.to_sql(),
                otherwise.to_sql()
            ),
        }
    }

    /// Evaluate the expression against a row
    ///
    /// Follows SQL null semantics: a missing column or an arithmetic operand
    /// that is not a number yields NULL, and NULL propagates.
    pub fn eval(&self, row: &Row) -> ScalarValue {
        match self {
            Expr::Column(name) => row.get(name).cloned().unwrap_or(ScalarValue::Null),
            Expr::Literal(value) => value.clone(),
            Expr::Add(lhs, rhs) => numeric_op(lhs, rhs, row, |a, b| a + b),
            Expr::Sub(lhs, rhs) => numeric_op(lhs, rhs, row, |a, b| a - b),
            Expr::Mul(lhs, rhs) => numeric_op(lhs, rhs, row, |a, b| a * b),
            Expr::Div(lhs, rhs) => numeric_op(lhs, rhs, row, |a, b| a / b),
            Expr::Case {
                when,
                then,
                otherwise,
            } => {
                if when.eval(row) {
                    then.eval(row)
                } else {
                    otherwise.eval(row)
                }
            }
        }
    }
}

impl Predicate {
    /// Render the predicate to SQL
    pub fn to_sql(&self) -> String {
        match self {
            Predicate::Gt(lhs, rhs) => format!("{} > {}", lhs.to_sql(), rhs.to_sql()),
            Predicate::Ge(lhs, rhs) => format!("{} >= {}", lhs.to_sql(), rhs.to_sql()),
            Predicate::Lt(lhs, rhs) => format!("{} < {}", lhs.to_sql(), rhs.to_sql()),
            Predicate::Le(lhs, rhs) => format!("{} <= {}", lhs.to_sql(), rhs.to_sql()),
            Predicate::Eq(lhs, rhs) => format!("{} = {}", lhs.to_sql(), rhs.to_sql()),
            Predicate::And(lhs, rhs) => format!("({} AND {})", lhs.to_sql(), rhs.to_sql()),
        }
    }

    /// Evaluate the predicate against a row
    ///
    /// Comparisons involving NULL are unknown and treated as false, matching
    /// how the warehouse filters them out.
    pub fn eval(&self, row: &Row) -> bool {
        match self {
            Predicate::Gt(lhs, rhs) => compare(lhs, rhs, row, |o| o == std::cmp::Ordering::Greater),
            Predicate::Ge(lhs, rhs) => compare(lhs, rhs, row, |o| o != std::cmp::Ordering::Less),
            Predicate::Lt(lhs, rhs) => compare(lhs, rhs, row, |o| o == std::cmp::Ordering::Less),
            Predicate::Le(lhs, rhs) => compare(lhs, rhs, row, |o| o != std::cmp::Ordering::Greater),
            Predicate::Eq(lhs, rhs) => {
                let (a, b) = (lhs.eval(row), rhs.eval(row));
                !a.is_null() && !b.is_null() && a == b
            }
            Predicate::And(lhs, rhs) => lhs.eval(row) && rhs.eval(row),
        }
    }
}

fn numeric_op(lhs: &Expr, rhs: &Expr, row: &Row, op: impl Fn(f64, f64) -> f64) -> ScalarValue {
    match (lhs.eval(row).as_number(), rhs.eval(row).as_number()) {
        (Some(a), Some(b)) => ScalarValue::Number(op(a, b)),
        _ => ScalarValue::Null,
    }
}

fn compare(
    lhs: &Expr,
    rhs: &Expr,
    row: &Row,
    accept: impl Fn(std::cmp::Ordering) -> bool,
) -> bool {
    match (lhs.eval(row).as_number(), rhs.eval(row).as_number()) {
        (Some(a), Some(b)) => a.partial_cmp(&b).map(&accept).unwrap_or(false),
        _ => false,
    }
}

fn render_literal(value: &ScalarValue) -> String {
    match value {
        ScalarValue::Null => "NULL".to_string(),
        ScalarValue::Bool(b) => b.to_string(),
        ScalarValue::Number(n) => {
            if n.fract() == 0.0 {
                format!("{n:.1}")
            } else {
                n.to_string()
            }
        }
        ScalarValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, ScalarValue)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// The discount rule from the sales gold layer
    fn discounted_amount() -> Expr {
        Expr::Case {
            when: Predicate::Gt(Box::new(Expr::col("total_amount")), Box::new(Expr::num(50.0))),
            then: Box::new(Expr::Mul(
                Box::new(Expr::col("total_amount")),
                Box::new(Expr::num(0.9)),
            )),
            otherwise: Box::new(Expr::col("total_amount")),
        }
    }

    #[test]
    fn test_case_applies_discount_above_threshold() {
        let r = row(&[("total_amount", ScalarValue::Number(80.0))]);
        assert_eq!(discounted_amount().eval(&r), ScalarValue::Number(72.0));
    }

    #[test]
    fn test_case_keeps_amount_below_threshold() {
        let r = row(&[("total_amount", ScalarValue::Number(40.0))]);
        assert_eq!(discounted_amount().eval(&r), ScalarValue::Number(40.0));
    }

    #[test]
    fn test_null_propagates_through_arithmetic() {
        let r = row(&[("fixed_acidity", ScalarValue::Number(7.4))]);
        let avg = Expr::Div(
            Box::new(Expr::Add(
                Box::new(Expr::col("fixed_acidity")),
                Box::new(Expr::col("volatile_acidity")),
            )),
            Box::new(Expr::num(2.0)),
        );
        assert_eq!(avg.eval(&r), ScalarValue::Null);
    }

    #[test]
    fn test_comparison_with_null_is_false() {
        let r = Row::new();
        let pred = Predicate::Gt(Box::new(Expr::col("total_amount")), Box::new(Expr::num(50.0)));
        assert!(!pred.eval(&r));
    }

    #[test]
    fn test_sql_rendering() {
        let avg = Expr::Div(
            Box::new(Expr::Add(
                Box::new(Expr::col("FIXED_ACIDITY")),
                Box::new(Expr::col("VOLATILE_ACIDITY")),
            )),
            Box::new(Expr::num(2.0)),
        );
        assert_eq!(avg.to_sql(), "((FIXED_ACIDITY + VOLATILE_ACIDITY) / 2.0)");

        assert_eq!(
            discounted_amount().to_sql(),
            "CASE WHEN total_amount > 50.0 THEN (total_amount * 0.9) ELSE total_amount END"
        );
    }

    #[test]
    fn test_expr_json_round_trip() {
        let expr = discounted_amount();
        let json = serde_json::to_string(&expr).unwrap();
        let back: Expr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expr);
    }
}
