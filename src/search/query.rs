use sea_orm::{
    Condition, EntityTrait, QueryFilter, Select,
    sea_query::{Alias, ConditionalStatement, Expr, SimpleExpr},
};
use serde::Serialize;

use crate::errors::SearchError;

/// Accumulating query that search conditions are added to.
///
/// Each call adds one `field operator value` clause; successive calls are
/// combined with AND.
pub trait QueryBuilder {
    /// Add a `field operator value` clause.
    ///
    /// # Errors
    /// Implementations may refuse operators they cannot express.
    fn and_where(&mut self, field: &str, operator: &str, value: &str) -> Result<(), SearchError>;
}

/// One recorded clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WhereClause {
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl WhereClause {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// Query builder that records clauses verbatim, for callers that render
/// them on their own. Accepts any operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WhereClauses {
    clauses: Vec<WhereClause>,
}

impl WhereClauses {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fluent form of [`QueryBuilder::and_where`]
    #[must_use]
    pub fn with(mut self, field: &str, operator: &str, value: &str) -> Self {
        self.clauses.push(WhereClause::new(field, operator, value));
        self
    }

    pub fn clauses(&self) -> &[WhereClause] {
        &self.clauses
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl QueryBuilder for WhereClauses {
    fn and_where(&mut self, field: &str, operator: &str, value: &str) -> Result<(), SearchError> {
        self.clauses.push(WhereClause::new(field, operator, value));
        Ok(())
    }
}

/// `table.column` is table-qualified, anything else a bare column.
fn column_expr(field: &str) -> Expr {
    match field.split_once('.') {
        Some((table, column)) if !table.is_empty() && !column.is_empty() => {
            Expr::col((Alias::new(table), Alias::new(column)))
        }
        _ => Expr::col(Alias::new(field)),
    }
}

/// Build a typed comparison with the value bound as a parameter.
///
/// # Errors
/// Returns `SearchError::UnsupportedOperator` for anything other than
/// `= != <> < > <= >= LIKE NOT LIKE` (case-insensitive).
pub fn comparison_expr(
    field: &str,
    operator: &str,
    value: &str,
) -> Result<SimpleExpr, SearchError> {
    let column = column_expr(field);
    let normalised = operator
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase();

    let expr = match normalised.as_str() {
        "=" => column.eq(value),
        "!=" | "<>" => column.ne(value),
        ">" => column.gt(value),
        "<" => column.lt(value),
        ">=" => column.gte(value),
        "<=" => column.lte(value),
        "LIKE" => column.like(value),
        "NOT LIKE" => column.not_like(value),
        _ => return Err(SearchError::UnsupportedOperator(operator.to_string())),
    };
    Ok(expr)
}

/// Always joins with AND, whatever the combine mode of the condition passed
/// in: a non-empty `Condition::any()` becomes one parenthesised operand.
impl QueryBuilder for Condition {
    fn and_where(&mut self, field: &str, operator: &str, value: &str) -> Result<(), SearchError> {
        let expr = comparison_expr(field, operator, value)?;
        let current = std::mem::replace(self, Condition::all());
        *self = if current.is_empty() {
            Condition::all().add(expr)
        } else {
            Condition::all().add(current).add(expr)
        };
        Ok(())
    }
}

impl<E: EntityTrait> QueryBuilder for Select<E> {
    fn and_where(&mut self, field: &str, operator: &str, value: &str) -> Result<(), SearchError> {
        let expr = comparison_expr(field, operator, value)?;
        <Self as QueryFilter>::query(self).and_where(expr);
        Ok(())
    }
}
