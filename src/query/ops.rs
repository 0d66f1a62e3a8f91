//! The query-execution capability consumed by the compiler.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dsl::SortDir;

/// Errors surfaced by a query capability.
///
/// These mark configuration bugs or backend failures and propagate to the
/// caller, unlike malformed filter fragments, which are skipped upstream
/// and never reach the capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("empty column reference issued to the query capability")]
    EmptyColumn,

    #[error("empty table reference issued to the query capability")]
    EmptyTable,

    #[error("backend error: {0}")]
    Backend(String),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Comparison operators carried by `where_cmp`/`or_where_cmp`/`where_not`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CmpOp {
    Eq,
    Like,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CmpOp::Eq => write!(f, "="),
            CmpOp::Like => write!(f, "like"),
            CmpOp::Gt => write!(f, ">"),
            CmpOp::Lt => write!(f, "<"),
            CmpOp::Gte => write!(f, ">="),
            CmpOp::Lte => write!(f, "<="),
        }
    }
}

/// Type of join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "inner"),
            JoinType::Left => write!(f, "left"),
            JoinType::Right => write!(f, "right"),
        }
    }
}

/// The query-execution capability.
///
/// An explicit, enumerated interface: every operation the compiler needs
/// is a named method, and implementations decide whether calls accumulate
/// (like [`QueryPlan`](super::plan::QueryPlan)) or execute eagerly.
/// Column and key references arrive fully qualified.
pub trait QueryOps {
    /// `column op value`, AND-composed.
    fn where_cmp(&mut self, column: &str, op: CmpOp, value: &str) -> QueryResult<()>;

    /// `column op value`, OR-composed with the preceding conditions.
    fn or_where_cmp(&mut self, column: &str, op: CmpOp, value: &str) -> QueryResult<()>;

    /// Negated comparison: `NOT (column op value)`.
    fn where_not(&mut self, column: &str, op: CmpOp, value: &str) -> QueryResult<()>;

    fn where_in(&mut self, column: &str, values: &[String]) -> QueryResult<()>;

    fn where_not_in(&mut self, column: &str, values: &[String]) -> QueryResult<()>;

    fn where_null(&mut self, column: &str) -> QueryResult<()>;

    fn where_not_null(&mut self, column: &str) -> QueryResult<()>;

    fn where_between(&mut self, column: &str, low: &str, high: &str) -> QueryResult<()>;

    fn where_not_between(&mut self, column: &str, low: &str, high: &str) -> QueryResult<()>;

    /// Equi-join `left_key = right_key` onto `table`.
    fn join(
        &mut self,
        table: &str,
        left_key: &str,
        right_key: &str,
        join_type: JoinType,
    ) -> QueryResult<()>;

    /// Replace the select list.
    fn select(&mut self, columns: &[String]) -> QueryResult<()>;

    fn order_by(&mut self, column: &str, dir: SortDir) -> QueryResult<()>;
}
