//! Recording implementation of the query capability.
//!
//! [`QueryPlan`] accumulates the structured calls issued by the compiler
//! so they can be inspected, rendered, serialized, or handed to an
//! executor. It validates the references it receives: empty names are
//! configuration bugs and fail loudly.

use std::fmt;

use serde::Serialize;

use super::ops::{CmpOp, JoinType, QueryError, QueryOps, QueryResult};
use crate::dsl::SortDir;

// =============================================================================
// Clauses
// =============================================================================

/// A single WHERE entry, in issue order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterClause {
    Cmp {
        column: String,
        op: CmpOp,
        value: String,
        or: bool,
        negated: bool,
    },
    In {
        column: String,
        values: Vec<String>,
        negated: bool,
    },
    Null {
        column: String,
        negated: bool,
    },
    Between {
        column: String,
        low: String,
        high: String,
        negated: bool,
    },
}

impl fmt::Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterClause::Cmp {
                column,
                op,
                value,
                or,
                negated,
            } => {
                let prefix = match (*or, *negated) {
                    (true, _) => "or where",
                    (false, true) => "where not",
                    (false, false) => "where",
                };
                write!(f, "{prefix}: {column} {op} {value:?}")
            }
            FilterClause::In {
                column,
                values,
                negated,
            } => {
                let verb = if *negated { "not in" } else { "in" };
                let list: Vec<String> = values.iter().map(|v| format!("{v:?}")).collect();
                write!(f, "where: {column} {verb} ({})", list.join(", "))
            }
            FilterClause::Null { column, negated } => {
                let test = if *negated { "is not null" } else { "is null" };
                write!(f, "where: {column} {test}")
            }
            FilterClause::Between {
                column,
                low,
                high,
                negated,
            } => {
                let verb = if *negated { "not between" } else { "between" };
                write!(f, "where: {column} {verb} {low:?} and {high:?}")
            }
        }
    }
}

/// A JOIN entry: equi-join of `left = right` onto `table`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinClause {
    pub table: String,
    pub left: String,
    pub right: String,
    pub join_type: JoinType,
}

impl fmt::Display for JoinClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "join: {} {} on {} = {}",
            self.join_type, self.table, self.left, self.right
        )
    }
}

/// An ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderClause {
    pub column: String,
    pub dir: SortDir,
}

impl fmt::Display for OrderClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order by: {} {}", self.column, self.dir)
    }
}

// =============================================================================
// Plan
// =============================================================================

/// Accumulated query operations.
///
/// Issue order is preserved within each section. `Display` renders a
/// stable line-per-clause text form, a diagnostic rendering of the plan,
/// not SQL.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryPlan {
    pub select: Vec<String>,
    pub joins: Vec<JoinClause>,
    pub filters: Vec<FilterClause>,
    pub order: Vec<OrderClause>,
}

impl QueryPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.select.is_empty()
            && self.joins.is_empty()
            && self.filters.is_empty()
            && self.order.is_empty()
    }

    fn checked(column: &str) -> QueryResult<String> {
        if column.is_empty() {
            return Err(QueryError::EmptyColumn);
        }
        Ok(column.to_string())
    }

    fn push_cmp(
        &mut self,
        column: &str,
        op: CmpOp,
        value: &str,
        or: bool,
        negated: bool,
    ) -> QueryResult<()> {
        self.filters.push(FilterClause::Cmp {
            column: Self::checked(column)?,
            op,
            value: value.to_string(),
            or,
            negated,
        });
        Ok(())
    }

    fn push_in(&mut self, column: &str, values: &[String], negated: bool) -> QueryResult<()> {
        self.filters.push(FilterClause::In {
            column: Self::checked(column)?,
            values: values.to_vec(),
            negated,
        });
        Ok(())
    }

    fn push_null(&mut self, column: &str, negated: bool) -> QueryResult<()> {
        self.filters.push(FilterClause::Null {
            column: Self::checked(column)?,
            negated,
        });
        Ok(())
    }

    fn push_between(
        &mut self,
        column: &str,
        low: &str,
        high: &str,
        negated: bool,
    ) -> QueryResult<()> {
        self.filters.push(FilterClause::Between {
            column: Self::checked(column)?,
            low: low.to_string(),
            high: high.to_string(),
            negated,
        });
        Ok(())
    }
}

impl QueryOps for QueryPlan {
    fn where_cmp(&mut self, column: &str, op: CmpOp, value: &str) -> QueryResult<()> {
        self.push_cmp(column, op, value, false, false)
    }

    fn or_where_cmp(&mut self, column: &str, op: CmpOp, value: &str) -> QueryResult<()> {
        self.push_cmp(column, op, value, true, false)
    }

    fn where_not(&mut self, column: &str, op: CmpOp, value: &str) -> QueryResult<()> {
        self.push_cmp(column, op, value, false, true)
    }

    fn where_in(&mut self, column: &str, values: &[String]) -> QueryResult<()> {
        self.push_in(column, values, false)
    }

    fn where_not_in(&mut self, column: &str, values: &[String]) -> QueryResult<()> {
        self.push_in(column, values, true)
    }

    fn where_null(&mut self, column: &str) -> QueryResult<()> {
        self.push_null(column, false)
    }

    fn where_not_null(&mut self, column: &str) -> QueryResult<()> {
        self.push_null(column, true)
    }

    fn where_between(&mut self, column: &str, low: &str, high: &str) -> QueryResult<()> {
        self.push_between(column, low, high, false)
    }

    fn where_not_between(&mut self, column: &str, low: &str, high: &str) -> QueryResult<()> {
        self.push_between(column, low, high, true)
    }

    fn join(
        &mut self,
        table: &str,
        left_key: &str,
        right_key: &str,
        join_type: JoinType,
    ) -> QueryResult<()> {
        if table.is_empty() {
            return Err(QueryError::EmptyTable);
        }
        self.joins.push(JoinClause {
            table: table.to_string(),
            left: Self::checked(left_key)?,
            right: Self::checked(right_key)?,
            join_type,
        });
        Ok(())
    }

    fn select(&mut self, columns: &[String]) -> QueryResult<()> {
        self.select = columns.to_vec();
        Ok(())
    }

    fn order_by(&mut self, column: &str, dir: SortDir) -> QueryResult<()> {
        self.order.push(OrderClause {
            column: Self::checked(column)?,
            dir,
        });
        Ok(())
    }
}

impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines: Vec<String> = Vec::new();
        if !self.select.is_empty() {
            lines.push(format!("select: {}", self.select.join(", ")));
        }
        for join in &self.joins {
            lines.push(join.to_string());
        }
        for filter in &self.filters {
            lines.push(filter.to_string());
        }
        for order in &self.order {
            lines.push(order.to_string());
        }
        f.write_str(&lines.join("\n"))
    }
}
