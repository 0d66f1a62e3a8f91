//! Query capability surface and the recording plan implementation.
//!
//! The compiler never constructs SQL text. It issues structured calls
//! against the [`QueryOps`] trait and leaves escaping, parameterization,
//! and dialect concerns to the implementation behind it.

pub mod ops;
pub mod plan;

pub use ops::{CmpOp, JoinType, QueryError, QueryOps, QueryResult};
pub use plan::{FilterClause, JoinClause, OrderClause, QueryPlan};
