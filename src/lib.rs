//! # Sift
//!
//! Compiles compact client-supplied query strings into relational query
//! plans.
//!
//! List/search endpoints that accept filter and sort parameters from
//! clients need a uniform, injection-safe way to turn those parameters
//! into database predicates. Sift provides the grammar, the allow-list
//! enforcement, and the join resolution; an external query-execution
//! collaborator owns SQL generation and execution.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Raw query strings (filter / sort / search)        │
//! │    "price:between_100,200@profile.photo:equal_x"         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [dsl::lexer]
//! ┌─────────────────────────────────────────────────────────┐
//! │               Conditions (column, expr)                  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [dsl::parser]
//! ┌─────────────────────────────────────────────────────────┐
//! │             Predicate / SortDir descriptors              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [session + relation + config]
//! ┌─────────────────────────────────────────────────────────┐
//! │  Allow-lists, column resolution, join chain expansion    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [query::QueryOps]
//! ┌─────────────────────────────────────────────────────────┐
//! │     Structured capability calls (QueryPlan records)      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Malformed or unauthorized input never raises: a bad condition degrades
//! to "no predicate applied". Only collaborator and configuration failures
//! propagate as errors.

pub mod config;
pub mod dsl;
pub mod metadata;
pub mod query;
pub mod relation;
pub mod session;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::{Project, RelationConfig, RepositoryConfig};
    pub use crate::dsl::{
        parse_conditions, parse_direction, parse_predicate, Condition, Predicate, SortDir,
    };
    pub use crate::metadata::{SchemaProvider, StaticSchema};
    pub use crate::query::{
        CmpOp, FilterClause, JoinClause, JoinType, OrderClause, QueryOps, QueryPlan,
    };
    pub use crate::session::{Session, SessionError};
}

// Also export the main types at crate root for convenience
pub use config::{Project, RelationConfig, RepositoryConfig};
pub use metadata::{SchemaProvider, StaticSchema};
pub use query::{QueryOps, QueryPlan};
pub use session::Session;
