//! Semantic descriptors produced by the condition grammar.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A filter predicate compiled from an operator-expression.
///
/// Operands stay as raw strings. Typing, escaping, and parameterization
/// belong to the query-execution collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Equality: `equal_v` / `not_equal_v`.
    Equal { value: String, negated: bool },

    /// Pattern match: `like_v` / `not_like_v`.
    Like { value: String, negated: bool },

    /// Range with independently optional bounds: `between_min,max`.
    ///
    /// An absent bound (empty string in the source expression) is skipped
    /// at application time; the literal `"0"` is a present bound.
    Between {
        low: Option<String>,
        high: Option<String>,
        negated: bool,
    },

    /// Set membership: `in_a,b,c` / `not_in_a,b,c`.
    In { values: Vec<String>, negated: bool },

    /// Null test: `is_null` / `is_not-null`.
    Null { negated: bool },

    /// Strict greater-than (`upper` in the grammar).
    Greater { value: String, negated: bool },

    /// Strict less-than (`lower` in the grammar).
    Lesser { value: String, negated: bool },
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDir::Asc => write!(f, "asc"),
            SortDir::Desc => write!(f, "desc"),
        }
    }
}
