//! Condition grammar for client-supplied query strings.
//!
//! A raw filter or sort string is a flat, conjunctive list of conditions:
//!
//! ```text
//! price:between_100,200@status:equal_active@profile.photo:like_cat
//! ```
//!
//! Conditions are separated by `@`; each condition splits on its first `:`
//! into a column reference and an operator-expression. The grammar is
//! deliberately flat: no boolean grouping, no nesting.
//!
//! Everything here is infallible by design: fragments that do not match
//! the grammar are skipped, never reported. Client query strings are
//! untrusted input and a single bad parameter must not fail a request.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{Predicate, SortDir};
pub use lexer::{parse_conditions, Condition, Conditions};
pub use parser::{parse_direction, parse_predicate};
