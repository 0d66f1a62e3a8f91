//! Tokenizer for raw condition strings.
//!
//! Splits a raw query string into ordered `column:expr` conditions. The
//! sequence is lazy, finite, and restartable: tokenizing the same string
//! twice yields the same conditions, and no external state is consulted.

/// Separator between conditions in a raw query string.
pub const CONDITION_SEPARATOR: char = '@';

/// Separator between the column reference and the operator-expression.
pub const EXPR_SEPARATOR: char = ':';

/// One `column:expr` condition, borrowed from the raw string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition<'a> {
    pub column: &'a str,
    pub expr: &'a str,
}

/// Lazy iterator over the well-formed conditions of a raw string.
///
/// Segments without a `:`, or with nothing after it, are skipped.
#[derive(Debug, Clone)]
pub struct Conditions<'a> {
    segments: std::str::Split<'a, char>,
}

/// Tokenize a raw query string into conditions.
pub fn parse_conditions(raw: &str) -> Conditions<'_> {
    Conditions {
        segments: raw.split(CONDITION_SEPARATOR),
    }
}

impl<'a> Iterator for Conditions<'a> {
    type Item = Condition<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for segment in self.segments.by_ref() {
            // Split on the first `:` only; the expr side never nests one.
            let Some((column, expr)) = segment.split_once(EXPR_SEPARATOR) else {
                continue;
            };
            if expr.is_empty() {
                continue;
            }
            return Some(Condition { column, expr });
        }
        None
    }
}
