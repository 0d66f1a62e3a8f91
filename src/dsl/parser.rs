//! Operator-expression compiler.
//!
//! Maps the `_`-delimited operator grammar to [`Predicate`] descriptors and
//! direction tokens to [`SortDir`]. Anything that does not match the
//! grammar compiles to `None`; an invalid fragment degrades to "no
//! predicate applied" instead of failing the request.
//!
//! Grammar, by first token:
//!
//! ```text
//! equal_v          like_v           upper_v          lower_v
//! between_min,max  in_a,b,c         is_null          is_not-null
//! not_<sub>_v      with sub in {equal, like, between, in, upper, lower}
//! ```

use super::ast::{Predicate, SortDir};

/// Compile an operator-expression into a predicate descriptor.
///
/// The first `_`-delimited token selects the operator; the remainder is
/// the operand and keeps any further underscores intact. Comma lists
/// split on `,`.
pub fn parse_predicate(expr: &str) -> Option<Predicate> {
    let (op, rest) = expr.split_once('_')?;
    match op {
        "equal" => operand(rest).map(|value| Predicate::Equal {
            value,
            negated: false,
        }),
        "like" => operand(rest).map(|value| Predicate::Like {
            value,
            negated: false,
        }),
        "between" => between(rest, false),
        "in" => operands(rest).map(|values| Predicate::In {
            values,
            negated: false,
        }),
        "upper" => operand(rest).map(|value| Predicate::Greater {
            value,
            negated: false,
        }),
        "lower" => operand(rest).map(|value| Predicate::Lesser {
            value,
            negated: false,
        }),
        "is" => match rest {
            "null" => Some(Predicate::Null { negated: false }),
            "not-null" => Some(Predicate::Null { negated: true }),
            _ => None,
        },
        "not" => {
            let (sub, rest) = rest.split_once('_')?;
            match sub {
                "equal" => operand(rest).map(|value| Predicate::Equal {
                    value,
                    negated: true,
                }),
                "like" => operand(rest).map(|value| Predicate::Like {
                    value,
                    negated: true,
                }),
                "between" => between(rest, true),
                "in" => operands(rest).map(|values| Predicate::In {
                    values,
                    negated: true,
                }),
                "upper" => operand(rest).map(|value| Predicate::Greater {
                    value,
                    negated: true,
                }),
                "lower" => operand(rest).map(|value| Predicate::Lesser {
                    value,
                    negated: true,
                }),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Compile a sort-direction token. Case-insensitive `ASC`/`DESC` only.
pub fn parse_direction(expr: &str) -> Option<SortDir> {
    if expr.eq_ignore_ascii_case("asc") {
        Some(SortDir::Asc)
    } else if expr.eq_ignore_ascii_case("desc") {
        Some(SortDir::Desc)
    } else {
        None
    }
}

/// A non-empty operand, or nothing. `"0"` is a value like any other.
fn operand(rest: &str) -> Option<String> {
    (!rest.is_empty()).then(|| rest.to_string())
}

fn operands(rest: &str) -> Option<Vec<String>> {
    if rest.is_empty() {
        return None;
    }
    Some(rest.split(',').map(str::to_string).collect())
}

/// Bounds are positional `min,max`. An empty half is an absent bound; the
/// literal `0` is not. Both absent compiles to nothing.
fn between(rest: &str, negated: bool) -> Option<Predicate> {
    let (low, high) = rest.split_once(',').unwrap_or((rest, ""));
    let low = operand(low);
    let high = operand(high);
    if low.is_none() && high.is_none() {
        return None;
    }
    Some(Predicate::Between { low, high, negated })
}
