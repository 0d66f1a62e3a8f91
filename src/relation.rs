//! Relation chain resolution.
//!
//! A relation's declarative chain of `table.column` key pairs expands into
//! ordered join steps, and its select entries into an alias map. Both are
//! pure functions over configuration; memoization lives in the session.

use std::collections::HashMap;

/// One hop of a resolved join chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinStep {
    pub left_table: String,
    pub left_key: String,
    pub right_table: String,
    pub right_key: String,
}

/// Resolve a chain of key pairs into ordered join steps.
///
/// Malformed pairs (either half missing a `.` or having an empty half)
/// are dropped, not fatal. The first surviving step's left table is
/// rewritten to the base table, which anchors the chain regardless of
/// what the configuration named there.
pub fn resolve_chain(base_table: &str, chain: &[(String, String)]) -> Vec<JoinStep> {
    let mut steps = Vec::with_capacity(chain.len());
    for (left, right) in chain {
        let Some((left_table, left_key)) = split_ref(left) else {
            continue;
        };
        let Some((right_table, right_key)) = split_ref(right) else {
            continue;
        };
        let left_table = if steps.is_empty() {
            base_table
        } else {
            left_table
        };
        steps.push(JoinStep {
            left_table: left_table.to_string(),
            left_key: left_key.to_string(),
            right_table: right_table.to_string(),
            right_key: right_key.to_string(),
        });
    }
    steps
}

/// The table a dotted reference falls back to when no alias matches:
/// the right table of the chain's last hop.
pub fn last_table(steps: &[JoinStep]) -> Option<&str> {
    steps.last().map(|step| step.right_table.as_str())
}

/// Build the alias map from select entries of the form `source AS alias`.
///
/// The separator is matched case-insensitively; the last occurrence wins,
/// so source expressions may themselves contain ` as `. Entries without
/// an alias contribute nothing.
pub fn alias_map(select: &[String]) -> HashMap<String, String> {
    let mut aliases = HashMap::new();
    for entry in select {
        if let Some((source, alias)) = split_alias(entry) {
            aliases.insert(alias.to_string(), source.to_string());
        }
    }
    aliases
}

/// Split a `table.column` reference on its first `.`; `None` when either
/// half is empty.
fn split_ref(reference: &str) -> Option<(&str, &str)> {
    let (table, column) = reference.split_once('.')?;
    if table.is_empty() || column.is_empty() {
        return None;
    }
    Some((table, column))
}

fn split_alias(entry: &str) -> Option<(&str, &str)> {
    let lowered = entry.to_ascii_lowercase();
    let idx = lowered.rfind(" as ")?;
    let source = entry[..idx].trim();
    let alias = entry[idx + 4..].trim();
    if source.is_empty() || alias.is_empty() {
        return None;
    }
    Some((source, alias))
}
