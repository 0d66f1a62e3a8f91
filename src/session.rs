//! Query-building session: the filter/sort/search/join orchestrator.
//!
//! A session compiles raw query strings into structured capability calls:
//!
//! 1. Tokenize the raw string into conditions (up to the condition limit).
//! 2. Compile each operator-expression into a predicate or direction.
//! 3. Resolve the column: direct allow-listed columns are qualified with
//!    the base table; `relation.field` references go through the relation
//!    allow-list, trigger the join chain, and resolve via the alias map.
//! 4. Issue the call against the owned query object.
//!
//! Conditions that fail any of these steps are dropped silently. Errors
//! out of a session are collaborator or configuration failures only.
//!
//! A session is synchronous and single-threaded; use one session per
//! logical request. Resolved chains and alias maps are memoized for the
//! life of the session and survive [`Session::reset`]; join state does
//! not.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::config::{RelationConfig, RepositoryConfig};
use crate::dsl::{parse_conditions, parse_direction, parse_predicate, Predicate};
use crate::metadata::{MetadataError, SchemaProvider};
use crate::query::{CmpOp, QueryError, QueryOps, QueryResult};
use crate::relation::{alias_map, last_table, resolve_chain, JoinStep};

/// Errors propagated out of a session.
///
/// Malformed or unauthorized query-string input never lands here; it is
/// dropped condition by condition.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Which allow-list a condition is authorized against.
#[derive(Debug, Clone, Copy)]
enum Scope {
    Filter,
    Sort,
}

/// Join and select bookkeeping for one query-building pass.
#[derive(Debug, Default)]
struct JoinState {
    /// Target tables already joined; the dedup key for join application.
    applied_tables: HashSet<String>,

    /// Relations whose select entries have been merged.
    applied_relations: HashSet<String>,

    /// Tables already guarded against soft-deleted rows.
    guarded: HashSet<String>,

    /// Ordered, deduplicated select list.
    selected: Vec<String>,
}

impl JoinState {
    fn clear(&mut self) {
        self.applied_tables.clear();
        self.applied_relations.clear();
        self.guarded.clear();
        self.selected.clear();
    }
}

/// One query-building lifecycle over a repository configuration.
///
/// The session owns its query object exclusively; handing the query back
/// via [`Session::into_query`] is the terminal transition; a new query
/// needs a new session.
pub struct Session<'a, Q> {
    config: &'a RepositoryConfig,
    schema: &'a dyn SchemaProvider,
    query: Q,
    /// Memoized chain resolution per relation name.
    resolved: HashMap<String, Vec<JoinStep>>,
    /// Memoized alias maps per relation name.
    aliases: HashMap<String, HashMap<String, String>>,
    /// Base visible columns, computed once per session.
    visible: Option<Vec<String>>,
    state: JoinState,
}

impl<'a, Q: QueryOps> Session<'a, Q> {
    pub fn new(config: &'a RepositoryConfig, schema: &'a dyn SchemaProvider, query: Q) -> Self {
        Self {
            config,
            schema,
            query,
            resolved: HashMap::new(),
            aliases: HashMap::new(),
            visible: None,
            state: JoinState::default(),
        }
    }

    /// Borrow the underlying query object.
    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Finish building and hand the query object to the caller.
    pub fn into_query(self) -> Q {
        self.query
    }

    /// Clear join/select state and start over on a fresh query object.
    ///
    /// Memoized relation resolution stays: it is configuration-derived
    /// and independent of any single query.
    pub fn reset(&mut self)
    where
        Q: Default,
    {
        self.state.clear();
        self.query = Q::default();
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    /// Apply an `@`-separated filter string, up to the configured limit.
    pub fn filter(&mut self, raw: &str) -> SessionResult<()> {
        self.filter_limited(raw, self.config.filter_limit)
    }

    /// Apply a filter string with an explicit condition limit.
    ///
    /// Only the first `limit` well-formed conditions are processed; the
    /// remainder is ignored. This bounds predicate and join fan-out from
    /// adversarial input.
    pub fn filter_limited(&mut self, raw: &str, limit: usize) -> SessionResult<()> {
        for condition in parse_conditions(raw).take(limit) {
            let Some(predicate) = parse_predicate(condition.expr) else {
                continue;
            };
            if self.allowed_direct(condition.column, Scope::Filter) {
                let qualified = self.qualify(condition.column);
                self.apply_predicate(&qualified, &predicate)?;
            } else if let Some(target) = self.joined_target(condition.column, Scope::Filter)? {
                self.apply_predicate(&target, &predicate)?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Sorting
    // ========================================================================

    /// Apply an `@`-separated sort string, up to the configured limit.
    pub fn sort(&mut self, raw: &str) -> SessionResult<()> {
        self.sort_limited(raw, self.config.sort_limit)
    }

    /// Apply a sort string with an explicit condition limit.
    pub fn sort_limited(&mut self, raw: &str, limit: usize) -> SessionResult<()> {
        for condition in parse_conditions(raw).take(limit) {
            let Some(direction) = parse_direction(condition.expr) else {
                continue;
            };
            if self.allowed_direct(condition.column, Scope::Sort) {
                let qualified = self.qualify(condition.column);
                self.query.order_by(&qualified, direction)?;
            } else if let Some(target) = self.joined_target(condition.column, Scope::Sort)? {
                self.query.order_by(&target, direction)?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Searching
    // ========================================================================

    /// Flat OR-LIKE match across the configured searchable columns.
    pub fn search(&mut self, raw: &str) -> SessionResult<()> {
        let term = raw.trim();
        if term.is_empty() {
            return Ok(());
        }
        let pattern = format!("%{}%", term);
        let config = self.config;
        for column in &config.searchable {
            let qualified = qualify_with(&config.table, column);
            self.query.or_where_cmp(&qualified, CmpOp::Like, &pattern)?;
        }
        Ok(())
    }

    // ========================================================================
    // Joining
    // ========================================================================

    /// Apply a registered relation's join chain. Unknown names are a no-op.
    pub fn join(&mut self, name: &str) -> SessionResult<()> {
        let config = self.config;
        if let Some(relation) = config.relations.get(name) {
            self.apply_relation(name, relation)?;
        }
        Ok(())
    }

    /// Apply several registered relations, in order.
    pub fn joins<'n, I>(&mut self, names: I) -> SessionResult<()>
    where
        I: IntoIterator<Item = &'n str>,
    {
        for name in names {
            self.join(name)?;
        }
        Ok(())
    }

    /// Apply an inline relation definition that has no registered name.
    ///
    /// Same resolution path as registered relations, minus the
    /// memoization: the chain is re-parsed on every call.
    pub fn join_chain(&mut self, relation: &RelationConfig) -> SessionResult<()> {
        let steps = resolve_chain(&self.config.table, &relation.chain);
        if steps.is_empty() {
            return Ok(());
        }
        self.merge_selects(&relation.select)?;
        self.apply_steps(&steps, relation)?;
        Ok(())
    }

    // ========================================================================
    // Column resolution
    // ========================================================================

    fn allowed_direct(&self, column: &str, scope: Scope) -> bool {
        let allowed = match scope {
            Scope::Filter => &self.config.filterable,
            Scope::Sort => &self.config.sortable,
        };
        allowed.iter().any(|candidate| candidate == column)
    }

    /// Resolve a `relation.field` reference to a qualified column,
    /// applying the relation's join chain on the way.
    ///
    /// `None` drops the condition: unknown relation, unauthorized field,
    /// or a chain that resolves to nothing.
    fn joined_target(&mut self, column: &str, scope: Scope) -> SessionResult<Option<String>> {
        let Some((name, field)) = column.split_once('.') else {
            return Ok(None);
        };
        let config = self.config;
        let Some(relation) = config.relations.get(name) else {
            return Ok(None);
        };
        let allowed = match scope {
            Scope::Filter => &relation.filterable,
            Scope::Sort => &relation.sortable,
        };
        if !allowed.iter().any(|candidate| candidate == field) {
            return Ok(None);
        }
        let Some(last) = self.apply_relation(name, relation)? else {
            return Ok(None);
        };
        Ok(Some(self.field_target(name, relation, field, &last)))
    }

    /// Alias-map lookup with fallback to `lastJoinedTable.field`.
    fn field_target(
        &mut self,
        name: &str,
        relation: &RelationConfig,
        field: &str,
        last: &str,
    ) -> String {
        let aliases = self
            .aliases
            .entry(name.to_string())
            .or_insert_with(|| alias_map(&relation.select));
        match aliases.get(field) {
            Some(source) => source.clone(),
            None => format!("{}.{}", last, field),
        }
    }

    fn qualify(&self, column: &str) -> String {
        qualify_with(&self.config.table, column)
    }

    // ========================================================================
    // Join application
    // ========================================================================

    /// Memoized chain resolution. The first hop's left table is rewritten
    /// to the base table.
    fn resolved_steps(&mut self, name: &str, relation: &RelationConfig) -> Vec<JoinStep> {
        if let Some(steps) = self.resolved.get(name) {
            return steps.clone();
        }
        let steps = resolve_chain(&self.config.table, &relation.chain);
        self.resolved.insert(name.to_string(), steps.clone());
        steps
    }

    /// Ensure a relation's join chain is applied exactly once.
    ///
    /// Returns the chain's last joined table, or `None` when the chain
    /// resolves to nothing. Such a relation never yields predicates or
    /// orders.
    fn apply_relation(
        &mut self,
        name: &str,
        relation: &RelationConfig,
    ) -> SessionResult<Option<String>> {
        let steps = self.resolved_steps(name, relation);
        let Some(last) = last_table(&steps).map(str::to_string) else {
            return Ok(None);
        };
        if self.state.applied_relations.insert(name.to_string()) {
            self.merge_selects(&relation.select)?;
        }
        self.apply_steps(&steps, relation)?;
        Ok(Some(last))
    }

    /// Merge base visible columns and the relation's select entries, then
    /// issue one SELECT covering the union.
    fn merge_selects(&mut self, select: &[String]) -> SessionResult<()> {
        let visible = self.visible_columns()?;
        for column in visible {
            push_unique(&mut self.state.selected, column);
        }
        for entry in select {
            push_unique(&mut self.state.selected, entry.clone());
        }
        self.query.select(&self.state.selected)?;
        Ok(())
    }

    /// Auto-selected base columns: schema order, minus hidden attributes
    /// and the soft-delete column, qualified with the base table.
    fn visible_columns(&mut self) -> SessionResult<Vec<String>> {
        if let Some(visible) = &self.visible {
            return Ok(visible.clone());
        }
        let config = self.config;
        let columns = self.schema.list_columns(&config.table)?;
        let visible: Vec<String> = columns
            .into_iter()
            .filter(|column| !config.hidden.iter().any(|hidden| hidden == column))
            .filter(|column| *column != config.soft_delete_column)
            .map(|column| format!("{}.{}", config.table, column))
            .collect();
        self.visible = Some(visible.clone());
        Ok(visible)
    }

    /// Emit each hop, in chain order, joining a target table at most once
    /// per pass.
    fn apply_steps(&mut self, steps: &[JoinStep], relation: &RelationConfig) -> SessionResult<()> {
        for step in steps {
            if self.state.applied_tables.insert(step.right_table.clone()) {
                self.query.join(
                    &step.right_table,
                    &format!("{}.{}", step.left_table, step.left_key),
                    &format!("{}.{}", step.right_table, step.right_key),
                    relation.join_type,
                )?;
            }
            self.guard_soft_delete(step, relation)?;
        }
        Ok(())
    }

    /// Exclude soft-deleted rows for either side of a hop when the
    /// relation configures it. The base table is governed by the model's
    /// own scope, never here.
    fn guard_soft_delete(
        &mut self,
        step: &JoinStep,
        relation: &RelationConfig,
    ) -> SessionResult<()> {
        let config = self.config;
        for table in [step.left_table.as_str(), step.right_table.as_str()] {
            if table == config.table {
                continue;
            }
            if !relation.soft_delete.iter().any(|candidate| candidate == table) {
                continue;
            }
            if self.state.guarded.insert(table.to_string()) {
                self.query
                    .where_null(&format!("{}.{}", table, config.soft_delete_column))?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Predicate application
    // ========================================================================

    /// Map a predicate descriptor onto capability calls.
    fn apply_predicate(&mut self, column: &str, predicate: &Predicate) -> SessionResult<()> {
        let query = &mut self.query;
        match predicate {
            Predicate::Equal {
                value,
                negated: false,
            } => query.where_cmp(column, CmpOp::Eq, value)?,
            Predicate::Equal {
                value,
                negated: true,
            } => query.where_not(column, CmpOp::Eq, value)?,
            Predicate::Like {
                value,
                negated: false,
            } => query.where_cmp(column, CmpOp::Like, value)?,
            Predicate::Like {
                value,
                negated: true,
            } => query.where_not(column, CmpOp::Like, value)?,
            Predicate::Greater {
                value,
                negated: false,
            } => query.where_cmp(column, CmpOp::Gt, value)?,
            Predicate::Greater {
                value,
                negated: true,
            } => query.where_not(column, CmpOp::Gt, value)?,
            Predicate::Lesser {
                value,
                negated: false,
            } => query.where_cmp(column, CmpOp::Lt, value)?,
            Predicate::Lesser {
                value,
                negated: true,
            } => query.where_not(column, CmpOp::Lt, value)?,
            Predicate::In {
                values,
                negated: false,
            } => query.where_in(column, values)?,
            Predicate::In {
                values,
                negated: true,
            } => query.where_not_in(column, values)?,
            Predicate::Null { negated: false } => query.where_null(column)?,
            Predicate::Null { negated: true } => query.where_not_null(column)?,
            Predicate::Between { low, high, negated } => {
                apply_between(query, column, low.as_deref(), high.as_deref(), *negated)?
            }
        }
        Ok(())
    }
}

/// Each present bound is applied independently: `>=` for the lower,
/// `<=` for the upper. A fully-bounded negated range goes through
/// `where_not_between`; one-sided negation degrades to `where_not`.
fn apply_between<Q: QueryOps>(
    query: &mut Q,
    column: &str,
    low: Option<&str>,
    high: Option<&str>,
    negated: bool,
) -> QueryResult<()> {
    if let (Some(low), Some(high), true) = (low, high, negated) {
        return query.where_not_between(column, low, high);
    }
    if let Some(low) = low {
        if negated {
            query.where_not(column, CmpOp::Gte, low)?;
        } else {
            query.where_cmp(column, CmpOp::Gte, low)?;
        }
    }
    if let Some(high) = high {
        if negated {
            query.where_not(column, CmpOp::Lte, high)?;
        } else {
            query.where_cmp(column, CmpOp::Lte, high)?;
        }
    }
    Ok(())
}

/// Prefix bare column names with the base table; dotted names pass
/// through untouched.
fn qualify_with(table: &str, column: &str) -> String {
    if column.contains('.') {
        column.to_string()
    } else {
        format!("{}.{}", table, column)
    }
}

fn push_unique(list: &mut Vec<String>, entry: String) {
    if !list.contains(&entry) {
        list.push(entry);
    }
}
