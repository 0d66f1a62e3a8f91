//! Schema introspection capability.
//!
//! The compiler needs exactly one thing from the schema: the ordered
//! column list of a table, used to compute the auto-selected visible
//! columns of the base model. Anything richer (types, keys, statistics)
//! belongs to the surrounding repository layer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when fetching schema metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// The table exists only in configuration, not in the schema.
    #[error("Unknown table: '{0}'")]
    UnknownTable(String),
}

pub type MetadataResult<T> = Result<T, MetadataError>;

/// Trait for fetching table column listings.
pub trait SchemaProvider {
    /// List the columns of a table, in schema order.
    fn list_columns(&self, table: &str) -> MetadataResult<Vec<String>>;
}

/// In-memory schema map.
///
/// Deserializable so a project TOML can carry its schema inline:
///
/// ```toml
/// [schema]
/// users = ["id", "name", "email", "password", "deleted_at"]
/// user_pictures = ["id", "path", "deleted_at"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StaticSchema {
    #[serde(flatten)]
    tables: HashMap<String, Vec<String>>,
}

impl StaticSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style table registration.
    pub fn with_table(mut self, table: &str, columns: &[&str]) -> Self {
        self.insert(table, columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn insert(&mut self, table: impl Into<String>, columns: Vec<String>) {
        self.tables.insert(table.into(), columns);
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl SchemaProvider for StaticSchema {
    fn list_columns(&self, table: &str) -> MetadataResult<Vec<String>> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| MetadataError::UnknownTable(table.to_string()))
    }
}
