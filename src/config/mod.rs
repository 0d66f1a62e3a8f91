//! TOML-backed repository and relation configuration.
//!
//! A repository declares its base table, the columns clients may filter,
//! sort, and search on, and the named relations that make joined columns
//! reachable from query strings.
//!
//! Example configuration:
//! ```toml
//! [repository]
//! table = "users"
//! hidden = ["password"]
//! filterable = ["id", "status", "price"]
//! sortable = ["id", "name"]
//! searchable = ["name", "email"]
//!
//! [repository.relations.profile]
//! chain = [["users.pic_id", "user_pictures.id"]]
//! select = ["user_pictures.path AS photo"]
//! filterable = ["photo"]
//! sortable = ["photo"]
//! soft_delete = ["user_pictures"]
//! join_type = "left"
//!
//! [schema]
//! users = ["id", "name", "email", "password", "deleted_at"]
//! user_pictures = ["id", "path", "deleted_at"]
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::metadata::StaticSchema;
use crate::query::JoinType;

/// Error type for configuration handling.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Default maximum number of filter conditions processed per call.
pub const DEFAULT_FILTER_LIMIT: usize = 5;

/// Default maximum number of sort conditions processed per call.
pub const DEFAULT_SORT_LIMIT: usize = 2;

/// Declarative join description for one named relation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RelationConfig {
    /// Ordered join chain; each pair is `("left.col", "right.col")`.
    pub chain: Vec<(String, String)>,

    /// Columns or expressions the join contributes to the select list.
    /// Entries of the form `source AS alias` feed the alias map.
    pub select: Vec<String>,

    /// Aliases/columns filterable through this relation.
    pub filterable: Vec<String>,

    /// Aliases/columns sortable through this relation.
    pub sortable: Vec<String>,

    /// Tables whose soft-deleted rows are excluded when this chain applies.
    pub soft_delete: Vec<String>,

    /// Join type used for every hop of the chain.
    pub join_type: JoinType,
}

/// Repository-level compiler configuration.
///
/// The allow-lists are the authorization boundary: a column name absent
/// from them is silently dropped when referenced from a query string.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Base table of the repository's model.
    pub table: String,

    /// Attributes excluded from the auto-selected visible columns.
    pub hidden: Vec<String>,

    /// Soft-delete timestamp column, excluded from visible columns and
    /// used for join guards.
    pub soft_delete_column: String,

    /// Directly filterable columns.
    pub filterable: Vec<String>,

    /// Directly sortable columns.
    pub sortable: Vec<String>,

    /// Columns covered by the flat OR-LIKE search.
    pub searchable: Vec<String>,

    /// Maximum filter conditions processed per call.
    pub filter_limit: usize,

    /// Maximum sort conditions processed per call.
    pub sort_limit: usize,

    /// Named relations reachable from query strings.
    pub relations: HashMap<String, RelationConfig>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            table: String::new(),
            hidden: Vec::new(),
            soft_delete_column: "deleted_at".to_string(),
            filterable: Vec::new(),
            sortable: Vec::new(),
            searchable: Vec::new(),
            filter_limit: DEFAULT_FILTER_LIMIT,
            sort_limit: DEFAULT_SORT_LIMIT,
            relations: HashMap::new(),
        }
    }
}

impl RepositoryConfig {
    /// Validate the parts that are configuration bugs when wrong.
    ///
    /// Relation chains are deliberately not validated here: malformed
    /// pairs are dropped at resolution time, per the tolerant input
    /// contract.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !IDENTIFIER.is_match(&self.table) {
            return Err(ConfigError::InvalidConfig(format!(
                "invalid base table name: {:?}",
                self.table
            )));
        }
        if !IDENTIFIER.is_match(&self.soft_delete_column) {
            return Err(ConfigError::InvalidConfig(format!(
                "invalid soft-delete column name: {:?}",
                self.soft_delete_column
            )));
        }
        Ok(())
    }

    pub fn relation(&self, name: &str) -> Option<&RelationConfig> {
        self.relations.get(name)
    }
}

/// On-disk project document: repository configuration plus the static
/// schema the CLI compiles against.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Project {
    pub repository: RepositoryConfig,
    pub schema: StaticSchema,
}

impl Project {
    /// Load and validate a project from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a project from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let project: Project = toml::from_str(content)?;
        project.repository.validate()?;
        Ok(project)
    }
}
