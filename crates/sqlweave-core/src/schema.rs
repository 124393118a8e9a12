//! Table, column, index and foreign-key descriptions.
//!
//! These are plain value objects. [`TableDefinition::validate`] checks the
//! whole description at once, before any statement is rendered.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, Result};
use crate::ident::validate_identifier;
use crate::types::ColumnType;

/// Maximum number of columns in one table.
pub const MAX_COLUMNS: usize = 64;

/// A column in a table description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Portable column type.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Whether this column is the primary key.
    #[serde(default)]
    pub primary_key: bool,
    /// Whether NULL is rejected.
    #[serde(default)]
    pub not_null: bool,
    /// Whether values must be unique.
    #[serde(default)]
    pub unique: bool,
    /// Default value, written into the DDL as an escaped string literal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ColumnDefinition {
    /// Creates a nullable column without constraints.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            primary_key: false,
            not_null: false,
            unique: false,
            default: None,
        }
    }

    /// Marks the column as the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Marks the column UNIQUE.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets the default literal.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// An index declared as part of a table.
///
/// The index name is derived from the table and columns, see
/// [`crate::ddl::index_name`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Indexed columns, in order.
    pub columns: Vec<String>,
    /// Whether the index is unique.
    #[serde(default)]
    pub unique: bool,
}

impl IndexDefinition {
    /// Creates a non-unique index over `columns`.
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
        }
    }

    /// Makes the index unique.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Referential action taken when the referenced row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OnDelete {
    /// Delete referencing rows.
    Cascade,
    /// Set the referencing column to NULL.
    SetNull,
    /// Reject the delete.
    Restrict,
}

impl OnDelete {
    /// Returns the SQL keyword(s) for the action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::Restrict => "RESTRICT",
        }
    }

    /// Parses `CASCADE`, `SET NULL` or `RESTRICT`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::SchemaInvariantViolation`] for any other action.
    pub fn parse(action: &str) -> Result<Self> {
        match action.trim().to_ascii_uppercase().as_str() {
            "CASCADE" => Ok(Self::Cascade),
            "SET NULL" => Ok(Self::SetNull),
            "RESTRICT" => Ok(Self::Restrict),
            _ => Err(BuildError::schema(format!(
                "invalid ON DELETE action '{action}': expected CASCADE, SET NULL or RESTRICT"
            ))),
        }
    }
}

impl fmt::Display for OnDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for OnDelete {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OnDelete {
    type Error = BuildError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<OnDelete> for String {
    fn from(action: OnDelete) -> Self {
        action.as_sql().to_string()
    }
}

/// A single-column foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDefinition {
    /// Local column.
    pub column: String,
    /// Referenced table.
    pub referenced_table: String,
    /// Referenced column.
    pub referenced_column: String,
    /// Action on delete of the referenced row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<OnDelete>,
}

impl ForeignKeyDefinition {
    /// Creates a foreign key from `column` to `referenced_table.referenced_column`.
    #[must_use]
    pub fn new(
        column: impl Into<String>,
        referenced_table: impl Into<String>,
        referenced_column: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            referenced_table: referenced_table.into(),
            referenced_column: referenced_column.into(),
            on_delete: None,
        }
    }

    /// Sets the ON DELETE action.
    #[must_use]
    pub const fn on_delete(mut self, action: OnDelete) -> Self {
        self.on_delete = Some(action);
        self
    }
}

/// A complete table description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Table name.
    pub table: String,
    /// Columns, in declaration order.
    pub columns: Vec<ColumnDefinition>,
    /// Indexes created after the table.
    #[serde(default)]
    pub indexes: Vec<IndexDefinition>,
    /// Foreign keys, rendered after the columns.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyDefinition>,
    /// Whether to add `IF NOT EXISTS` to the table and its indexes.
    #[serde(default)]
    pub if_not_exists: bool,
}

impl TableDefinition {
    /// Creates an empty table description.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
            if_not_exists: false,
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds an index.
    #[must_use]
    pub fn index(mut self, index: IndexDefinition) -> Self {
        self.indexes.push(index);
        self
    }

    /// Adds a foreign key.
    #[must_use]
    pub fn foreign_key(mut self, fk: ForeignKeyDefinition) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Sets `IF NOT EXISTS`.
    #[must_use]
    pub const fn if_not_exists(mut self, enabled: bool) -> Self {
        self.if_not_exists = enabled;
        self
    }

    /// Returns the primary key column, if exactly one is declared.
    #[must_use]
    pub fn primary_key(&self) -> Option<&ColumnDefinition> {
        let mut pks = self.columns.iter().filter(|c| c.primary_key);
        match (pks.next(), pks.next()) {
            (Some(pk), None) => Some(pk),
            _ => None,
        }
    }

    /// Returns true if a column with this name is declared.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Validates the whole description.
    ///
    /// Pure and repeatable: validating the same description twice gives the
    /// same answer.
    ///
    /// # Errors
    ///
    /// - [`BuildError::InvalidIdentifier`] for a bad table, column or
    ///   referenced name.
    /// - [`BuildError::SchemaInvariantViolation`] for zero or too many
    ///   columns, duplicate column names, a primary key count other than one,
    ///   or a foreign key or index naming an undeclared column.
    pub fn validate(&self) -> Result<()> {
        validate_identifier(&self.table)?;

        if self.columns.is_empty() {
            return Err(BuildError::schema(format!(
                "table '{}' must have at least one column",
                self.table
            )));
        }
        if self.columns.len() > MAX_COLUMNS {
            return Err(BuildError::schema(format!(
                "table '{}' has {} columns, maximum is {MAX_COLUMNS}",
                self.table,
                self.columns.len()
            )));
        }

        let mut seen = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            validate_identifier(&column.name)?;
            if !seen.insert(column.name.as_str()) {
                return Err(BuildError::schema(format!(
                    "duplicate column '{}' in table '{}'",
                    column.name, self.table
                )));
            }
        }

        let pk_count = self.columns.iter().filter(|c| c.primary_key).count();
        if pk_count != 1 {
            return Err(BuildError::schema(format!(
                "table '{}' must have exactly one primary key column, found {pk_count}",
                self.table
            )));
        }

        for fk in &self.foreign_keys {
            if !self.has_column(&fk.column) {
                return Err(BuildError::schema(format!(
                    "foreign key column '{}' is not a column of table '{}'",
                    fk.column, self.table
                )));
            }
            validate_identifier(&fk.referenced_table)?;
            validate_identifier(&fk.referenced_column)?;
        }

        for index in &self.indexes {
            if index.columns.is_empty() {
                return Err(BuildError::schema(format!(
                    "index on table '{}' must have at least one column",
                    self.table
                )));
            }
            for column in &index.columns {
                if !self.has_column(column) {
                    return Err(BuildError::schema(format!(
                        "index column '{column}' is not a column of table '{}'",
                        self.table
                    )));
                }
            }
        }

        Ok(())
    }
}
