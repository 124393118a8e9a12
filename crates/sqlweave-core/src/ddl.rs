//! CREATE TABLE and CREATE INDEX rendering.
//!
//! Rendering never touches a database. Executing the statements, and the one
//! dialect-specific recovery around index creation, lives with the execution
//! handle.

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::error::{BuildError, Result};
use crate::ident::validate_identifier;
use crate::schema::{ColumnDefinition, ForeignKeyDefinition, TableDefinition};
use crate::value::quote_literal;

/// Parameters for a standalone `CREATE INDEX`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexParams {
    /// Table to index.
    pub table: String,
    /// Indexed columns, in order.
    pub columns: Vec<String>,
    /// Whether the index is unique.
    #[serde(default)]
    pub unique: bool,
    /// Whether an existing index of the same name is acceptable.
    #[serde(default)]
    pub if_not_exists: bool,
}

impl IndexParams {
    /// Creates parameters for a non-unique index.
    #[must_use]
    pub fn new<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
            if_not_exists: false,
        }
    }

    /// Makes the index unique.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets `IF NOT EXISTS`.
    #[must_use]
    pub const fn if_not_exists(mut self, enabled: bool) -> Self {
        self.if_not_exists = enabled;
        self
    }
}

/// A rendered `CREATE INDEX` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStatement {
    /// Derived index name.
    pub name: String,
    /// SQL text.
    pub sql: String,
}

/// Derives the index name `idx_<table>_<col1>_<col2>...`.
///
/// The same table and columns always give the same name, which is what makes
/// repeated `IF NOT EXISTS` creation idempotent.
#[must_use]
pub fn index_name<S: AsRef<str>>(table: &str, columns: &[S]) -> String {
    let mut name = format!("idx_{table}");
    for column in columns {
        name.push('_');
        name.push_str(column.as_ref());
    }
    name
}

/// Renders `CREATE TABLE` for a validated description.
///
/// Columns come first in declaration order, followed by one `FOREIGN KEY`
/// clause per foreign key. Indexes are not part of this statement, see
/// [`table_index_params`].
///
/// # Errors
///
/// Any error from [`TableDefinition::validate`].
pub fn create_table_sql(dialect: Dialect, def: &TableDefinition) -> Result<String> {
    def.validate()?;

    let mut sql = String::from("CREATE TABLE ");
    if def.if_not_exists {
        sql.push_str("IF NOT EXISTS ");
    }
    sql.push_str(&dialect.quote_identifier(&def.table));
    sql.push_str(" (");

    let mut parts: Vec<String> = def
        .columns
        .iter()
        .map(|c| column_definition(dialect, c))
        .collect();
    parts.extend(
        def.foreign_keys
            .iter()
            .map(|fk| foreign_key_clause(dialect, fk)),
    );
    sql.push_str(&parts.join(", "));

    sql.push(')');
    Ok(sql)
}

/// Returns one [`IndexParams`] per declared index, inheriting the table's
/// `if_not_exists`.
#[must_use]
pub fn table_index_params(def: &TableDefinition) -> Vec<IndexParams> {
    def.indexes
        .iter()
        .map(|index| IndexParams {
            table: def.table.clone(),
            columns: index.columns.clone(),
            unique: index.unique,
            if_not_exists: def.if_not_exists,
        })
        .collect()
}

/// Renders `CREATE [UNIQUE] INDEX [IF NOT EXISTS] <name> ON <table> (<cols>)`.
///
/// MySQL has no `IF NOT EXISTS` for indexes, so the clause is left out there
/// regardless of `if_not_exists`.
///
/// # Errors
///
/// - [`BuildError::InvalidIdentifier`] for a bad table or column name.
/// - [`BuildError::SchemaInvariantViolation`] if no columns are given.
pub fn create_index_sql(dialect: Dialect, params: &IndexParams) -> Result<IndexStatement> {
    validate_identifier(&params.table)?;
    if params.columns.is_empty() {
        return Err(BuildError::schema(format!(
            "index on table '{}' must have at least one column",
            params.table
        )));
    }
    for column in &params.columns {
        validate_identifier(column)?;
    }

    let name = index_name(&params.table, params.columns.as_slice());

    let mut sql = String::from("CREATE ");
    if params.unique {
        sql.push_str("UNIQUE ");
    }
    sql.push_str("INDEX ");
    if params.if_not_exists && dialect.supports_index_if_not_exists() {
        sql.push_str("IF NOT EXISTS ");
    }
    sql.push_str(&dialect.quote_identifier(&name));
    sql.push_str(" ON ");
    sql.push_str(&dialect.quote_identifier(&params.table));
    sql.push_str(" (");
    let cols: Vec<String> = params
        .columns
        .iter()
        .map(|c| dialect.quote_identifier(c))
        .collect();
    sql.push_str(&cols.join(", "));
    sql.push(')');

    Ok(IndexStatement { name, sql })
}

fn column_definition(dialect: Dialect, col: &ColumnDefinition) -> String {
    let mut sql = format!(
        "{} {}",
        dialect.quote_identifier(&col.name),
        col.column_type.sql_type(dialect)
    );

    if col.not_null {
        sql.push_str(" NOT NULL");
    }
    if col.primary_key {
        sql.push_str(" PRIMARY KEY");
    } else if col.unique {
        sql.push_str(" UNIQUE");
    }
    if let Some(ref default) = col.default {
        sql.push_str(" DEFAULT ");
        sql.push_str(&quote_literal(default));
    }

    sql
}

fn foreign_key_clause(dialect: Dialect, fk: &ForeignKeyDefinition) -> String {
    let mut sql = format!(
        "FOREIGN KEY ({}) REFERENCES {} ({})",
        dialect.quote_identifier(&fk.column),
        dialect.quote_identifier(&fk.referenced_table),
        dialect.quote_identifier(&fk.referenced_column),
    );
    if let Some(action) = fk.on_delete {
        sql.push_str(" ON DELETE ");
        sql.push_str(action.as_sql());
    }
    sql
}
