//! Command implementations that do not need a database.

use std::fs;
use std::path::Path;

use anyhow::Context;
use sqlweave::{
    create_index_sql, create_table_sql, table_index_params, BuildError, ColumnType, Dialect,
    TableDefinition,
};

/// Reads a JSON table definition from `path`.
///
/// Unknown column types and ON DELETE actions are rejected while parsing.
pub fn load_definition(path: &Path) -> anyhow::Result<TableDefinition> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let def = serde_json::from_str(&text)
        .with_context(|| format!("Invalid table definition in {}", path.display()))?;
    Ok(def)
}

/// Renders the CREATE TABLE statement followed by one CREATE INDEX per
/// declared index.
pub fn render_statements(
    dialect: Dialect,
    def: &TableDefinition,
) -> Result<Vec<String>, BuildError> {
    let mut statements = vec![create_table_sql(dialect, def)?];
    for params in table_index_params(def) {
        statements.push(create_index_sql(dialect, &params)?.sql);
    }
    Ok(statements)
}

/// Portable type names with their keyword in `dialect`.
pub fn type_listing(dialect: Dialect) -> Vec<(&'static str, &'static str)> {
    ColumnType::ALL
        .iter()
        .map(|ty| (ty.name(), ty.sql_type(dialect)))
        .collect()
}
