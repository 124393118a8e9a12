//! INSERT statement builder.

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::error::{BuildError, Result};
use crate::ident::validate_identifier;
use crate::value::{SqlValue, ToSqlValue, ValueMap};

/// Parameters for a single-row INSERT.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InsertParams {
    /// Target table.
    pub table: String,
    /// Column values; must not be empty.
    pub values: ValueMap,
}

impl InsertParams {
    /// Creates an insert into `table` with no values yet.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            values: ValueMap::new(),
        }
    }

    /// Sets a column value.
    #[must_use]
    pub fn value(mut self, column: impl Into<String>, value: impl ToSqlValue) -> Self {
        self.values.insert(column.into(), value.to_sql_value());
        self
    }

    /// Builds the INSERT statement and returns SQL with parameters.
    ///
    /// Columns are listed in ascending name order, so identical inputs always
    /// give identical SQL.
    ///
    /// # Errors
    ///
    /// - [`BuildError::InvalidIdentifier`] for a bad table or column name.
    /// - [`BuildError::UnsafeMutation`] if no values are given.
    pub fn build(&self, dialect: Dialect) -> Result<(String, Vec<SqlValue>)> {
        validate_identifier(&self.table)?;
        if self.values.is_empty() {
            return Err(BuildError::unsafe_mutation(format!(
                "insert into '{}' requires at least one value",
                self.table
            )));
        }

        let mut columns = Vec::with_capacity(self.values.len());
        let mut placeholders = Vec::with_capacity(self.values.len());
        let mut args = Vec::with_capacity(self.values.len());
        for (column, value) in &self.values {
            validate_identifier(column)?;
            columns.push(dialect.quote_identifier(column));
            args.push(value.clone());
            placeholders.push(dialect.placeholder(args.len()));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            dialect.quote_identifier(&self.table),
            columns.join(", "),
            placeholders.join(", ")
        );
        Ok((sql, args))
    }
}
