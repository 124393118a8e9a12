//! DELETE statement builder.
//!
//! There is no way to build a DELETE without a predicate.

use serde::{Deserialize, Serialize};

use super::where_clause::push_where;
use crate::dialect::Dialect;
use crate::error::{BuildError, Result};
use crate::ident::validate_identifier;
use crate::value::{SqlValue, ToSqlValue, ValueMap};

/// Parameters for a DELETE.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeleteParams {
    /// Target table.
    pub table: String,
    /// Equality predicate; must not be empty.
    #[serde(default, rename = "where")]
    pub filter: ValueMap,
}

impl DeleteParams {
    /// Creates a delete from `table`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filter: ValueMap::new(),
        }
    }

    /// Adds an equality condition.
    #[must_use]
    pub fn filter(mut self, column: impl Into<String>, value: impl ToSqlValue) -> Self {
        self.filter.insert(column.into(), value.to_sql_value());
        self
    }

    /// Builds the DELETE statement and returns SQL with parameters.
    ///
    /// # Errors
    ///
    /// - [`BuildError::UnsafeMutation`] if the predicate is empty.
    /// - [`BuildError::InvalidIdentifier`] for a bad table or column name.
    pub fn build(&self, dialect: Dialect) -> Result<(String, Vec<SqlValue>)> {
        if self.filter.is_empty() {
            return Err(BuildError::unsafe_mutation(format!(
                "delete from '{}' requires a WHERE predicate",
                self.table
            )));
        }
        validate_identifier(&self.table)?;

        let mut sql = format!("DELETE FROM {}", dialect.quote_identifier(&self.table));
        let mut args = Vec::with_capacity(self.filter.len());
        push_where(&mut sql, &mut args, dialect, &self.filter)?;
        Ok((sql, args))
    }
}
