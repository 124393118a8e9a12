//! UPDATE statement builder.

use serde::{Deserialize, Serialize};

use super::where_clause::push_where;
use crate::dialect::Dialect;
use crate::error::{BuildError, Result};
use crate::ident::validate_identifier;
use crate::value::{SqlValue, ToSqlValue, ValueMap};

/// Parameters for an UPDATE.
///
/// Both maps must be non-empty: an UPDATE without a predicate would rewrite
/// every row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateParams {
    /// Target table.
    pub table: String,
    /// New column values.
    pub set: ValueMap,
    /// Equality predicate selecting the rows to change.
    #[serde(default, rename = "where")]
    pub filter: ValueMap,
}

impl UpdateParams {
    /// Creates an update of `table`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Sets a column to a new value.
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl ToSqlValue) -> Self {
        self.set.insert(column.into(), value.to_sql_value());
        self
    }

    /// Adds an equality condition.
    #[must_use]
    pub fn filter(mut self, column: impl Into<String>, value: impl ToSqlValue) -> Self {
        self.filter.insert(column.into(), value.to_sql_value());
        self
    }

    /// Builds the UPDATE statement and returns SQL with parameters.
    ///
    /// SET assignments come first in ascending column order; WHERE
    /// placeholders continue the numbering.
    ///
    /// # Errors
    ///
    /// - [`BuildError::UnsafeMutation`] if the predicate or the SET map is
    ///   empty.
    /// - [`BuildError::InvalidIdentifier`] for a bad table or column name.
    pub fn build(&self, dialect: Dialect) -> Result<(String, Vec<SqlValue>)> {
        if self.filter.is_empty() {
            return Err(BuildError::unsafe_mutation(format!(
                "update of '{}' requires a WHERE predicate",
                self.table
            )));
        }
        validate_identifier(&self.table)?;
        if self.set.is_empty() {
            return Err(BuildError::unsafe_mutation(format!(
                "update of '{}' requires at least one SET value",
                self.table
            )));
        }

        let mut assignments = Vec::with_capacity(self.set.len());
        let mut args = Vec::with_capacity(self.set.len() + self.filter.len());
        for (column, value) in &self.set {
            validate_identifier(column)?;
            args.push(value.clone());
            assignments.push(format!(
                "{} = {}",
                dialect.quote_identifier(column),
                dialect.placeholder(args.len())
            ));
        }

        let mut sql = format!(
            "UPDATE {} SET {}",
            dialect.quote_identifier(&self.table),
            assignments.join(", ")
        );
        push_where(&mut sql, &mut args, dialect, &self.filter)?;
        Ok((sql, args))
    }
}
