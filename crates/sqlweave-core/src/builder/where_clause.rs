//! Equality / IS NULL predicate rendering shared by every statement builder.

use crate::dialect::Dialect;
use crate::error::Result;
use crate::ident::validate_identifier;
use crate::value::{SqlValue, ValueMap};

/// Renders `predicate` as `col = <placeholder>` / `col IS NULL` conditions
/// joined by `AND`, without the `WHERE` keyword.
///
/// Conditions appear in ascending column order. `start` is the 1-based index
/// of the first placeholder; Postgres numbers placeholders across the whole
/// statement, so callers pass one more than the number of arguments already
/// bound. A `Null` value renders `IS NULL` and binds nothing.
///
/// Returns an empty string and no arguments for an empty predicate.
///
/// # Errors
///
/// Returns [`crate::BuildError::InvalidIdentifier`] for a bad column name.
pub fn where_clause(
    dialect: Dialect,
    predicate: &ValueMap,
    start: usize,
) -> Result<(String, Vec<SqlValue>)> {
    let mut conditions = Vec::with_capacity(predicate.len());
    let mut args = Vec::new();

    for (column, value) in predicate {
        validate_identifier(column)?;
        let column = dialect.quote_identifier(column);
        if value.is_null() {
            conditions.push(format!("{column} IS NULL"));
        } else {
            args.push(value.clone());
            conditions.push(format!(
                "{column} = {}",
                dialect.placeholder(start + args.len() - 1)
            ));
        }
    }

    Ok((conditions.join(" AND "), args))
}

/// Appends ` WHERE <conditions>` to `sql` and the bound values to `args`,
/// numbering placeholders after the arguments already in `args`. Does nothing
/// for an empty predicate.
pub(crate) fn push_where(
    sql: &mut String,
    args: &mut Vec<SqlValue>,
    dialect: Dialect,
    predicate: &ValueMap,
) -> Result<()> {
    let (conditions, where_args) = where_clause(dialect, predicate, args.len() + 1)?;
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions);
        args.extend(where_args);
    }
    Ok(())
}
