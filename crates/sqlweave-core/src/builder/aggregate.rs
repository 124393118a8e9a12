//! COUNT and EXISTS probes.

use super::where_clause::push_where;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::ident::validate_identifier;
use crate::value::{SqlValue, ValueMap};

/// Builds `SELECT COUNT(*) FROM <table> [WHERE ...]`.
///
/// # Errors
///
/// Returns [`crate::BuildError::InvalidIdentifier`] for a bad table or column
/// name.
pub fn count_sql(
    dialect: Dialect,
    table: &str,
    predicate: &ValueMap,
) -> Result<(String, Vec<SqlValue>)> {
    validate_identifier(table)?;
    let mut sql = format!("SELECT COUNT(*) FROM {}", dialect.quote_identifier(table));
    let mut args = Vec::new();
    push_where(&mut sql, &mut args, dialect, predicate)?;
    Ok((sql, args))
}

/// Builds `SELECT 1 FROM <table> [WHERE ...] LIMIT 1`.
///
/// The engine can stop at the first match instead of counting them all.
///
/// # Errors
///
/// Returns [`crate::BuildError::InvalidIdentifier`] for a bad table or column
/// name.
pub fn exists_sql(
    dialect: Dialect,
    table: &str,
    predicate: &ValueMap,
) -> Result<(String, Vec<SqlValue>)> {
    validate_identifier(table)?;
    let mut sql = format!("SELECT 1 FROM {}", dialect.quote_identifier(table));
    let mut args = Vec::new();
    push_where(&mut sql, &mut args, dialect, predicate)?;
    sql.push_str(" LIMIT 1");
    Ok((sql, args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;

    #[test]
    fn test_count_all() {
        let (sql, args) = count_sql(Dialect::Sqlite, "users", &ValueMap::new()).unwrap();
        assert_eq!(sql, "SELECT COUNT(*) FROM \"users\"");
        assert!(args.is_empty());
    }

    #[test]
    fn test_count_filtered() {
        let mut predicate = ValueMap::new();
        predicate.insert("status".into(), SqlValue::from("open"));
        let (sql, args) = count_sql(Dialect::Postgres, "tasks", &predicate).unwrap();
        assert_eq!(sql, "SELECT COUNT(*) FROM \"tasks\" WHERE \"status\" = $1");
        assert_eq!(args, vec![SqlValue::from("open")]);
    }

    #[test]
    fn test_exists() {
        let mut predicate = ValueMap::new();
        predicate.insert("email".into(), SqlValue::from("a@example.com"));
        let (sql, _) = exists_sql(Dialect::MySql, "users", &predicate).unwrap();
        assert_eq!(sql, "SELECT 1 FROM `users` WHERE `email` = ? LIMIT 1");
    }

    #[test]
    fn test_bad_table() {
        assert!(matches!(
            count_sql(Dialect::Sqlite, "users--", &ValueMap::new()),
            Err(BuildError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            exists_sql(Dialect::Sqlite, "from", &ValueMap::new()),
            Err(BuildError::InvalidIdentifier { .. })
        ));
    }
}
