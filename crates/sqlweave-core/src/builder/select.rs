//! SELECT statement builder.

use serde::{Deserialize, Serialize};

use super::where_clause::push_where;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::ident::validate_identifier;
use crate::value::{SqlValue, ToSqlValue, ValueMap};

/// Row cap applied when no limit is given, and the ceiling for any positive
/// limit.
pub const DEFAULT_LIMIT: i64 = 10_000;

/// Order direction for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDirection {
    /// Ascending order (ASC)
    #[default]
    Asc,
    /// Descending order (DESC)
    Desc,
}

impl OrderDirection {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A single-column ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// Column to order by
    pub column: String,
    /// Order direction
    #[serde(default)]
    pub direction: OrderDirection,
}

impl OrderBy {
    /// Creates a new ascending ordering.
    #[must_use]
    pub fn asc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            direction: OrderDirection::Asc,
        }
    }

    /// Creates a new descending ordering.
    #[must_use]
    pub fn desc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            direction: OrderDirection::Desc,
        }
    }
}

/// Applies the limit policy.
///
/// - `None` or `0`: [`DEFAULT_LIMIT`]
/// - negative: unbounded (`None`)
/// - above [`DEFAULT_LIMIT`]: clamped to it
#[must_use]
pub const fn effective_limit(limit: Option<i64>) -> Option<i64> {
    match limit {
        None | Some(0) => Some(DEFAULT_LIMIT),
        Some(n) if n < 0 => None,
        Some(n) if n > DEFAULT_LIMIT => Some(DEFAULT_LIMIT),
        Some(n) => Some(n),
    }
}

/// Parameters for a SELECT.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectParams {
    /// Table to read.
    pub table: String,
    /// Columns to return; empty means `*`.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Equality predicate.
    #[serde(default, rename = "where")]
    pub filter: ValueMap,
    /// Optional ordering.
    #[serde(default)]
    pub order_by: Option<OrderBy>,
    /// Row limit, see [`effective_limit`].
    #[serde(default)]
    pub limit: Option<i64>,
    /// Rows to skip; only positive values are rendered.
    #[serde(default)]
    pub offset: Option<i64>,
}

impl SelectParams {
    /// Selects every column of `table`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Sets the column list.
    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Adds an equality condition. A `None`/`Null` value matches `IS NULL`.
    #[must_use]
    pub fn filter(mut self, column: impl Into<String>, value: impl ToSqlValue) -> Self {
        self.filter.insert(column.into(), value.to_sql_value());
        self
    }

    /// Sets the ordering.
    #[must_use]
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by = Some(order);
        self
    }

    /// Sets the limit.
    #[must_use]
    pub const fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the offset.
    #[must_use]
    pub const fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Builds the SELECT statement and returns SQL with parameters.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BuildError::InvalidIdentifier`] if the table, a
    /// selected column, a predicate column or the order column is invalid.
    pub fn build(&self, dialect: Dialect) -> Result<(String, Vec<SqlValue>)> {
        validate_identifier(&self.table)?;

        let mut sql = String::from("SELECT ");
        if self.columns.is_empty() || (self.columns.len() == 1 && self.columns[0] == "*") {
            sql.push('*');
        } else {
            let mut cols = Vec::with_capacity(self.columns.len());
            for column in &self.columns {
                validate_identifier(column)?;
                cols.push(dialect.quote_identifier(column));
            }
            sql.push_str(&cols.join(", "));
        }
        sql.push_str(" FROM ");
        sql.push_str(&dialect.quote_identifier(&self.table));

        let mut args = Vec::new();
        push_where(&mut sql, &mut args, dialect, &self.filter)?;

        if let Some(ref order) = self.order_by {
            validate_identifier(&order.column)?;
            sql.push_str(" ORDER BY ");
            sql.push_str(&dialect.quote_identifier(&order.column));
            sql.push(' ');
            sql.push_str(order.direction.as_sql());
        }

        let offset = self.offset.filter(|n| *n > 0);
        match (effective_limit(self.limit), offset) {
            (Some(limit), _) => sql.push_str(&format!(" LIMIT {limit}")),
            (None, Some(_)) => {
                if let Some(unbounded) = dialect.unbounded_limit() {
                    sql.push_str(" LIMIT ");
                    sql.push_str(unbounded);
                }
            }
            (None, None) => {}
        }
        if let Some(offset) = offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        Ok((sql, args))
    }

    /// Builds the statement with the limit forced to 1.
    ///
    /// # Errors
    ///
    /// Same as [`SelectParams::build`].
    pub fn build_one(&self, dialect: Dialect) -> Result<(String, Vec<SqlValue>)> {
        let mut params = self.clone();
        params.limit = Some(1);
        params.build(dialect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;

    #[test]
    fn test_select_star_default_limit() {
        let (sql, args) = SelectParams::new("users").build(Dialect::Sqlite).unwrap();
        assert_eq!(sql, "SELECT * FROM \"users\" LIMIT 10000");
        assert!(args.is_empty());
    }

    #[test]
    fn test_select_columns_where_order() {
        let (sql, args) = SelectParams::new("users")
            .columns(["id", "name"])
            .filter("active", true)
            .filter("role", "admin")
            .order_by(OrderBy::desc("created_at"))
            .limit(20)
            .offset(40)
            .build(Dialect::Postgres)
            .unwrap();
        assert_eq!(
            sql,
            "SELECT \"id\", \"name\" FROM \"users\" WHERE \"active\" = $1 AND \"role\" = $2 \
             ORDER BY \"created_at\" DESC LIMIT 20 OFFSET 40"
        );
        assert_eq!(args, vec![SqlValue::Bool(true), SqlValue::from("admin")]);
    }

    #[test]
    fn test_limit_policy() {
        assert_eq!(effective_limit(None), Some(DEFAULT_LIMIT));
        assert_eq!(effective_limit(Some(0)), Some(DEFAULT_LIMIT));
        assert_eq!(effective_limit(Some(-1)), None);
        assert_eq!(effective_limit(Some(999_999)), Some(DEFAULT_LIMIT));
        assert_eq!(effective_limit(Some(10_000)), Some(10_000));
        assert_eq!(effective_limit(Some(25)), Some(25));
    }

    #[test]
    fn test_negative_limit_never_renders_limit() {
        for dialect in Dialect::ALL {
            let (sql, _) = SelectParams::new("logs").limit(-1).build(dialect).unwrap();
            assert!(!sql.contains("LIMIT"), "{dialect}: {sql}");
        }
    }

    #[test]
    fn test_large_limit_is_clamped() {
        let (sql, _) = SelectParams::new("logs")
            .limit(999_999)
            .build(Dialect::MySql)
            .unwrap();
        assert_eq!(sql, "SELECT * FROM `logs` LIMIT 10000");
    }

    #[test]
    fn test_offset_without_limit_per_dialect() {
        let params = SelectParams::new("logs").limit(-1).offset(5);
        assert_eq!(
            params.build(Dialect::Sqlite).unwrap().0,
            "SELECT * FROM \"logs\" LIMIT -1 OFFSET 5"
        );
        assert_eq!(
            params.build(Dialect::MySql).unwrap().0,
            "SELECT * FROM `logs` LIMIT 18446744073709551615 OFFSET 5"
        );
        assert_eq!(
            params.build(Dialect::Postgres).unwrap().0,
            "SELECT * FROM \"logs\" OFFSET 5"
        );
    }

    #[test]
    fn test_zero_or_negative_offset_is_ignored() {
        let (sql, _) = SelectParams::new("logs").offset(0).build(Dialect::Sqlite).unwrap();
        assert_eq!(sql, "SELECT * FROM \"logs\" LIMIT 10000");
        let (sql, _) = SelectParams::new("logs").offset(-3).build(Dialect::Sqlite).unwrap();
        assert_eq!(sql, "SELECT * FROM \"logs\" LIMIT 10000");
    }

    #[test]
    fn test_build_one_forces_limit() {
        let (sql, _) = SelectParams::new("users")
            .limit(50)
            .build_one(Dialect::Sqlite)
            .unwrap();
        assert_eq!(sql, "SELECT * FROM \"users\" LIMIT 1");
    }

    #[test]
    fn test_null_filter_is_is_null() {
        let (sql, args) = SelectParams::new("users")
            .filter("deleted_at", None::<String>)
            .build(Dialect::Sqlite)
            .unwrap();
        assert_eq!(sql, "SELECT * FROM \"users\" WHERE \"deleted_at\" IS NULL LIMIT 10000");
        assert!(args.is_empty());
    }

    #[test]
    fn test_invalid_identifiers_rejected() {
        let bad_table = SelectParams::new("users u").build(Dialect::Sqlite);
        assert!(matches!(bad_table, Err(BuildError::InvalidIdentifier { .. })));

        let bad_column = SelectParams::new("users").columns(["id", "count(*)"]).build(Dialect::Sqlite);
        assert!(matches!(bad_column, Err(BuildError::InvalidIdentifier { .. })));

        let bad_order = SelectParams::new("users")
            .order_by(OrderBy::asc("id; DROP TABLE users"))
            .build(Dialect::Sqlite);
        assert!(matches!(bad_order, Err(BuildError::InvalidIdentifier { .. })));
    }

    #[test]
    fn test_deserialize_params() {
        let params: SelectParams = serde_json::from_str(
            r#"{"table": "tasks", "where": {"status": "open"}, "order_by": {"column": "priority", "direction": "DESC"}, "limit": 5}"#,
        )
        .unwrap();
        let (sql, args) = params.build(Dialect::Sqlite).unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM \"tasks\" WHERE \"status\" = ? ORDER BY \"priority\" DESC LIMIT 5"
        );
        assert_eq!(args, vec![SqlValue::from("open")]);
    }
}
