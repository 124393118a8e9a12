//! The execution seam.
//!
//! Builders only ever talk to a database through [`SqlHandle`]: one call to
//! run a statement, one call to fetch rows. For each of the native sqlx
//! drivers (`Sqlite`, `MySql`, `Postgres`) the pool, a single connection, a
//! pooled connection and an open transaction all implement it, so any of
//! them can be passed to the entry points and they behave identically.
//!
//! Each driver binds and decodes with its own type system. PostgreSQL in
//! particular prepares every statement first and binds each argument as the
//! type the server inferred for its placeholder, so a NULL or a text value
//! can be written to a `BIGINT`, `TIMESTAMP` or `JSONB` column.

use std::future::Future;

use sqlx::pool::PoolConnection;
use sqlx::query::Query;
use sqlx::{Column, Database, Encode, Pool, Row, Transaction, Type};
use sqlweave_core::{RowSet, SqlValue};
use tracing::debug;

use crate::error::{Error, Result};

mod mysql;
mod postgres;
mod sqlite;

/// A relational client able to run parameterized statements.
///
/// Implementations bind `args` in order to the placeholders in `sql`; the
/// placeholder syntax already matches the handle's dialect.
pub trait SqlHandle: Send {
    /// Runs a statement and returns the number of affected rows.
    fn execute(
        &mut self,
        sql: &str,
        args: &[SqlValue],
    ) -> impl Future<Output = std::result::Result<u64, sqlx::Error>> + Send;

    /// Runs a query and returns its column names and rows.
    ///
    /// Column names come from the prepared statement, so they are known
    /// even when no row matches.
    fn query(
        &mut self,
        sql: &str,
        args: &[SqlValue],
    ) -> impl Future<Output = std::result::Result<RowSet, sqlx::Error>> + Send;

    /// The numeric server error code carried by `err`, if the engine has
    /// one (MySQL error numbers such as 1061).
    #[must_use]
    fn error_number(_err: &sqlx::Error) -> Option<u32> {
        None
    }
}

/// Implements [`SqlHandle`] for a driver's pool, connection, pooled
/// connection and transaction, delegating to `$driver::{execute, query,
/// error_number}` on the underlying connection.
macro_rules! impl_sql_handle {
    ($db:ty, $conn:ty, $driver:ident) => {
        impl SqlHandle for Pool<$db> {
            async fn execute(
                &mut self,
                sql: &str,
                args: &[SqlValue],
            ) -> std::result::Result<u64, sqlx::Error> {
                let mut conn = self.acquire().await?;
                $driver::execute(&mut conn, sql, args).await
            }

            async fn query(
                &mut self,
                sql: &str,
                args: &[SqlValue],
            ) -> std::result::Result<RowSet, sqlx::Error> {
                let mut conn = self.acquire().await?;
                $driver::query(&mut conn, sql, args).await
            }

            fn error_number(err: &sqlx::Error) -> Option<u32> {
                $driver::error_number(err)
            }
        }

        impl SqlHandle for $conn {
            async fn execute(
                &mut self,
                sql: &str,
                args: &[SqlValue],
            ) -> std::result::Result<u64, sqlx::Error> {
                $driver::execute(self, sql, args).await
            }

            async fn query(
                &mut self,
                sql: &str,
                args: &[SqlValue],
            ) -> std::result::Result<RowSet, sqlx::Error> {
                $driver::query(self, sql, args).await
            }

            fn error_number(err: &sqlx::Error) -> Option<u32> {
                $driver::error_number(err)
            }
        }

        impl SqlHandle for PoolConnection<$db> {
            async fn execute(
                &mut self,
                sql: &str,
                args: &[SqlValue],
            ) -> std::result::Result<u64, sqlx::Error> {
                $driver::execute(&mut **self, sql, args).await
            }

            async fn query(
                &mut self,
                sql: &str,
                args: &[SqlValue],
            ) -> std::result::Result<RowSet, sqlx::Error> {
                $driver::query(&mut **self, sql, args).await
            }

            fn error_number(err: &sqlx::Error) -> Option<u32> {
                $driver::error_number(err)
            }
        }

        impl SqlHandle for Transaction<'_, $db> {
            async fn execute(
                &mut self,
                sql: &str,
                args: &[SqlValue],
            ) -> std::result::Result<u64, sqlx::Error> {
                $driver::execute(&mut **self, sql, args).await
            }

            async fn query(
                &mut self,
                sql: &str,
                args: &[SqlValue],
            ) -> std::result::Result<RowSet, sqlx::Error> {
                $driver::query(&mut **self, sql, args).await
            }

            fn error_number(err: &sqlx::Error) -> Option<u32> {
                $driver::error_number(err)
            }
        }
    };
}

impl_sql_handle!(sqlx::Sqlite, sqlx::SqliteConnection, sqlite);
impl_sql_handle!(sqlx::MySql, sqlx::MySqlConnection, mysql);
impl_sql_handle!(sqlx::Postgres, sqlx::PgConnection, postgres);

/// Binds each value as its natural Rust type.
///
/// Enough for engines that coerce parameters to the column type themselves
/// (SQLite, MySQL).
fn bind_plain<'q, DB>(
    mut query: Query<'q, DB, <DB as Database>::Arguments<'q>>,
    args: &[SqlValue],
) -> Query<'q, DB, <DB as Database>::Arguments<'q>>
where
    DB: Database,
    bool: Encode<'q, DB> + Type<DB>,
    i64: Encode<'q, DB> + Type<DB>,
    f64: Encode<'q, DB> + Type<DB>,
    String: Encode<'q, DB> + Type<DB>,
    Vec<u8>: Encode<'q, DB> + Type<DB>,
    Option<String>: Encode<'q, DB> + Type<DB>,
{
    for value in args {
        query = match value {
            SqlValue::Null => query.bind(Option::<String>::None),
            SqlValue::Bool(b) => query.bind(*b),
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::Float(f) => query.bind(*f),
            SqlValue::Text(s) => query.bind(s.clone()),
            SqlValue::Blob(b) => query.bind(b.clone()),
        };
    }
    query
}

/// Decodes `rows` into a [`RowSet`] named by the statement's `columns`.
fn row_set<R, F>(
    columns: &[<R::Database as Database>::Column],
    rows: &[R],
    decode: F,
) -> std::result::Result<RowSet, sqlx::Error>
where
    R: Row,
    F: Fn(&R, usize) -> std::result::Result<SqlValue, sqlx::Error>,
{
    let columns = match rows.first() {
        Some(row) if columns.is_empty() => row.columns(),
        _ => columns,
    };
    let names = columns.iter().map(|c| c.name().to_string()).collect();
    let cells = rows
        .iter()
        .map(|row| (0..row.len()).map(|i| decode(row, i)).collect())
        .collect::<std::result::Result<Vec<Vec<SqlValue>>, sqlx::Error>>()?;
    Ok(RowSet::new(names, cells))
}

/// Runs a statement, logging it and wrapping a failure with its context.
pub(crate) async fn run_execute<H: SqlHandle>(
    handle: &mut H,
    operation: &'static str,
    target: &str,
    sql: &str,
    args: &[SqlValue],
) -> Result<u64> {
    debug!(operation, target, sql = %sql, args = args.len(), "Executing SQL");
    handle.execute(sql, args).await.map_err(|source| {
        debug!(operation, target, error = %source, "Statement failed");
        Error::execution(operation, target, source)
    })
}

/// Runs a query, logging it and wrapping a failure with its context.
pub(crate) async fn run_query<H: SqlHandle>(
    handle: &mut H,
    operation: &'static str,
    target: &str,
    sql: &str,
    args: &[SqlValue],
) -> Result<RowSet> {
    debug!(operation, target, sql = %sql, args = args.len(), "Running query");
    handle.query(sql, args).await.map_err(|source| {
        debug!(operation, target, error = %source, "Query failed");
        Error::execution(operation, target, source)
    })
}
