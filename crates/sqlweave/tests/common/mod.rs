//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::borrow::Cow;
use std::collections::VecDeque;
use std::error::Error as StdError;

use sqlweave::{RowSet, SqlHandle, SqlValue};
use sqlx::error::{DatabaseError, ErrorKind};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{MySqlPool, PgPool, SqlitePool};

/// A failure scripted into [`MockHandle`].
#[derive(Debug, Clone)]
pub enum Failure {
    /// A driver-level failure with no server error number.
    Protocol(String),
    /// A server error carrying an engine error number.
    Server { number: u32, message: String },
}

/// Server error raised by [`MockHandle`], shaped like a driver's database
/// error.
#[derive(Debug, thiserror::Error)]
#[error("error returned from database: {number}: {message}")]
pub struct MockDbError {
    pub number: u32,
    pub message: String,
}

impl DatabaseError for MockDbError {
    fn message(&self) -> &str {
        &self.message
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(self.number.to_string()))
    }

    fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// A handle that records every statement and replays scripted results.
#[derive(Debug, Default)]
pub struct MockHandle {
    /// Statements passed to `execute`, in call order.
    pub executed: Vec<(String, Vec<SqlValue>)>,
    /// Statements passed to `query`, in call order.
    pub queried: Vec<(String, Vec<SqlValue>)>,
    /// Per-call outcomes for `execute`; `Some` fails with that failure.
    pub execute_failures: VecDeque<Option<Failure>>,
    /// Row sets returned by successive `query` calls; empty once exhausted.
    pub row_sets: VecDeque<RowSet>,
    /// Affected-row count reported by successful `execute` calls.
    pub affected: u64,
}

impl MockHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `execute` call fail with a driver error carrying
    /// `message` and no error number.
    pub fn fail_next_execute(&mut self, message: &str) -> &mut Self {
        self.execute_failures
            .push_back(Some(Failure::Protocol(message.to_string())));
        self
    }

    /// Makes the next `execute` call fail with server error `number`.
    pub fn fail_next_execute_with_number(&mut self, number: u32, message: &str) -> &mut Self {
        self.execute_failures.push_back(Some(Failure::Server {
            number,
            message: message.to_string(),
        }));
        self
    }

    /// Makes the next `execute` call succeed.
    pub fn succeed_next_execute(&mut self) -> &mut Self {
        self.execute_failures.push_back(None);
        self
    }

    /// Queues a row set for the next `query` call.
    pub fn push_rows(&mut self, columns: &[&str], rows: Vec<Vec<SqlValue>>) -> &mut Self {
        let columns = columns.iter().map(|c| (*c).to_string()).collect();
        self.row_sets.push_back(RowSet::new(columns, rows));
        self
    }

    /// SQL text of every executed statement.
    pub fn executed_sql(&self) -> Vec<&str> {
        self.executed.iter().map(|(sql, _)| sql.as_str()).collect()
    }
}

impl SqlHandle for MockHandle {
    async fn execute(&mut self, sql: &str, args: &[SqlValue]) -> Result<u64, sqlx::Error> {
        self.executed.push((sql.to_string(), args.to_vec()));
        match self.execute_failures.pop_front().flatten() {
            Some(Failure::Protocol(message)) => Err(sqlx::Error::Protocol(message)),
            Some(Failure::Server { number, message }) => {
                Err(sqlx::Error::Database(Box::new(MockDbError { number, message })))
            }
            None => Ok(self.affected),
        }
    }

    async fn query(&mut self, sql: &str, args: &[SqlValue]) -> Result<RowSet, sqlx::Error> {
        self.queried.push((sql.to_string(), args.to_vec()));
        Ok(self.row_sets.pop_front().unwrap_or_default())
    }

    fn error_number(err: &sqlx::Error) -> Option<u32> {
        err.as_database_error()
            .and_then(|db| db.try_downcast_ref::<MockDbError>())
            .map(|db| db.number)
    }
}

/// Opens a single-connection in-memory SQLite pool.
///
/// One connection keeps every statement on the same in-memory database.
pub async fn sqlite_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite")
}

/// `DATABASE_URL`, if it starts with one of `schemes`.
fn database_url(schemes: &[&str]) -> Option<String> {
    let url = std::env::var("DATABASE_URL").ok()?;
    schemes
        .iter()
        .any(|scheme| url.starts_with(scheme))
        .then_some(url)
}

/// Connects to the PostgreSQL server named by `DATABASE_URL`, or returns
/// `None` when it names no such server.
pub async fn postgres_pool() -> Option<PgPool> {
    let url = database_url(&["postgres://", "postgresql://"])?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to PostgreSQL");
    Some(pool)
}

/// Connects to the MySQL server named by `DATABASE_URL`, or returns `None`
/// when it names no such server.
pub async fn mysql_pool() -> Option<MySqlPool> {
    let url = database_url(&["mysql://"])?;
    let pool = MySqlPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to MySQL");
    Some(pool)
}

/// Drops `quoted_table` so a test starts from a clean server.
pub async fn drop_table<H: SqlHandle>(handle: &mut H, quoted_table: &str) {
    SqlHandle::execute(handle, &format!("DROP TABLE IF EXISTS {quoted_table}"), &[])
        .await
        .expect("Failed to drop table");
}
