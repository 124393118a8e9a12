//! SQLite binding and decoding.
//!
//! SQLite is dynamically typed: every value carries its own storage class,
//! and cells decode by that class rather than by the declared column type.

use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, SqliteConnection, Statement, TypeInfo, ValueRef};
use sqlweave_core::{RowSet, SqlValue};

use super::{bind_plain, row_set};

pub(super) async fn execute(
    conn: &mut SqliteConnection,
    sql: &str,
    args: &[SqlValue],
) -> Result<u64, sqlx::Error> {
    let result = bind_plain(sqlx::query(sql), args).execute(conn).await?;
    Ok(result.rows_affected())
}

pub(super) async fn query(
    conn: &mut SqliteConnection,
    sql: &str,
    args: &[SqlValue],
) -> Result<RowSet, sqlx::Error> {
    let statement = (&mut *conn).prepare(sql).await?;
    let rows = bind_plain(statement.query(), args).fetch_all(conn).await?;
    row_set(statement.columns(), &rows, decode_cell)
}

pub(super) const fn error_number(_err: &sqlx::Error) -> Option<u32> {
    None
}

fn decode_cell(row: &SqliteRow, index: usize) -> Result<SqlValue, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(SqlValue::Null);
    }
    let value = match raw.type_info().name() {
        "INTEGER" => SqlValue::Int(row.try_get(index)?),
        "REAL" => SqlValue::Float(row.try_get(index)?),
        "BLOB" => SqlValue::Blob(row.try_get(index)?),
        _ => SqlValue::Text(row.try_get(index)?),
    };
    Ok(value)
}
