//! MySQL binding and decoding.
//!
//! MySQL converts string and NULL parameters to the column type on its own,
//! so arguments bind as their natural types. Cells decode by column type;
//! temporal and JSON values come back as text.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::mysql::{MySqlDatabaseError, MySqlRow};
use sqlx::types::Json;
use sqlx::{Executor, MySqlConnection, Row, Statement, TypeInfo, ValueRef};
use sqlweave_core::{RowSet, SqlValue};

use super::{bind_plain, row_set};

pub(super) async fn execute(
    conn: &mut MySqlConnection,
    sql: &str,
    args: &[SqlValue],
) -> Result<u64, sqlx::Error> {
    let result = bind_plain(sqlx::query(sql), args).execute(conn).await?;
    Ok(result.rows_affected())
}

pub(super) async fn query(
    conn: &mut MySqlConnection,
    sql: &str,
    args: &[SqlValue],
) -> Result<RowSet, sqlx::Error> {
    let statement = (&mut *conn).prepare(sql).await?;
    let rows = bind_plain(statement.query(), args).fetch_all(conn).await?;
    row_set(statement.columns(), &rows, decode_cell)
}

/// The MySQL server error number (`ER_*`) behind `err`.
pub(super) fn error_number(err: &sqlx::Error) -> Option<u32> {
    err.as_database_error()
        .and_then(|db| db.try_downcast_ref::<MySqlDatabaseError>())
        .map(|db| u32::from(db.number()))
}

fn decode_cell(row: &MySqlRow, index: usize) -> Result<SqlValue, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(SqlValue::Null);
    }
    let value = match raw.type_info().name() {
        "BOOLEAN" => SqlValue::Bool(row.try_get(index)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            SqlValue::Int(row.try_get(index)?)
        }
        name if name.ends_with(" UNSIGNED") => {
            let v: u64 = row.try_get(index)?;
            i64::try_from(v).map_or_else(|_| SqlValue::Text(v.to_string()), SqlValue::Int)
        }
        "FLOAT" => SqlValue::Float(f64::from(row.try_get::<f32, _>(index)?)),
        "DOUBLE" => SqlValue::Float(row.try_get(index)?),
        // Exact decimals stay text rather than losing precision as f64.
        "DECIMAL" => SqlValue::Text(row.try_get_unchecked(index)?),
        "DATETIME" | "TIMESTAMP" => {
            SqlValue::Text(row.try_get::<NaiveDateTime, _>(index)?.to_string())
        }
        "DATE" => SqlValue::Text(row.try_get::<NaiveDate, _>(index)?.to_string()),
        "TIME" => SqlValue::Text(row.try_get::<NaiveTime, _>(index)?.to_string()),
        "JSON" => SqlValue::Text(row.try_get::<Json<serde_json::Value>, _>(index)?.0.to_string()),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            SqlValue::Blob(row.try_get(index)?)
        }
        _ => row
            .try_get(index)
            .map(SqlValue::Text)
            .or_else(|_| row.try_get(index).map(SqlValue::Blob))
            .unwrap_or(SqlValue::Null),
    };
    Ok(value)
}
