//! PostgreSQL binding and decoding.
//!
//! Parameters travel in binary format, so each one must be encoded as
//! exactly the type the server expects. Every statement is prepared first
//! (the prepare is cached per connection) and each argument is coerced to
//! the type PostgreSQL inferred for its placeholder: a NULL is sent as a
//! NULL of that type, text becomes a timestamp or JSON document when the
//! column wants one, and integers narrow to `INT2`/`INT4`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::encode::{Encode, IsNull};
use sqlx::error::BoxDynError;
use sqlx::postgres::types::Oid;
use sqlx::postgres::{PgArgumentBuffer, PgArguments, PgRow, PgStatement, PgTypeInfo};
use sqlx::query::Query;
use sqlx::types::Json;
use sqlx::{Either, Executor, PgConnection, Postgres, Row, Statement, Type, TypeInfo, ValueRef};
use sqlweave_core::{RowSet, SqlValue};

use super::row_set;

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Text layouts accepted for `TIMESTAMP` parameters, besides RFC 3339.
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

pub(super) async fn execute(
    conn: &mut PgConnection,
    sql: &str,
    args: &[SqlValue],
) -> Result<u64, sqlx::Error> {
    let statement = (&mut *conn).prepare_with(sql, &[]).await?;
    let query = bind_args(statement.query(), parameter_types(&statement), args)?;
    Ok(query.execute(conn).await?.rows_affected())
}

pub(super) async fn query(
    conn: &mut PgConnection,
    sql: &str,
    args: &[SqlValue],
) -> Result<RowSet, sqlx::Error> {
    let statement = (&mut *conn).prepare_with(sql, &[]).await?;
    let query = bind_args(statement.query(), parameter_types(&statement), args)?;
    let rows = query.fetch_all(conn).await?;
    row_set(statement.columns(), &rows, decode_cell)
}

/// PostgreSQL reports SQLSTATE codes, not error numbers.
pub(super) const fn error_number(_err: &sqlx::Error) -> Option<u32> {
    None
}

/// Placeholder types inferred by the server while preparing.
fn parameter_types<'s>(statement: &'s PgStatement<'_>) -> &'s [PgTypeInfo] {
    match statement.parameters() {
        Some(Either::Left(types)) => types,
        _ => &[],
    }
}

fn bind_args<'q>(
    mut query: PgQuery<'q>,
    types: &[PgTypeInfo],
    args: &[SqlValue],
) -> Result<PgQuery<'q>, sqlx::Error> {
    for (i, value) in args.iter().enumerate() {
        let ty = types.get(i);
        let param = match value {
            SqlValue::Null => PgParam::Null(PgNull(ty.cloned())),
            other => PgParam::coerce(other, ty.map_or("", TypeInfo::name)).map_err(|reason| {
                sqlx::Error::Encode(format!("parameter ${}: {reason}", i + 1).into())
            })?,
        };
        query = param.bind(query);
    }
    Ok(query)
}

/// A NULL typed as whatever its placeholder expects.
///
/// Without a known type it goes out as oid 0 (unspecified), leaving the
/// choice to the server.
#[derive(Debug, Clone, PartialEq)]
struct PgNull(Option<PgTypeInfo>);

impl Type<Postgres> for PgNull {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_oid(Oid(0))
    }
}

impl Encode<'_, Postgres> for PgNull {
    fn encode_by_ref(&self, _buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        Ok(IsNull::Yes)
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        self.0.clone()
    }
}

/// An argument converted to the Rust type matching its placeholder.
#[derive(Debug, Clone, PartialEq)]
enum PgParam {
    Null(PgNull),
    Bool(bool),
    Int2(i16),
    Int4(i32),
    Int8(i64),
    Float4(f32),
    Float8(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(NaiveDateTime),
    Timestamptz(DateTime<Utc>),
    Date(NaiveDate),
    Time(NaiveTime),
    Json(serde_json::Value),
}

impl PgParam {
    /// Converts a non-NULL value for a placeholder of type `ty` (an empty
    /// name when unknown).
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn coerce(value: &SqlValue, ty: &str) -> Result<Self, String> {
        let param = match (value, ty) {
            (SqlValue::Null, _) => Self::Null(PgNull(None)),

            (SqlValue::Bool(b), "INT2") => Self::Int2(i16::from(*b)),
            (SqlValue::Bool(b), "INT4") => Self::Int4(i32::from(*b)),
            (SqlValue::Bool(b), "INT8") => Self::Int8(i64::from(*b)),
            (SqlValue::Bool(b), "JSON" | "JSONB") => Self::Json((*b).into()),
            (SqlValue::Bool(b), ty) if is_text(ty) => Self::Text(b.to_string()),
            (SqlValue::Bool(b), _) => Self::Bool(*b),

            (SqlValue::Int(i), "BOOL") => Self::Bool(*i != 0),
            (SqlValue::Int(i), "INT2") => {
                Self::Int2(i16::try_from(*i).map_err(|_| format!("{i} does not fit INT2"))?)
            }
            (SqlValue::Int(i), "INT4") => {
                Self::Int4(i32::try_from(*i).map_err(|_| format!("{i} does not fit INT4"))?)
            }
            (SqlValue::Int(i), "FLOAT4") => Self::Float4(*i as f32),
            (SqlValue::Int(i), "FLOAT8") => Self::Float8(*i as f64),
            (SqlValue::Int(i), "TIMESTAMP" | "TIMESTAMPTZ") => {
                let at = DateTime::from_timestamp(*i, 0)
                    .ok_or_else(|| format!("{i} is not a valid unix timestamp"))?;
                if ty == "TIMESTAMP" {
                    Self::Timestamp(at.naive_utc())
                } else {
                    Self::Timestamptz(at)
                }
            }
            (SqlValue::Int(i), "JSON" | "JSONB") => Self::Json((*i).into()),
            (SqlValue::Int(i), ty) if is_text(ty) => Self::Text(i.to_string()),
            (SqlValue::Int(i), _) => Self::Int8(*i),

            (SqlValue::Float(f), "FLOAT4") => Self::Float4(*f as f32),
            (SqlValue::Float(f), "JSON" | "JSONB") => Self::Json((*f).into()),
            (SqlValue::Float(f), ty) if is_text(ty) => Self::Text(f.to_string()),
            (SqlValue::Float(f), "INT2" | "INT4" | "INT8" | "BOOL") => {
                return Err(format!("cannot store the real {f} in {ty}"));
            }
            (SqlValue::Float(f), _) => Self::Float8(*f),

            (SqlValue::Text(s), ty) => Self::parse_text(s, ty)?,

            (SqlValue::Blob(b), ty) if is_text(ty) => Self::Text(
                String::from_utf8(b.clone()).map_err(|_| format!("blob is not valid UTF-8 for {ty}"))?,
            ),
            (SqlValue::Blob(b), _) => Self::Bytes(b.clone()),
        };
        Ok(param)
    }

    /// Parses text into the placeholder's type. Unrecognized types keep the
    /// text as is.
    fn parse_text(s: &str, ty: &str) -> Result<Self, String> {
        let invalid = || format!("'{s}' is not a valid {ty}");
        let param = match ty {
            "BOOL" => Self::Bool(parse_bool(s).ok_or_else(invalid)?),
            "INT2" => Self::Int2(s.trim().parse().map_err(|_| invalid())?),
            "INT4" => Self::Int4(s.trim().parse().map_err(|_| invalid())?),
            "INT8" => Self::Int8(s.trim().parse().map_err(|_| invalid())?),
            "FLOAT4" => Self::Float4(s.trim().parse().map_err(|_| invalid())?),
            "FLOAT8" => Self::Float8(s.trim().parse().map_err(|_| invalid())?),
            "TIMESTAMP" => Self::Timestamp(parse_timestamp(s).ok_or_else(invalid)?),
            "TIMESTAMPTZ" => Self::Timestamptz(parse_timestamptz(s).ok_or_else(invalid)?),
            "DATE" => Self::Date(NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| invalid())?),
            "TIME" => Self::Time(NaiveTime::parse_from_str(s, "%H:%M:%S%.f").map_err(|_| invalid())?),
            "JSON" | "JSONB" => {
                Self::Json(serde_json::from_str(s).map_err(|e| format!("invalid JSON: {e}"))?)
            }
            "BYTEA" => Self::Bytes(s.as_bytes().to_vec()),
            _ => Self::Text(s.to_string()),
        };
        Ok(param)
    }

    fn bind(self, query: PgQuery<'_>) -> PgQuery<'_> {
        match self {
            Self::Null(null) => query.bind(null),
            Self::Bool(v) => query.bind(v),
            Self::Int2(v) => query.bind(v),
            Self::Int4(v) => query.bind(v),
            Self::Int8(v) => query.bind(v),
            Self::Float4(v) => query.bind(v),
            Self::Float8(v) => query.bind(v),
            Self::Text(v) => query.bind(v),
            Self::Bytes(v) => query.bind(v),
            Self::Timestamp(v) => query.bind(v),
            Self::Timestamptz(v) => query.bind(v),
            Self::Date(v) => query.bind(v),
            Self::Time(v) => query.bind(v),
            Self::Json(v) => query.bind(Json(v)),
        }
    }
}

fn is_text(ty: &str) -> bool {
    matches!(ty, "TEXT" | "VARCHAR" | "CHAR" | "NAME")
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|at| at.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// RFC 3339 text, or a zone-less timestamp taken as UTC.
fn parse_timestamptz(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|at| at.with_timezone(&Utc))
        .or_else(|| parse_timestamp(s).map(|naive| naive.and_utc()))
}

/// Decodes one cell by its column type. Temporal and JSON values come back
/// as text; types with no scalar counterpart (`NUMERIC`, `UUID`, ...) come
/// back as text when the driver can read them as such and `Null` otherwise.
fn decode_cell(row: &PgRow, index: usize) -> Result<SqlValue, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(SqlValue::Null);
    }
    let value = match raw.type_info().name() {
        "BOOL" => SqlValue::Bool(row.try_get(index)?),
        "INT2" => SqlValue::Int(i64::from(row.try_get::<i16, _>(index)?)),
        "INT4" => SqlValue::Int(i64::from(row.try_get::<i32, _>(index)?)),
        "INT8" => SqlValue::Int(row.try_get(index)?),
        "FLOAT4" => SqlValue::Float(f64::from(row.try_get::<f32, _>(index)?)),
        "FLOAT8" => SqlValue::Float(row.try_get(index)?),
        "BYTEA" => SqlValue::Blob(row.try_get(index)?),
        "TIMESTAMP" => SqlValue::Text(row.try_get::<NaiveDateTime, _>(index)?.to_string()),
        "TIMESTAMPTZ" => SqlValue::Text(row.try_get::<DateTime<Utc>, _>(index)?.to_rfc3339()),
        "DATE" => SqlValue::Text(row.try_get::<NaiveDate, _>(index)?.to_string()),
        "TIME" => SqlValue::Text(row.try_get::<NaiveTime, _>(index)?.to_string()),
        "JSON" | "JSONB" => SqlValue::Text(row.try_get::<serde_json::Value, _>(index)?.to_string()),
        _ => row
            .try_get(index)
            .map_or(SqlValue::Null, SqlValue::Text),
    };
    Ok(value)
}
