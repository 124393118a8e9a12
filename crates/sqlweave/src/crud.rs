//! Executing CRUD operations.
//!
//! Each function builds its statement with the matching builder from
//! [`sqlweave_core::builder`] and runs it through the handle exactly once.

use sqlweave_core::builder::{
    count_sql, exists_sql, DeleteParams, InsertParams, SelectParams, UpdateParams,
};
use sqlweave_core::{Dialect, Row, ValueMap};

use crate::error::{Error, Result};
use crate::handle::{run_execute, run_query, SqlHandle};

/// Runs a SELECT and returns every row.
///
/// # Errors
///
/// Returns [`Error::Build`] for invalid identifiers, or
/// [`Error::Execution`] if the query fails.
pub async fn select<H: SqlHandle>(
    handle: &mut H,
    dialect: Dialect,
    params: &SelectParams,
) -> Result<Vec<Row>> {
    let (sql, args) = params.build(dialect)?;
    let rows = run_query(handle, "select", &params.table, &sql, &args).await?;
    Ok(rows.into_rows())
}

/// Runs a SELECT limited to one row.
///
/// No matching row is `Ok(None)`, not an error.
///
/// # Errors
///
/// Returns [`Error::Build`] for invalid identifiers, or
/// [`Error::Execution`] if the query fails.
pub async fn select_one<H: SqlHandle>(
    handle: &mut H,
    dialect: Dialect,
    params: &SelectParams,
) -> Result<Option<Row>> {
    let (sql, args) = params.build_one(dialect)?;
    let rows = run_query(handle, "select one", &params.table, &sql, &args).await?;
    Ok(rows.into_rows().into_iter().next())
}

/// Inserts one row and returns the number of affected rows.
///
/// # Errors
///
/// Returns [`Error::Build`] for empty values or invalid identifiers, or
/// [`Error::Execution`] if the insert fails.
pub async fn insert<H: SqlHandle>(
    handle: &mut H,
    dialect: Dialect,
    params: &InsertParams,
) -> Result<u64> {
    let (sql, args) = params.build(dialect)?;
    run_execute(handle, "insert", &params.table, &sql, &args).await
}

/// Updates matching rows and returns the number of affected rows.
///
/// # Errors
///
/// Returns [`Error::Build`] for an empty predicate, an empty SET or invalid
/// identifiers, or [`Error::Execution`] if the update fails.
pub async fn update<H: SqlHandle>(
    handle: &mut H,
    dialect: Dialect,
    params: &UpdateParams,
) -> Result<u64> {
    let (sql, args) = params.build(dialect)?;
    run_execute(handle, "update", &params.table, &sql, &args).await
}

/// Deletes matching rows and returns the number of affected rows.
///
/// # Errors
///
/// Returns [`Error::Build`] for an empty predicate or invalid identifiers, or
/// [`Error::Execution`] if the delete fails.
pub async fn delete<H: SqlHandle>(
    handle: &mut H,
    dialect: Dialect,
    params: &DeleteParams,
) -> Result<u64> {
    let (sql, args) = params.build(dialect)?;
    run_execute(handle, "delete", &params.table, &sql, &args).await
}

/// Counts rows matching `predicate`. An empty predicate counts the table.
///
/// # Errors
///
/// Returns [`Error::Build`] for invalid identifiers, or
/// [`Error::Execution`] if the query fails or its result is not a number.
pub async fn count<H: SqlHandle>(
    handle: &mut H,
    dialect: Dialect,
    table: &str,
    predicate: &ValueMap,
) -> Result<i64> {
    let (sql, args) = count_sql(dialect, table, predicate)?;
    let rows = run_query(handle, "count", table, &sql, &args).await?;

    let Some(cell) = rows.rows.first().and_then(|row| row.first()) else {
        return Ok(0);
    };
    cell.as_i64().ok_or_else(|| {
        Error::execution(
            "count",
            table,
            sqlx::Error::Decode(format!("COUNT(*) returned a non-integer value: {cell:?}").into()),
        )
    })
}

/// Reports whether any row matches `predicate`.
///
/// # Errors
///
/// Returns [`Error::Build`] for invalid identifiers, or
/// [`Error::Execution`] if the query fails.
pub async fn exists<H: SqlHandle>(
    handle: &mut H,
    dialect: Dialect,
    table: &str,
    predicate: &ValueMap,
) -> Result<bool> {
    let (sql, args) = exists_sql(dialect, table, predicate)?;
    let rows = run_query(handle, "exists", table, &sql, &args).await?;
    Ok(!rows.is_empty())
}
