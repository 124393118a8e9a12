//! Executing schema operations.

use sqlweave_core::ddl::{create_index_sql, create_table_sql, table_index_params, IndexParams};
use sqlweave_core::{Dialect, TableDefinition};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::handle::{run_execute, SqlHandle};

/// Creates a table and then each of its declared indexes.
///
/// The whole definition is validated before anything is sent, so an invalid
/// definition never leaves a half-created table behind.
///
/// # Errors
///
/// Returns [`Error::Build`] for an invalid definition, or
/// [`Error::Execution`] if the table or one of its indexes fails to create.
pub async fn create_table<H: SqlHandle>(
    handle: &mut H,
    dialect: Dialect,
    def: &TableDefinition,
) -> Result<()> {
    let sql = create_table_sql(dialect, def)?;
    let indexes = table_index_params(def);

    run_execute(handle, "create table", &def.table, &sql, &[]).await?;
    info!(
        table = %def.table,
        dialect = %dialect,
        columns = def.columns.len(),
        "Created table"
    );

    for params in &indexes {
        create_index(handle, dialect, params).await?;
    }
    Ok(())
}

/// Creates an index named `idx_<table>_<columns>`.
///
/// MySQL has no `CREATE INDEX IF NOT EXISTS`; when `if_not_exists` is set
/// there, a server error 1061 (duplicate key name) is treated as success.
/// The error number comes from [`SqlHandle::error_number`], never from the
/// message text.
///
/// # Errors
///
/// Returns [`Error::Build`] for an invalid table or column name, or
/// [`Error::Execution`] for any other failure reported by the handle.
pub async fn create_index<H: SqlHandle>(
    handle: &mut H,
    dialect: Dialect,
    params: &IndexParams,
) -> Result<()> {
    let stmt = create_index_sql(dialect, params)?;

    debug!(operation = "create index", target = %stmt.name, sql = %stmt.sql, "Executing SQL");
    match handle.execute(&stmt.sql, &[]).await {
        Ok(_) => {
            info!(index = %stmt.name, table = %params.table, unique = params.unique, "Created index");
            Ok(())
        }
        Err(err)
            if params.if_not_exists
                && H::error_number(&err).is_some_and(|n| dialect.is_duplicate_index_error(n)) =>
        {
            warn!(index = %stmt.name, table = %params.table, "Index already exists, skipping");
            Ok(())
        }
        Err(source) => {
            debug!(index = %stmt.name, error = %source, "Index creation failed");
            Err(Error::execution("create index", stmt.name, source))
        }
    }
}
