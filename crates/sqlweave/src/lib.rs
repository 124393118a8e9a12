//! # sqlweave
//!
//! Dialect-aware schema and CRUD operations executed through sqlx.
//!
//! Statements are built by [`sqlweave_core`] and run through a [`SqlHandle`]:
//! a `SqlitePool`, `MySqlPool` or `PgPool`, a single connection of those
//! drivers, or an open `Transaction`. Every operation validates its input
//! completely before sending anything.
//!
//! ```rust,no_run
//! use sqlweave::builder::{InsertParams, SelectParams};
//! use sqlweave::{ColumnDefinition, ColumnType, Dialect, TableDefinition};
//!
//! # async fn run() -> Result<(), sqlweave::Error> {
//! let mut pool = sqlx::SqlitePool::connect("sqlite::memory:").await.map_err(|e| {
//!     sqlweave::Error::Execution { operation: "connect", target: "sqlite".into(), source: e }
//! })?;
//!
//! let users = TableDefinition::new("users")
//!     .column(ColumnDefinition::new("id", ColumnType::Integer).primary_key())
//!     .column(ColumnDefinition::new("name", ColumnType::Text).not_null())
//!     .if_not_exists(true);
//! sqlweave::create_table(&mut pool, Dialect::Sqlite, &users).await?;
//!
//! let insert = InsertParams::new("users").value("id", 1_i64).value("name", "Ada");
//! sqlweave::insert(&mut pool, Dialect::Sqlite, &insert).await?;
//!
//! let query = SelectParams::new("users").filter("id", 1_i64);
//! let row = sqlweave::select_one(&mut pool, Dialect::Sqlite, &query).await?;
//! assert!(row.is_some());
//! # Ok(())
//! # }
//! ```

pub mod crud;
pub mod ddl;
pub mod error;
pub mod handle;

pub use crud::{count, delete, exists, insert, select, select_one, update};
pub use ddl::{create_index, create_table};
pub use error::{Error, Result};
pub use handle::SqlHandle;

pub use sqlweave_core::ddl::{
    create_index_sql, create_table_sql, table_index_params, IndexParams, IndexStatement,
};
pub use sqlweave_core::{
    builder, sql_type, validate_column_name, validate_column_type, validate_identifier,
    validate_table_name, BuildError, ColumnDefinition, ColumnType, Dialect, ForeignKeyDefinition,
    IndexDefinition, OnDelete, Row, RowSet, SqlValue, TableDefinition, ToSqlValue, ValueMap,
};
