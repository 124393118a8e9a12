//! # sqlweave-core
//!
//! Dialect-aware SQL statement building for SQLite, MySQL and PostgreSQL.
//!
//! This crate renders SQL text and bound parameters; it never talks to a
//! database. It provides:
//! - Dialect primitives: identifier quoting and placeholder syntax
//! - An identifier whitelist that every table and column name passes through
//! - Portable column types mapped to each dialect's keywords
//! - `CREATE TABLE` / `CREATE INDEX` rendering from validated descriptions
//! - Parameterized SELECT, INSERT, UPDATE, DELETE, COUNT and EXISTS builders
//!
//! ## SQL Injection Prevention
//!
//! Values are always bound as parameters, and names must pass
//! [`validate_identifier`]:
//!
//! ```rust
//! use sqlweave_core::builder::SelectParams;
//! use sqlweave_core::{Dialect, SqlValue};
//!
//! let user_input = "'; DROP TABLE users; --";
//! let (sql, params) = SelectParams::new("users")
//!     .columns(["id"])
//!     .filter("name", user_input)
//!     .build(Dialect::Sqlite)?;
//!
//! assert_eq!(sql, r#"SELECT "id" FROM "users" WHERE "name" = ? LIMIT 10000"#);
//! assert_eq!(params, vec![SqlValue::Text(user_input.to_string())]);
//!
//! assert!(SelectParams::new("users; DROP TABLE users").build(Dialect::Sqlite).is_err());
//! # Ok::<(), sqlweave_core::BuildError>(())
//! ```
//!
//! ## Schema Descriptions
//!
//! ```rust
//! use sqlweave_core::ddl::create_table_sql;
//! use sqlweave_core::{ColumnDefinition, ColumnType, Dialect, TableDefinition};
//!
//! let table = TableDefinition::new("widgets")
//!     .column(ColumnDefinition::new("id", ColumnType::Text).primary_key().not_null())
//!     .column(ColumnDefinition::new("enabled", ColumnType::Boolean).default_value("1"))
//!     .if_not_exists(true);
//!
//! let sql = create_table_sql(Dialect::MySql, &table)?;
//! assert_eq!(
//!     sql,
//!     "CREATE TABLE IF NOT EXISTS `widgets` (`id` VARCHAR(255) NOT NULL PRIMARY KEY, \
//!      `enabled` TINYINT(1) DEFAULT '1')"
//! );
//! # Ok::<(), sqlweave_core::BuildError>(())
//! ```

pub mod builder;
pub mod ddl;
pub mod dialect;
pub mod error;
pub mod ident;
pub mod row;
pub mod schema;
pub mod types;
pub mod value;

pub use dialect::Dialect;
pub use error::{BuildError, Result};
pub use ident::{validate_column_name, validate_identifier, validate_table_name};
pub use row::{Row, RowSet};
pub use schema::{
    ColumnDefinition, ForeignKeyDefinition, IndexDefinition, OnDelete, TableDefinition,
};
pub use types::{sql_type, validate_column_type, ColumnType};
pub use value::{SqlValue, ToSqlValue, ValueMap};
