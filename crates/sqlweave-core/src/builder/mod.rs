//! Parameterized CRUD statement builders.
//!
//! Each builder validates every identifier, then returns the SQL text and the
//! arguments to bind, in placeholder order.
//!
//! # Example
//!
//! ```rust
//! use sqlweave_core::builder::{OrderBy, SelectParams};
//! use sqlweave_core::Dialect;
//!
//! let (sql, params) = SelectParams::new("users")
//!     .columns(["id", "name"])
//!     .filter("active", true)
//!     .order_by(OrderBy::asc("name"))
//!     .limit(10)
//!     .build(Dialect::Postgres)?;
//!
//! assert_eq!(
//!     sql,
//!     r#"SELECT "id", "name" FROM "users" WHERE "active" = $1 ORDER BY "name" ASC LIMIT 10"#
//! );
//! assert_eq!(params.len(), 1);
//! # Ok::<(), sqlweave_core::BuildError>(())
//! ```

mod aggregate;
mod delete;
mod insert;
mod select;
mod update;
mod where_clause;

pub use aggregate::{count_sql, exists_sql};
pub use delete::DeleteParams;
pub use insert::InsertParams;
pub use select::{effective_limit, OrderBy, OrderDirection, SelectParams, DEFAULT_LIMIT};
pub use update::UpdateParams;
pub use where_clause::where_clause;
