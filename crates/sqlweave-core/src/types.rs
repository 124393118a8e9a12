//! Portable column types and their per-dialect keywords.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::error::{BuildError, Result};

/// A dialect-neutral column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColumnType {
    /// Character data.
    Text,
    /// 64-bit integer.
    Integer,
    /// Double precision float.
    Real,
    /// Binary data.
    Blob,
    /// True/false.
    Boolean,
    /// Date and time.
    Timestamp,
    /// JSON document.
    Json,
}

impl ColumnType {
    /// All portable types, in canonical order.
    pub const ALL: [Self; 7] = [
        Self::Text,
        Self::Integer,
        Self::Real,
        Self::Blob,
        Self::Boolean,
        Self::Timestamp,
        Self::Json,
    ];

    /// Returns the canonical lower-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Blob => "blob",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
            Self::Json => "json",
        }
    }

    /// Parses a canonical type name. Matching is exact: `"TEXT"` is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidColumnType`] for any other string.
    pub fn parse(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.name() == name)
            .ok_or_else(|| BuildError::InvalidColumnType(name.to_string()))
    }

    /// Returns the concrete type keyword for `dialect`.
    #[must_use]
    pub const fn sql_type(self, dialect: Dialect) -> &'static str {
        match (dialect, self) {
            (Dialect::Sqlite, Self::Text | Self::Timestamp | Self::Json) => "TEXT",
            (Dialect::Sqlite, Self::Integer | Self::Boolean) => "INTEGER",
            (Dialect::Sqlite, Self::Real) => "REAL",
            (Dialect::Sqlite, Self::Blob) => "BLOB",

            (Dialect::MySql, Self::Text) => "VARCHAR(255)",
            (Dialect::MySql, Self::Integer) => "BIGINT",
            (Dialect::MySql, Self::Real) => "DOUBLE",
            (Dialect::MySql, Self::Blob) => "LONGBLOB",
            (Dialect::MySql, Self::Boolean) => "TINYINT(1)",
            (Dialect::MySql, Self::Timestamp) => "TIMESTAMP",
            (Dialect::MySql, Self::Json) => "JSON",

            (Dialect::Postgres, Self::Text) => "TEXT",
            (Dialect::Postgres, Self::Integer) => "BIGINT",
            (Dialect::Postgres, Self::Real) => "DOUBLE PRECISION",
            (Dialect::Postgres, Self::Blob) => "BYTEA",
            (Dialect::Postgres, Self::Boolean) => "BOOLEAN",
            (Dialect::Postgres, Self::Timestamp) => "TIMESTAMP",
            (Dialect::Postgres, Self::Json) => "JSONB",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColumnType {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ColumnType {
    type Error = BuildError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ColumnType> for String {
    fn from(ty: ColumnType) -> Self {
        ty.name().to_string()
    }
}

/// Validates a column type name.
///
/// # Errors
///
/// Returns [`BuildError::InvalidColumnType`] unless `name` is one of the seven
/// canonical lower-case type names.
pub fn validate_column_type(name: &str) -> Result<ColumnType> {
    ColumnType::parse(name)
}

/// Looks up the concrete keyword for a dialect name and type name.
///
/// Total: an unknown dialect uses the SQLite mapping, and an unknown type name
/// is returned unchanged.
#[must_use]
pub fn sql_type(dialect: &str, type_name: &str) -> String {
    let dialect = Dialect::from_name(dialect);
    ColumnType::parse(type_name).map_or_else(
        |_| type_name.to_string(),
        |ty| ty.sql_type(dialect).to_string(),
    )
}
