//! SQL dialect support.
//!
//! The three supported engines differ in identifier quoting, parameter
//! placeholders, and a handful of DDL details. The dialect set is closed, so
//! every difference is a `match` over [`Dialect`] rather than a trait object.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest row count MySQL accepts in a `LIMIT` clause.
const MYSQL_UNBOUNDED_LIMIT: &str = "18446744073709551615";

/// MySQL `ER_DUP_KEYNAME`: "Duplicate key name".
const MYSQL_DUP_KEYNAME: u32 = 1061;

/// One of the supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Dialect {
    /// SQLite and compatible engines.
    #[default]
    Sqlite,
    /// MySQL and MariaDB.
    MySql,
    /// PostgreSQL.
    Postgres,
}

impl Dialect {
    /// All supported dialects.
    pub const ALL: [Self; 3] = [Self::Sqlite, Self::MySql, Self::Postgres];

    /// Looks up a dialect by name, case-insensitively.
    ///
    /// Unknown or empty names resolve to [`Dialect::Sqlite`], so a missing
    /// setting never prevents statement building.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Self::MySql,
            "postgres" | "postgresql" | "pg" => Self::Postgres,
            _ => Self::Sqlite,
        }
    }

    /// Returns the canonical dialect name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
        }
    }

    /// Returns the identifier quote character.
    #[must_use]
    pub const fn quote_char(self) -> char {
        match self {
            Self::MySql => '`',
            Self::Sqlite | Self::Postgres => '"',
        }
    }

    /// Quotes an identifier.
    ///
    /// The name must already have passed [`crate::ident::validate_identifier`];
    /// no escaping happens here.
    #[must_use]
    pub fn quote_identifier(self, name: &str) -> String {
        let q = self.quote_char();
        format!("{q}{name}{q}")
    }

    /// Renders the placeholder for the 1-based parameter `index`.
    #[must_use]
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Self::Sqlite | Self::MySql => String::from("?"),
            Self::Postgres => format!("${index}"),
        }
    }

    /// Whether `CREATE INDEX IF NOT EXISTS` is accepted.
    #[must_use]
    pub const fn supports_index_if_not_exists(self) -> bool {
        !matches!(self, Self::MySql)
    }

    /// Whether a server error number reports an index name that already
    /// exists.
    ///
    /// Only MySQL needs this: it is the one dialect without
    /// `CREATE INDEX IF NOT EXISTS`.
    #[must_use]
    pub const fn is_duplicate_index_error(self, number: u32) -> bool {
        match self {
            Self::MySql => number == MYSQL_DUP_KEYNAME,
            Self::Sqlite | Self::Postgres => false,
        }
    }

    /// The `LIMIT` value meaning "no limit" when an `OFFSET` must be
    /// rendered, or `None` if the engine accepts a bare `OFFSET`.
    #[must_use]
    pub const fn unbounded_limit(self) -> Option<&'static str> {
        match self {
            Self::Sqlite => Some("-1"),
            Self::MySql => Some(MYSQL_UNBOUNDED_LIMIT),
            Self::Postgres => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Dialect {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl From<String> for Dialect {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<Dialect> for String {
    fn from(dialect: Dialect) -> Self {
        dialect.name().to_string()
    }
}
