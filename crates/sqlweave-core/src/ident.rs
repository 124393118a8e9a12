//! Identifier validation.
//!
//! Table and column names are the only caller-controlled text placed into SQL
//! without binding, so every builder runs them through [`validate_identifier`]
//! first. A valid identifier:
//!
//! - is 1 to 64 characters long,
//! - matches `[A-Za-z_][A-Za-z0-9_]*`,
//! - is not a reserved word (compared case-insensitively).

use crate::error::{BuildError, Result};

/// Maximum identifier length, in characters.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Words that may never be used as a table or column name.
pub const RESERVED_WORDS: &[&str] = &[
    "SELECT",
    "INSERT",
    "UPDATE",
    "DELETE",
    "DROP",
    "CREATE",
    "ALTER",
    "INDEX",
    "TABLE",
    "DATABASE",
    "SCHEMA",
    "VIEW",
    "PROCEDURE",
    "FUNCTION",
    "TRIGGER",
    "UNION",
    "WHERE",
    "ORDER",
    "GROUP",
    "HAVING",
    "FROM",
    "JOIN",
    "ON",
    "AS",
];

/// Returns true if `name` is a reserved word.
#[must_use]
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|word| word.eq_ignore_ascii_case(name))
}

/// Validates a table or column name.
///
/// # Errors
///
/// Returns [`BuildError::InvalidIdentifier`] if the name is empty, too long,
/// contains characters outside `[A-Za-z0-9_]`, starts with a digit, or is a
/// reserved word.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BuildError::invalid_identifier(name, "identifier cannot be empty"));
    }
    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(BuildError::invalid_identifier(
            name,
            "identifier exceeds 64 characters",
        ));
    }

    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        if !(first.is_ascii_alphabetic() || first == '_') {
            return Err(BuildError::invalid_identifier(
                name,
                "identifier must start with a letter or underscore",
            ));
        }
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(BuildError::invalid_identifier(
            name,
            "identifier may only contain ASCII letters, digits and underscores",
        ));
    }

    if is_reserved_word(name) {
        return Err(BuildError::invalid_identifier(
            name,
            "identifier is a reserved word",
        ));
    }

    Ok(())
}

/// Validates a table name.
///
/// # Errors
///
/// See [`validate_identifier`].
pub fn validate_table_name(name: &str) -> Result<()> {
    validate_identifier(name)
}

/// Validates a column name.
///
/// # Errors
///
/// See [`validate_identifier`].
pub fn validate_column_name(name: &str) -> Result<()> {
    validate_identifier(name)
}
