//! Error types for statement building and schema validation.
//!
//! Every variant here is raised before any SQL reaches a database.

use thiserror::Error;

/// Errors detected while validating input or rendering a statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A table or column name failed the identifier whitelist.
    #[error("invalid identifier '{name}': {reason}")]
    InvalidIdentifier {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A column type is not one of the portable type names.
    #[error("invalid column type '{0}': expected one of text, integer, real, blob, boolean, timestamp, json")]
    InvalidColumnType(String),

    /// A table or index description breaks a structural rule.
    #[error("schema invariant violated: {0}")]
    SchemaInvariantViolation(String),

    /// A mutation would touch every row, or insert nothing.
    #[error("unsafe mutation: {0}")]
    UnsafeMutation(String),
}

impl BuildError {
    pub(crate) fn invalid_identifier(name: &str, reason: &'static str) -> Self {
        Self::InvalidIdentifier {
            name: name.to_string(),
            reason,
        }
    }

    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::SchemaInvariantViolation(message.into())
    }

    pub(crate) fn unsafe_mutation(message: impl Into<String>) -> Self {
        Self::UnsafeMutation(message.into())
    }
}

/// Result type for building operations.
pub type Result<T> = std::result::Result<T, BuildError>;
