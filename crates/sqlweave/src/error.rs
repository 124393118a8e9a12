//! Error types for executed operations.

use sqlweave_core::BuildError;
use thiserror::Error;

/// Errors returned by the executing entry points.
#[derive(Debug, Error)]
pub enum Error {
    /// The statement could not be built; nothing was sent to the database.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The handle reported a failure while running the statement.
    #[error("{operation} on '{target}' failed: {source}")]
    Execution {
        /// Operation being performed (e.g. "insert").
        operation: &'static str,
        /// Table or index the operation targeted.
        target: String,
        /// Underlying driver error.
        #[source]
        source: sqlx::Error,
    },
}

impl Error {
    pub(crate) fn execution(
        operation: &'static str,
        target: impl Into<String>,
        source: sqlx::Error,
    ) -> Self {
        Self::Execution {
            operation,
            target: target.into(),
            source,
        }
    }

    /// True for failures caused by the caller's input: invalid identifiers,
    /// schema violations and unsafe mutations. Retrying will not help.
    #[must_use]
    pub const fn is_programmer_error(&self) -> bool {
        matches!(self, Self::Build(_))
    }

    /// True when the database rejected or failed the statement. These may be
    /// transient.
    #[must_use]
    pub const fn is_execution_failure(&self) -> bool {
        matches!(self, Self::Execution { .. })
    }

    /// Returns the build error, if this is one.
    #[must_use]
    pub const fn as_build_error(&self) -> Option<&BuildError> {
        match self {
            Self::Build(err) => Some(err),
            Self::Execution { .. } => None,
        }
    }
}

/// Result type alias for executed operations.
pub type Result<T> = std::result::Result<T, Error>;
