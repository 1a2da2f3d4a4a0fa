//! Error types for dblog

use thiserror::Error;

/// Result type alias for dblog driver operations
pub type DbResult<T> = Result<T, DbError>;

/// Errors raised by the bundled drivers.
///
/// The proxies never produce errors of their own: they return whatever error
/// type the wrapped driver uses. This type is what the SQLite adapter returns
/// and is available to custom drivers.
#[derive(Debug, Error)]
pub enum DbError {
    /// SQLite error
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Operation requires an open connection
    #[error("Connection is not open")]
    NotOpen,

    /// `open` called on an open connection
    #[error("Connection is already open")]
    AlreadyOpen,

    /// A lock guarding driver state was poisoned by a panic
    #[error("Driver state poisoned: {0}")]
    Poisoned(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl DbError {
    /// Create an error from any message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Check if this is a not-open error
    pub fn is_not_open(&self) -> bool {
        matches!(self, Self::NotOpen)
    }
}

impl<T> From<std::sync::PoisonError<T>> for DbError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Poisoned(err.to_string())
    }
}
