//! Common error types for mcat

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Common result type for mcat operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across mcat crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed or disallowed operation input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Lock contention or pool exhaustion; the same request may succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Database(sqlx::Error::PoolTimedOut) => true,
            Error::Database(sqlx::Error::Database(db_err)) => {
                // SQLITE_BUSY = 5, SQLITE_LOCKED = 6 (extended codes keep the low byte)
                let busy_code = db_err
                    .code()
                    .and_then(|code| code.parse::<i64>().ok())
                    .map(|code| matches!(code & 0xff, 5 | 6))
                    .unwrap_or(false);
                busy_code || db_err.message().contains("database is locked")
            }
            _ => false,
        }
    }

    /// The store rejected the write because of a UNIQUE, FOREIGN KEY, NOT NULL or CHECK constraint.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Error::Database(sqlx::Error::Database(db_err)) => {
                // SQLITE_CONSTRAINT = 19, for codes sqlx leaves as ErrorKind::Other
                let constraint_code = db_err
                    .code()
                    .and_then(|code| code.parse::<i64>().ok())
                    .map(|code| code & 0xff == 19)
                    .unwrap_or(false);
                constraint_code
                    || matches!(
                        db_err.kind(),
                        ErrorKind::UniqueViolation
                            | ErrorKind::ForeignKeyViolation
                            | ErrorKind::NotNullViolation
                            | ErrorKind::CheckViolation
                    )
            }
            _ => false,
        }
    }
}
