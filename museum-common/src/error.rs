//! Common error types for the museum services

use thiserror::Error;

/// Common result type for museum operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across museum services
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

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Record already exists or is still referenced
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or wrong credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated user lacks the required role
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Reclassify SQLite constraint failures as conflicts
    ///
    /// Unique and foreign-key violations are caller mistakes (duplicate email,
    /// deleting an exhibit that still holds artifacts), not server faults.
    pub fn from_constraint(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Error::Conflict(format!("{} already exists", what));
            }
            if db_err.is_foreign_key_violation() {
                return Error::Conflict(format!("{} references a missing or dependent record", what));
            }
        }
        Error::Database(err)
    }
}
