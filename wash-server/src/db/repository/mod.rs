//! Repository Module
//!
//! Plain-function CRUD over the SQLite tables. Row ↔ model mapping is
//! null-coalescing: absent text becomes empty string, invalid JSON becomes
//! an empty array, malformed array entries are filtered out — never a
//! parse failure.

pub mod profile;
pub mod record;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
