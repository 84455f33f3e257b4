//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer and storage ports.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Validation and uniqueness failures are deterministic; `Storage` wraps
/// whatever the backing adapter reported and is never shown to clients verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record was not found.
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint rejected the write (e.g. email already registered).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The storage backend failed (connectivity, unexpected constraint, IO).
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
