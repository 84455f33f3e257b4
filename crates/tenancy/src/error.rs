//! Use-case error taxonomy.

use thiserror::Error;

use orgdesk_auth::{AuthError, AuthzError, Unauthenticated};
use orgdesk_core::DomainError;

/// Failures surfaced to callers of the services.
///
/// Display strings are deliberately generic: they never say whether a login
/// failed on the email or the password, nor whether a forbidden record exists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("unauthenticated")]
    Unauthenticated(Unauthenticated),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("forbidden")]
    Forbidden(AuthzError),

    #[error("not found")]
    NotFound,

    #[error("email already registered")]
    EmailTaken,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => Self::Validation(msg),
            DomainError::NotFound => Self::NotFound,
            // Email is the only unique key callers can collide on.
            DomainError::Conflict(_) => Self::EmailTaken,
            DomainError::Storage(msg) => Self::Storage(msg),
        }
    }
}

impl From<AuthzError> for ServiceError {
    fn from(value: AuthzError) -> Self {
        Self::Forbidden(value)
    }
}

impl From<AuthError> for ServiceError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::Unauthenticated(reason) => Self::Unauthenticated(reason),
            AuthError::Crypto(msg) | AuthError::Config(msg) => Self::Internal(msg),
            AuthError::Store(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgdesk_auth::TokenRejection;

    #[test]
    fn store_failures_inside_auth_keep_their_kind() {
        let err: ServiceError = AuthError::Store(DomainError::storage("down")).into();
        assert_eq!(err, ServiceError::Storage("down".into()));
    }

    #[test]
    fn conflicts_become_email_taken() {
        let err: ServiceError = DomainError::conflict("email already registered").into();
        assert_eq!(err, ServiceError::EmailTaken);
    }

    #[test]
    fn display_does_not_leak_rejection_reason() {
        let err: ServiceError = AuthError::from(TokenRejection::Expired).into();
        assert_eq!(err.to_string(), "unauthenticated");
    }
}
