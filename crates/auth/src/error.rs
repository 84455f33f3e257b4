//! Authentication error types.

use orgdesk_core::DomainError;
use thiserror::Error;

use crate::claims::TokenRejection;

/// Why a request could not be tied to a verified identity.
///
/// The variant is for logs only; clients always get the same generic 401.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Unauthenticated {
    #[error("missing bearer token")]
    MissingToken,

    #[error("token rejected: {0}")]
    Rejected(TokenRejection),

    /// The token verified but its subject no longer exists.
    #[error("token subject no longer exists")]
    UserGone,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(#[from] Unauthenticated),

    #[error("cryptography error: {0}")]
    Crypto(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] DomainError),
}

impl From<TokenRejection> for AuthError {
    fn from(value: TokenRejection) -> Self {
        Self::Unauthenticated(Unauthenticated::Rejected(value))
    }
}
