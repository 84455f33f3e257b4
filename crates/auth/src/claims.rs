use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use orgdesk_core::UserId;

/// Claims carried by an identity token.
///
/// `sub` and `exp` are the contract; `iat` and `email` are informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user id as a string.
    pub sub: String,

    /// Absolute expiry, epoch seconds.
    pub exp: i64,

    /// Issued-at, epoch seconds.
    pub iat: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl TokenClaims {
    /// Build claims for `subject` valid for `ttl` from `issued_at`.
    ///
    /// The issue instant is truncated to whole seconds, so `exp` is exactly
    /// `iat + ttl`.
    pub fn new(subject: UserId, email: Option<String>, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: subject.to_string(),
            exp: iat + ttl.num_seconds(),
            iat,
            email,
        }
    }

    pub fn subject(&self) -> Result<UserId, TokenRejection> {
        self.sub.parse().map_err(|_| TokenRejection::Malformed)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    #[error("signature does not verify")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,
}

/// Deterministically validate decoded claims against `now`.
///
/// A token is rejected at and after its expiry instant; there is no leeway.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenRejection> {
    if claims.exp <= claims.iat {
        return Err(TokenRejection::Malformed);
    }
    let expires_at = claims.expires_at().ok_or(TokenRejection::Malformed)?;
    if now >= expires_at {
        return Err(TokenRejection::Expired);
    }
    Ok(())
}
