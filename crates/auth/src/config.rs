//! Authentication configuration.

use chrono::Duration;

use crate::password::HashCost;

/// Default token lifetime: 30 days.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Longest accepted token lifetime: 10 years.
pub const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Configuration for token signing and password hashing.
///
/// Loaded once at process start; the secret is shared read-only afterwards.
/// Rotating `jwt_secret` invalidates every outstanding token.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 signing secret.
    pub jwt_secret: String,
    /// Lifetime of issued tokens.
    pub token_ttl: Duration,
    /// Argon2id cost parameters for newly hashed passwords.
    pub hash_cost: HashCost,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            hash_cost: HashCost::default(),
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_hash_cost(mut self, cost: HashCost) -> Self {
        self.hash_cost = cost;
        self
    }
}

impl core::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}
