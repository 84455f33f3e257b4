//! Signed identity tokens (JWT, HS256).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use orgdesk_core::{Email, UserId};

use crate::claims::{TokenClaims, TokenRejection, validate_claims};
use crate::config::{AuthConfig, MAX_TOKEN_TTL_SECS};
use crate::error::AuthError;

/// Issues and verifies identity tokens.
pub trait TokenCodec: Send + Sync {
    /// Sign a token for `subject`, expiring `ttl` after `issued_at`.
    fn issue(
        &self,
        subject: UserId,
        email: Option<&Email>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, AuthError>;

    /// Verify signature, then expiry against `now`.
    ///
    /// Never panics on caller-supplied input; every failure is a typed rejection.
    fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenRejection>;
}

/// HMAC-SHA256 codec over a single process-wide secret.
pub struct Hs256TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256TokenCodec {
    pub fn new(secret: &[u8]) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Config("token signing secret must not be empty".into()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by `validate_claims` against the caller's clock.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        Self::new(config.jwt_secret.as_bytes())
    }
}

impl TokenCodec for Hs256TokenCodec {
    fn issue(
        &self,
        subject: UserId,
        email: Option<&Email>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        if ttl <= Duration::zero() {
            return Err(AuthError::Config("token ttl must be positive".into()));
        }
        if ttl > Duration::seconds(MAX_TOKEN_TTL_SECS) {
            return Err(AuthError::Config(format!(
                "token ttl must not exceed {MAX_TOKEN_TTL_SECS} seconds"
            )));
        }
        let claims = TokenClaims::new(subject, email.map(Email::to_string), issued_at, ttl);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
    }

    fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenRejection> {
        let claims = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenRejection::BadSignature,
                ErrorKind::ExpiredSignature => TokenRejection::Expired,
                _ => TokenRejection::Malformed,
            })?;

        validate_claims(&claims, now)?;
        Ok(claims)
    }
}

impl core::fmt::Debug for Hs256TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256TokenCodec").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn codec(secret: &str) -> Hs256TokenCodec {
        Hs256TokenCodec::new(secret.as_bytes()).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn issued_token_carries_sub_and_exp() {
        let codec = codec("test-secret");
        let user = UserId::new();
        let email = Email::parse("a@acme.com").unwrap();
        let token = codec.issue(user, Some(&email), at(1_700_000_000), Duration::days(30)).unwrap();

        let claims = codec.decode(&token, at(1_700_000_001)).unwrap();
        assert_eq!(claims.subject(), Ok(user));
        assert_eq!(claims.exp, 1_700_000_000 + 30 * 24 * 60 * 60);
        assert_eq!(claims.email.as_deref(), Some("a@acme.com"));
    }

    #[test]
    fn other_secret_is_bad_signature() {
        let token = codec("secret-a")
            .issue(UserId::new(), None, at(1_000), Duration::hours(1))
            .unwrap();
        assert_eq!(codec("secret-b").decode(&token, at(1_001)), Err(TokenRejection::BadSignature));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let codec = codec("test-secret");
        let token = codec.issue(UserId::new(), None, at(1_000), Duration::hours(1)).unwrap();
        let forged_sub = codec.issue(UserId::new(), None, at(1_000), Duration::hours(1)).unwrap();

        // Splice the payload of one token onto the signature of another.
        let mut parts: Vec<&str> = token.split('.').collect();
        let other: Vec<&str> = forged_sub.split('.').collect();
        parts[1] = other[1];
        let spliced = parts.join(".");

        assert_eq!(codec.decode(&spliced, at(1_001)), Err(TokenRejection::BadSignature));
    }

    #[test]
    fn garbage_is_malformed_not_a_panic() {
        let codec = codec("test-secret");
        for garbage in ["", "user-123", "a.b.c", "Bearer x", "....", "\u{0}"] {
            assert_eq!(codec.decode(garbage, at(1_000)), Err(TokenRejection::Malformed), "{garbage:?}");
        }
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(Hs256TokenCodec::new(b""), Err(AuthError::Config(_))));
    }

    #[test]
    fn non_positive_ttl_is_refused() {
        let codec = codec("test-secret");
        assert!(codec.issue(UserId::new(), None, at(1_000), Duration::zero()).is_err());
    }

    #[test]
    fn overlong_ttl_is_refused() {
        let codec = codec("test-secret");
        let cap = Duration::seconds(MAX_TOKEN_TTL_SECS);
        assert!(codec.issue(UserId::new(), None, at(1_000), cap).is_ok());
        let err = codec
            .issue(UserId::new(), None, at(1_000), cap + Duration::seconds(1))
            .unwrap_err();
        assert!(matches!(err, AuthError::Config(_)));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: a token decodes before `issued_at + ttl` and is expired from then on.
        #[test]
        fn valid_strictly_before_expiry(
            issued in 1_000_000i64..2_000_000_000i64,
            ttl in 1i64..(60 * 24 * 60 * 60),
            probe in 0i64..(120 * 24 * 60 * 60),
        ) {
            let codec = codec("prop-secret");
            let user = UserId::new();
            let token = codec.issue(user, None, at(issued), Duration::seconds(ttl)).unwrap();

            let result = codec.decode(&token, at(issued + probe));
            if probe < ttl {
                prop_assert_eq!(result.map(|c| c.sub), Ok(user.to_string()));
            } else {
                prop_assert_eq!(result, Err(TokenRejection::Expired));
            }
        }
    }
}
