//! Request identity resolution: bearer token → principal.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use orgdesk_core::UserRepository;

use crate::error::{AuthError, Unauthenticated};
use crate::principal::Principal;
use crate::token::TokenCodec;

/// Turns a bearer token into the caller's [`Principal`].
///
/// Invoked once per authenticated request. Nothing is cached: the principal
/// reflects the user record as stored right now.
#[derive(Clone)]
pub struct IdentityResolver {
    codec: Arc<dyn TokenCodec>,
    users: Arc<dyn UserRepository>,
}

impl IdentityResolver {
    pub fn new(codec: Arc<dyn TokenCodec>, users: Arc<dyn UserRepository>) -> Self {
        Self { codec, users }
    }

    /// Resolve `token` at instant `now`.
    ///
    /// Rejected tokens and vanished subjects are `AuthError::Unauthenticated`;
    /// a failing store is `AuthError::Store`.
    pub async fn resolve(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, AuthError> {
        let claims = self.codec.decode(token, now)?;
        let user_id = claims.subject()?;

        let Some(user) = self.users.get_user(user_id).await? else {
            tracing::debug!(%user_id, "token subject no longer exists");
            return Err(Unauthenticated::UserGone.into());
        };

        Ok(Principal::from_user(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashMap;

    use async_trait::async_trait;
    use orgdesk_core::{DomainResult, Email, OrganisationId, User, UserId};

    use crate::claims::TokenRejection;
    use crate::token::Hs256TokenCodec;

    #[derive(Default)]
    struct Users(HashMap<UserId, User>);

    #[async_trait]
    impl UserRepository for Users {
        async fn insert_user(&self, user: User) -> DomainResult<User> {
            Ok(user)
        }

        async fn get_user(&self, id: UserId) -> DomainResult<Option<User>> {
            Ok(self.0.get(&id).cloned())
        }

        async fn find_user_by_email(&self, email: &Email) -> DomainResult<Option<User>> {
            Ok(self.0.values().find(|u| &u.email == email).cloned())
        }

        async fn list_users_by_organisation(&self, organisation_id: OrganisationId) -> DomainResult<Vec<User>> {
            Ok(self.0.values().filter(|u| u.organisation_id == organisation_id).cloned().collect())
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    async fn seeded(is_admin: bool) -> (Arc<Users>, User) {
        let user = User::new(
            "Ada",
            Email::parse("ada@acme.com").unwrap(),
            "digest".into(),
            OrganisationId::new(),
            is_admin,
            at(0),
        );
        let mut users = Users::default();
        users.0.insert(user.id, user.clone());
        (Arc::new(users), user)
    }

    fn resolver(directory: Arc<Users>, secret: &str) -> (IdentityResolver, Arc<Hs256TokenCodec>) {
        let codec = Arc::new(Hs256TokenCodec::new(secret.as_bytes()).unwrap());
        (IdentityResolver::new(codec.clone(), directory), codec)
    }

    #[tokio::test]
    async fn valid_token_resolves_to_current_user() {
        let (directory, user) = seeded(true).await;
        let (resolver, codec) = resolver(directory, "secret");
        let token = codec.issue(user.id, Some(&user.email), at(1_000), Duration::days(30)).unwrap();

        let principal = resolver.resolve(&token, at(1_001)).await.unwrap();
        assert_eq!(principal.user_id, user.id);
        assert_eq!(principal.organisation_id, user.organisation_id);
        assert!(principal.is_admin);
    }

    #[tokio::test]
    async fn expired_token_is_unauthenticated() {
        let (directory, user) = seeded(false).await;
        let (resolver, codec) = resolver(directory, "secret");
        let token = codec.issue(user.id, None, at(1_000), Duration::seconds(10)).unwrap();

        let err = resolver.resolve(&token, at(1_010)).await.unwrap_err();
        assert_eq!(err, AuthError::Unauthenticated(Unauthenticated::Rejected(TokenRejection::Expired)));
    }

    #[tokio::test]
    async fn unknown_subject_is_user_gone() {
        let (directory, _) = seeded(false).await;
        let (resolver, codec) = resolver(directory, "secret");
        let token = codec.issue(UserId::new(), None, at(1_000), Duration::days(1)).unwrap();

        let err = resolver.resolve(&token, at(1_001)).await.unwrap_err();
        assert_eq!(err, AuthError::Unauthenticated(Unauthenticated::UserGone));
    }

    #[tokio::test]
    async fn raw_user_id_is_never_accepted_as_identity() {
        let (directory, user) = seeded(true).await;
        let (resolver, _) = resolver(directory, "secret");

        let err = resolver.resolve(&user.id.to_string(), at(1_001)).await.unwrap_err();
        assert_eq!(err, AuthError::Unauthenticated(Unauthenticated::Rejected(TokenRejection::Malformed)));
    }
}
