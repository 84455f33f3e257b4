//! Self-service onboarding and password login.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use orgdesk_auth::{CredentialHasher, TokenCodec};
use orgdesk_core::{
    Email, Organisation, OrganisationRepository, User, UserProfile, UserRepository,
};

use crate::error::ServiceError;

/// Input for creating an organisation without any user.
#[derive(Debug, Clone)]
pub struct CreateOrganisation {
    pub name: String,
    pub logo_url: Option<String>,
}

/// Input for creating an organisation together with its first admin.
#[derive(Clone)]
pub struct OnboardOrganisation {
    pub organisation_name: String,
    pub admin_full_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl core::fmt::Debug for OnboardOrganisation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OnboardOrganisation")
            .field("organisation_name", &self.organisation_name)
            .field("admin_full_name", &self.admin_full_name)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &"<redacted>")
            .finish()
    }
}

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub user: UserProfile,
}

/// The three open entry points: create, onboard-with-admin, login.
///
/// They share no state machine; each call stands alone.
pub struct OnboardingService {
    organisations: Arc<dyn OrganisationRepository>,
    users: Arc<dyn UserRepository>,
    hasher: Arc<CredentialHasher>,
    tokens: Arc<dyn TokenCodec>,
    token_ttl: Duration,
}

impl OnboardingService {
    pub fn new(
        organisations: Arc<dyn OrganisationRepository>,
        users: Arc<dyn UserRepository>,
        hasher: Arc<CredentialHasher>,
        tokens: Arc<dyn TokenCodec>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            organisations,
            users,
            hasher,
            tokens,
            token_ttl,
        }
    }

    /// Persist a bare organisation. Open endpoint (signup funnel).
    #[tracing::instrument(skip_all)]
    pub async fn create_organisation(&self, input: CreateOrganisation) -> Result<Organisation, ServiceError> {
        let organisation = Organisation::new(&input.name, input.logo_url, Utc::now())?;
        let organisation = self.organisations.insert_organisation(organisation).await?;
        tracing::info!(organisation_id = %organisation.id, "organisation created");
        Ok(organisation)
    }

    /// Persist an organisation and its admin as one unit.
    ///
    /// On `EmailTaken` nothing is written: the store commits both records
    /// together or neither.
    #[tracing::instrument(skip_all)]
    pub async fn onboard_with_admin(&self, input: OnboardOrganisation) -> Result<(Organisation, User), ServiceError> {
        let email = Email::parse(&input.admin_email)?;
        if input.admin_password.is_empty() {
            return Err(ServiceError::Validation("admin password must not be empty".into()));
        }
        let now = Utc::now();
        let organisation = Organisation::new(&input.organisation_name, None, now)?;

        // Fast path; the store re-checks atomically.
        if self.users.find_user_by_email(&email).await?.is_some() {
            tracing::warn!("onboarding rejected: email already registered");
            return Err(ServiceError::EmailTaken);
        }

        let hasher = self.hasher.clone();
        let password = input.admin_password;
        let password_hash = blocking(move || hasher.hash(&password)).await??;

        let admin = User::new(&input.admin_full_name, email, password_hash, organisation.id, true, now);
        let (organisation, admin) = self
            .organisations
            .insert_organisation_with_admin(organisation, admin)
            .await?;

        tracing::info!(
            organisation_id = %organisation.id,
            admin_id = %admin.id,
            "organisation onboarded with admin"
        );
        Ok((organisation, admin))
    }

    /// Exchange email + password for a bearer token.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller,
    /// in both the error and the amount of hashing work done.
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutput, ServiceError> {
        let user = match Email::parse(email) {
            Ok(email) => self.users.find_user_by_email(&email).await?,
            Err(_) => None,
        };

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let (user, verified) = blocking(move || match user {
            Some(user) => {
                let ok = hasher.verify(&password, &user.password_hash);
                (Some(user), ok)
            }
            None => (None, hasher.verify_absent(&password)),
        })
        .await?;

        let user = match (user, verified) {
            (Some(user), true) => user,
            _ => {
                tracing::warn!("login rejected");
                return Err(ServiceError::InvalidCredentials);
            }
        };

        let issued_at = Utc::now();
        let access_token = self.tokens.issue(user.id, Some(&user.email), issued_at, self.token_ttl)?;
        let expires_at = DateTime::from_timestamp(issued_at.timestamp(), 0)
            .and_then(|iat| iat.checked_add_signed(self.token_ttl))
            .ok_or_else(|| ServiceError::Internal("token expiry out of range".into()))?;

        tracing::info!(user_id = %user.id, "login succeeded");
        Ok(LoginOutput {
            access_token,
            token_type: "bearer",
            expires_at,
            user: user.profile(),
        })
    }
}

/// Run CPU-bound hashing off the async worker threads.
async fn blocking<T, F>(f: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServiceError::Internal(format!("hashing task failed: {e}")))
}
