//! Service graph: storage adapters, auth primitives and use-case services.

use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;

use orgdesk_auth::{AuthConfig, CredentialHasher, Hs256TokenCodec, IdentityResolver, TokenCodec};
use orgdesk_core::{BlobStore, OrganisationRepository, UserRepository};
use orgdesk_infra::{AppConfig, InMemoryDirectory, LocalBlobStore, PostgresDirectory};
use orgdesk_tenancy::{OnboardingService, OrganisationService};

/// Everything a handler needs, shared behind one `Arc`.
pub struct AppServices {
    pub onboarding: OnboardingService,
    pub organisations: OrganisationService,
    pub resolver: IdentityResolver,
}

impl AppServices {
    /// Wire services over already-built adapters.
    pub fn new<D>(directory: Arc<D>, blobs: Arc<dyn BlobStore>, auth: &AuthConfig) -> anyhow::Result<Self>
    where
        D: OrganisationRepository + UserRepository + 'static,
    {
        let organisations: Arc<dyn OrganisationRepository> = directory.clone();
        let users: Arc<dyn UserRepository> = directory;

        let hasher = Arc::new(CredentialHasher::new(auth.hash_cost)?);
        let codec: Arc<dyn TokenCodec> = Arc::new(Hs256TokenCodec::from_config(auth)?);

        Ok(Self {
            onboarding: OnboardingService::new(
                organisations.clone(),
                users.clone(),
                hasher,
                codec.clone(),
                auth.token_ttl,
            ),
            organisations: OrganisationService::new(organisations, users.clone(), blobs),
            resolver: IdentityResolver::new(codec, users),
        })
    }
}

/// Build the production service graph from process configuration.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let auth = AuthConfig::new(config.jwt_secret.clone()).with_token_ttl(Duration::seconds(config.token_ttl_secs));
    let blobs: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(
        config.upload_dir.clone(),
        config.upload_url_prefix.clone(),
    ));

    match &config.database_url {
        Some(url) => {
            let directory = PostgresDirectory::connect(url)
                .await
                .context("failed to connect to database")?;
            directory
                .ensure_schema()
                .await
                .context("failed to prepare database schema")?;
            tracing::info!("using postgres directory");
            AppServices::new(Arc::new(directory), blobs, &auth)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory directory");
            AppServices::new(Arc::new(InMemoryDirectory::new()), blobs, &auth)
        }
    }
}
