//! Organisation read/update for authenticated principals.

use std::sync::Arc;

use orgdesk_auth::{Principal, authorize_manage, authorize_view};
use orgdesk_core::{
    BlobStore, OrganisationChanges, OrganisationId, OrganisationRepository, OrganisationView, UserProfile,
    UserRepository,
};

use crate::error::ServiceError;

/// Blob namespace logos are stored under.
pub const LOGO_NAMESPACE: &str = "logos";

/// Raw logo upload as received from the client.
#[derive(Debug, Clone, Default)]
pub struct LogoUpload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Partial update of the caller's own organisation.
#[derive(Debug, Clone, Default)]
pub struct UpdateOrganisation {
    pub name: Option<String>,
    pub logo: Option<LogoUpload>,
}

pub struct OrganisationService {
    organisations: Arc<dyn OrganisationRepository>,
    users: Arc<dyn UserRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl OrganisationService {
    pub fn new(
        organisations: Arc<dyn OrganisationRepository>,
        users: Arc<dyn UserRepository>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            organisations,
            users,
            blobs,
        }
    }

    /// Fetch an organisation the principal belongs to.
    ///
    /// Tenant isolation is checked before the lookup, so a foreign id yields
    /// `Forbidden` whether or not it exists.
    #[tracing::instrument(skip_all, fields(organisation_id = %id))]
    pub async fn get(&self, principal: &Principal, id: OrganisationId) -> Result<OrganisationView, ServiceError> {
        authorize_view(principal, id)?;
        let organisation = self
            .organisations
            .get_organisation(id)
            .await?
            .ok_or(ServiceError::NotFound)?;
        Ok(organisation.view())
    }

    /// Apply a partial update to the principal's own organisation (admin only).
    ///
    /// The logo, if any, is stored before the record is touched; a failed
    /// upload leaves the organisation unchanged.
    #[tracing::instrument(skip_all, fields(organisation_id = %principal.organisation_id))]
    pub async fn update(
        &self,
        principal: &Principal,
        input: UpdateOrganisation,
    ) -> Result<OrganisationView, ServiceError> {
        authorize_manage(principal)?;
        let id = principal.organisation_id;

        let current = self
            .organisations
            .get_organisation(id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let logo_url = match input.logo.filter(|logo| !logo.bytes.is_empty()) {
            Some(logo) => {
                let url = self
                    .blobs
                    .store(LOGO_NAMESPACE, logo.file_name.as_deref(), &logo.bytes)
                    .await
                    .inspect_err(|e| tracing::warn!(error = %e, "logo upload failed"))?;
                Some(url)
            }
            None => None,
        };

        let changes = OrganisationChanges::new(input.name.as_deref(), logo_url);
        if changes.is_empty() {
            return Ok(current.view());
        }

        let updated = self
            .organisations
            .update_organisation(id, changes)
            .await?
            .ok_or(ServiceError::NotFound)?;

        tracing::info!(updated_by = %principal.user_id, "organisation updated");
        Ok(updated.view())
    }

    /// Profile of the authenticated caller, read fresh from the store.
    pub async fn current_user(&self, principal: &Principal) -> Result<UserProfile, ServiceError> {
        let user = self
            .users
            .get_user(principal.user_id)
            .await?
            .ok_or(ServiceError::NotFound)?;
        Ok(user.profile())
    }

    /// List the members of an organisation the principal belongs to.
    #[tracing::instrument(skip_all, fields(organisation_id = %id))]
    pub async fn members(&self, principal: &Principal, id: OrganisationId) -> Result<Vec<UserProfile>, ServiceError> {
        authorize_view(principal, id)?;
        if self.organisations.get_organisation(id).await?.is_none() {
            return Err(ServiceError::NotFound);
        }
        let users = self.users.list_users_by_organisation(id).await?;
        Ok(users.iter().map(|user| user.profile()).collect())
    }
}
