//! Storage ports.
//!
//! The services only see these traits; adapters live in `orgdesk-infra`.
//! All operations are async and must not hold cross-request locks across
//! suspension points.

use async_trait::async_trait;

use crate::email::Email;
use crate::error::DomainResult;
use crate::id::{OrganisationId, UserId};
use crate::model::{Organisation, OrganisationChanges, User};

#[async_trait]
pub trait OrganisationRepository: Send + Sync {
    async fn insert_organisation(&self, organisation: Organisation) -> DomainResult<Organisation>;

    async fn get_organisation(&self, id: OrganisationId) -> DomainResult<Option<Organisation>>;

    /// Persist the organisation and its first admin as one unit of work.
    ///
    /// Either both records are committed or neither is. Fails with
    /// `DomainError::Conflict` when the admin's email is already registered.
    async fn insert_organisation_with_admin(
        &self,
        organisation: Organisation,
        admin: User,
    ) -> DomainResult<(Organisation, User)>;

    /// Apply all changes in a single write. Returns `None` if the organisation
    /// does not exist.
    async fn update_organisation(
        &self,
        id: OrganisationId,
        changes: OrganisationChanges,
    ) -> DomainResult<Option<Organisation>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DomainError::Conflict` if the email is taken; never overwrites.
    async fn insert_user(&self, user: User) -> DomainResult<User>;

    async fn get_user(&self, id: UserId) -> DomainResult<Option<User>>;

    async fn find_user_by_email(&self, email: &Email) -> DomainResult<Option<User>>;

    async fn list_users_by_organisation(&self, organisation_id: OrganisationId) -> DomainResult<Vec<User>>;
}

/// Sink for uploaded files (organisation logos).
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `namespace` and return a stable, non-empty reference.
    ///
    /// `file_name` is only used to keep the original extension.
    async fn store(&self, namespace: &str, file_name: Option<&str>, data: &[u8]) -> DomainResult<String>;
}
