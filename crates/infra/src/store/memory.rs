use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use orgdesk_core::{
    DomainError, DomainResult, Email, Entity, Organisation, OrganisationChanges, OrganisationId,
    OrganisationRepository, User, UserId, UserRepository,
};

#[derive(Debug, Default)]
struct Tables {
    organisations: HashMap<OrganisationId, Organisation>,
    users: HashMap<UserId, User>,
    /// Unique index: normalised email → owner.
    emails: HashMap<Email, UserId>,
}

impl Tables {
    fn check_user_insertable(&self, user: &User) -> DomainResult<()> {
        if self.emails.contains_key(&user.email) {
            return Err(DomainError::conflict("email already registered"));
        }
        if self.users.contains_key(user.id()) {
            return Err(DomainError::conflict("user id already exists"));
        }
        Ok(())
    }

    fn insert_user_unchecked(&mut self, user: User) {
        self.emails.insert(user.email.clone(), user.id);
        self.users.insert(user.id, user);
    }
}

/// In-memory directory for tests/dev.
///
/// Every write takes the single write lock, so the email check and the insert
/// are one atomic step. The lock is never held across an `.await`.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    inner: RwLock<Tables>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, Tables>> {
        self.inner.read().map_err(|_| DomainError::storage("directory lock poisoned"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, Tables>> {
        self.inner.write().map_err(|_| DomainError::storage("directory lock poisoned"))
    }

    pub fn organisation_count(&self) -> usize {
        self.read().map(|t| t.organisations.len()).unwrap_or(0)
    }

    pub fn user_count(&self) -> usize {
        self.read().map(|t| t.users.len()).unwrap_or(0)
    }
}

#[async_trait]
impl OrganisationRepository for InMemoryDirectory {
    async fn insert_organisation(&self, organisation: Organisation) -> DomainResult<Organisation> {
        let mut tables = self.write()?;
        if tables.organisations.contains_key(organisation.id()) {
            return Err(DomainError::conflict("organisation id already exists"));
        }
        tables.organisations.insert(organisation.id, organisation.clone());
        Ok(organisation)
    }

    async fn get_organisation(&self, id: OrganisationId) -> DomainResult<Option<Organisation>> {
        Ok(self.read()?.organisations.get(&id).cloned())
    }

    async fn insert_organisation_with_admin(
        &self,
        organisation: Organisation,
        admin: User,
    ) -> DomainResult<(Organisation, User)> {
        if admin.organisation_id != organisation.id {
            return Err(DomainError::validation("admin must belong to the new organisation"));
        }

        let mut tables = self.write()?;
        if tables.organisations.contains_key(organisation.id()) {
            return Err(DomainError::conflict("organisation id already exists"));
        }
        tables.check_user_insertable(&admin)?;

        tables.organisations.insert(organisation.id, organisation.clone());
        tables.insert_user_unchecked(admin.clone());
        Ok((organisation, admin))
    }

    async fn update_organisation(
        &self,
        id: OrganisationId,
        changes: OrganisationChanges,
    ) -> DomainResult<Option<Organisation>> {
        let mut tables = self.write()?;
        let Some(organisation) = tables.organisations.get_mut(&id) else {
            return Ok(None);
        };
        organisation.apply(&changes);
        Ok(Some(organisation.clone()))
    }
}

#[async_trait]
impl UserRepository for InMemoryDirectory {
    async fn insert_user(&self, user: User) -> DomainResult<User> {
        let mut tables = self.write()?;
        if !tables.organisations.contains_key(&user.organisation_id) {
            return Err(DomainError::validation("user must belong to an existing organisation"));
        }
        tables.check_user_insertable(&user)?;
        tables.insert_user_unchecked(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> DomainResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &Email) -> DomainResult<Option<User>> {
        let tables = self.read()?;
        Ok(tables.emails.get(email).and_then(|id| tables.users.get(id)).cloned())
    }

    async fn list_users_by_organisation(&self, organisation_id: OrganisationId) -> DomainResult<Vec<User>> {
        let tables = self.read()?;
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| u.organisation_id == organisation_id)
            .cloned()
            .collect();
        users.sort_by_key(|u| u.listing_key());
        Ok(users)
    }
}
