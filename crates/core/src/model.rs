//! Organisation and user entities plus their client-facing projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::email::Email;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::{OrganisationId, UserId};

// ─────────────────────────────────────────────────────────────────────────────
// Organisation
// ─────────────────────────────────────────────────────────────────────────────

/// An organisation (tenant).
///
/// # Invariants
/// - `id` and `created_at` never change after creation.
/// - `name` is never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organisation {
    pub id: OrganisationId,
    pub name: String,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Organisation {
    pub fn new(
        name: &str,
        logo_url: Option<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: OrganisationId::new(),
            name: validate_name(name)?,
            logo_url: logo_url.filter(|url| !url.trim().is_empty()),
            created_at,
        })
    }

    /// Apply a partial update in place. Absent fields are left untouched.
    pub fn apply(&mut self, changes: &OrganisationChanges) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(logo_url) = &changes.logo_url {
            self.logo_url = Some(logo_url.clone());
        }
    }

    pub fn view(&self) -> OrganisationView {
        OrganisationView {
            id: self.id,
            name: self.name.clone(),
            logo_url: self.logo_url.clone(),
            created_at: self.created_at,
        }
    }
}

impl Entity for Organisation {
    type Id = OrganisationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Partial update of an organisation. `None` means "unchanged", never "clear".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganisationChanges {
    pub name: Option<String>,
    pub logo_url: Option<String>,
}

impl OrganisationChanges {
    /// Build a change set, treating a blank name as absent.
    pub fn new(name: Option<&str>, logo_url: Option<String>) -> Self {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Self { name, logo_url }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.logo_url.is_none()
    }
}

/// Client-facing projection of an organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganisationView {
    pub id: OrganisationId,
    pub name: String,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn validate_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("organisation name must not be empty"));
    }
    Ok(trimmed.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

/// A member of exactly one organisation.
///
/// `password_hash` holds a one-way digest; it is redacted from `Debug` output
/// and never part of [`UserProfile`].
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: Email,
    pub password_hash: String,
    pub organisation_id: OrganisationId,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        full_name: &str,
        email: Email,
        password_hash: String,
        organisation_id: OrganisationId,
        is_admin: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            full_name: full_name.trim().to_string(),
            email,
            password_hash,
            organisation_id,
            is_admin,
            created_at,
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.to_string(),
            organisation_id: self.organisation_id,
            is_admin: self.is_admin,
            created_at: self.created_at,
        }
    }
}

impl core::fmt::Debug for User {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("organisation_id", &self.organisation_id)
            .field("is_admin", &self.is_admin)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Client-facing projection of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub organisation_id: OrganisationId,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            "Ada Admin",
            Email::parse("ada@acme.com").unwrap(),
            "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            OrganisationId::new(),
            true,
            Utc::now(),
        )
    }

    #[test]
    fn organisation_name_must_not_be_blank() {
        let err = Organisation::new("   ", None, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn blank_logo_reference_is_dropped() {
        let org = Organisation::new(" Acme ", Some(" ".into()), Utc::now()).unwrap();
        assert_eq!(org.name, "Acme");
        assert_eq!(org.logo_url, None);
    }

    #[test]
    fn partial_update_keeps_absent_fields() {
        let mut org = Organisation::new("Acme", Some("/uploads/logos/a.png".into()), Utc::now()).unwrap();
        let before = org.clone();

        org.apply(&OrganisationChanges::new(Some("  "), None));
        assert_eq!(org, before);

        org.apply(&OrganisationChanges::new(Some("Acme Corp"), None));
        assert_eq!(org.name, "Acme Corp");
        assert_eq!(org.logo_url, before.logo_url);
        assert_eq!(org.id, before.id);
        assert_eq!(org.created_at, before.created_at);
    }

    #[test]
    fn profile_never_carries_the_hash() {
        let user = sample_user();
        let json = serde_json::to_value(user.profile()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("argon2"));
        assert_eq!(json["email"], "ada@acme.com");
    }

    #[test]
    fn debug_output_redacts_the_hash() {
        let rendered = format!("{:?}", sample_user());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("argon2"));
    }
}
