use serde::Serialize;

use orgdesk_core::{OrganisationId, User, UserId};

/// The authenticated caller's minimal identity facts.
///
/// Always derived from the current user record, never from token claims, so
/// admin/organisation changes take effect on the next request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub user_id: UserId,
    pub organisation_id: OrganisationId,
    pub is_admin: bool,
}

impl Principal {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            organisation_id: user.organisation_id,
            is_admin: user.is_admin,
        }
    }
}
