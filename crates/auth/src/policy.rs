//! Tenant access policy.
//!
//! - No IO
//! - No panics
//! - Evaluated before any storage access of the guarded operation

use thiserror::Error;

use orgdesk_core::OrganisationId;

use crate::Principal;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthzError {
    #[error("organisation mismatch")]
    TenantMismatch,

    #[error("admin role required")]
    AdminRequired,
}

/// A principal only ever sees its own organisation.
pub fn can_view_organisation(principal: &Principal, organisation_id: OrganisationId) -> bool {
    principal.organisation_id == organisation_id
}

/// Management acts implicitly on the principal's own organisation, so the
/// only question is whether the principal is an admin.
pub fn can_manage_organisation(principal: &Principal) -> bool {
    principal.is_admin
}

pub fn authorize_view(principal: &Principal, organisation_id: OrganisationId) -> Result<(), AuthzError> {
    if can_view_organisation(principal, organisation_id) {
        Ok(())
    } else {
        Err(AuthzError::TenantMismatch)
    }
}

pub fn authorize_manage(principal: &Principal) -> Result<(), AuthzError> {
    if can_manage_organisation(principal) {
        Ok(())
    } else {
        Err(AuthzError::AdminRequired)
    }
}
