use serde::{Deserialize, Serialize};

use orgdesk_core::{OrganisationId, OrganisationView, UserProfile};
use orgdesk_tenancy::{CreateOrganisation, LoginOutput, OnboardOrganisation};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateOrganisationRequest {
    pub name: String,
    pub logo_url: Option<String>,
}

impl From<CreateOrganisationRequest> for CreateOrganisation {
    fn from(body: CreateOrganisationRequest) -> Self {
        Self {
            name: body.name,
            logo_url: body.logo_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OnboardRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct OnboardWithAdminRequest {
    pub organisation_name: String,
    pub admin_full_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl From<OnboardWithAdminRequest> for OnboardOrganisation {
    fn from(body: OnboardWithAdminRequest) -> Self {
        Self {
            organisation_name: body.organisation_name,
            admin_full_name: body.admin_full_name,
            admin_email: body.admin_email,
            admin_password: body.admin_password,
        }
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct OrganisationCreatedResponse {
    pub success: bool,
    pub message: &'static str,
    pub organisation_id: OrganisationId,
}

impl OrganisationCreatedResponse {
    pub fn new(message: &'static str, organisation_id: OrganisationId) -> Self {
        Self {
            success: true,
            message,
            organisation_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub user: UserProfile,
}

impl From<LoginOutput> for LoginResponse {
    fn from(out: LoginOutput) -> Self {
        Self {
            access_token: out.access_token,
            token_type: out.token_type,
            expires_at: out.expires_at,
            user: out.user,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MembersResponse {
    pub users: Vec<UserProfile>,
}

#[derive(Debug, Serialize)]
pub struct OrganisationUpdatedResponse {
    pub success: bool,
    pub message: &'static str,
    pub organisation: OrganisationView,
}
