//! `orgdesk-tenancy`: organisation onboarding, login and management use cases.
//!
//! Services orchestrate the auth primitives over the storage ports; they hold
//! no per-request state and are shared behind `Arc` by the API.

pub mod error;
pub mod management;
pub mod onboarding;

pub use error::ServiceError;
pub use management::{LOGO_NAMESPACE, LogoUpload, OrganisationService, UpdateOrganisation};
pub use onboarding::{CreateOrganisation, LoginOutput, OnboardOrganisation, OnboardingService};
