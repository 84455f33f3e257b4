//! `orgdesk-auth`: authentication/authorization boundary.
//!
//! Password hashing, signed identity tokens, request identity resolution and
//! the tenant access policy. Decoupled from HTTP; storage is only reached
//! through the `UserRepository` port.

pub mod claims;
pub mod config;
pub mod error;
pub mod password;
pub mod policy;
pub mod principal;
pub mod resolver;
pub mod token;

pub use claims::{TokenClaims, TokenRejection, validate_claims};
pub use config::{AuthConfig, DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS};
pub use error::{AuthError, Unauthenticated};
pub use password::{CredentialHasher, HashCost};
pub use policy::{AuthzError, authorize_manage, authorize_view, can_manage_organisation, can_view_organisation};
pub use principal::Principal;
pub use resolver::IdentityResolver;
pub use token::{Hs256TokenCodec, TokenCodec};
