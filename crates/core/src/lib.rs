//! `orgdesk-core`: domain foundation building blocks.
//!
//! Entities, typed identifiers and the storage ports the services depend on.
//! No infrastructure concerns live here.

pub mod email;
pub mod entity;
pub mod error;
pub mod id;
pub mod model;
pub mod repository;
pub mod value_object;

pub use email::Email;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{OrganisationId, UserId};
pub use model::{Organisation, OrganisationChanges, OrganisationView, User, UserProfile};
pub use repository::{BlobStore, OrganisationRepository, UserRepository};
pub use value_object::ValueObject;
