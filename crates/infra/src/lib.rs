//! Infrastructure layer: configuration, directory storage, blob storage.

pub mod blob;
pub mod config;
pub mod store;

pub use blob::{InMemoryBlobStore, LocalBlobStore};
pub use config::{AppConfig, ConfigError};
pub use store::{InMemoryDirectory, PostgresDirectory};
