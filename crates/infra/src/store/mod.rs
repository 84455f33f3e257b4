//! Organisation/user directory adapters.
//!
//! Both adapters enforce email uniqueness themselves; the services never rely
//! on a check-then-insert for correctness.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryDirectory;
pub use postgres::PostgresDirectory;
