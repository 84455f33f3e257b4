//! Stored records with a stable identity.

use chrono::{DateTime, Utc};

/// A record whose identity survives every update of its other fields.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Display;

    fn id(&self) -> &Self::Id;

    /// Creation instant; fixed once the record exists.
    fn created_at(&self) -> DateTime<Utc>;

    /// Stable listing order: oldest first, id as tie-break.
    fn listing_key(&self) -> (DateTime<Utc>, Self::Id) {
        (self.created_at(), *self.id())
    }
}
