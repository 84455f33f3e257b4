//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. To
/// "modify" one, construct a new value. `Email` is the main example here: two
/// addresses that normalise to the same string are the same login key.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
