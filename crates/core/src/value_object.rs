//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two identifiers
/// with the same digits are the same identifier, regardless of where they came
/// from. To "modify" one, build a new one.
///
/// Implemented by [`crate::Identifier`] and [`crate::DestinationUrl`]; records
/// and principals carry a [`crate::RecordId`] and are entities instead.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
