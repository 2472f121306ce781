//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Catalog records and quantity triples are value objects: they carry no
/// identity of their own and are replaced, never mutated in place.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct LineQuantity { tons: f64, pieces: u64, meters: f64 }
///
/// impl ValueObject for LineQuantity {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
