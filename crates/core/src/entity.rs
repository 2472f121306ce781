//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Cart lines are entities: two lines with identical product and quantity
/// are still distinct lines.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
