//! `atlantmetal-core` : shared storefront building blocks.
//!
//! Pure domain primitives (identifiers, error model, marker traits). No IO.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CartItemId, CatalogItemId};
pub use value_object::ValueObject;
