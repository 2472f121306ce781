//! Catalog domain module.
//!
//! Immutable reference data for the storefront: price-list records and the
//! product categories they are browsed by. Pure data and validation, no IO.

pub mod catalog;
pub mod item;

pub use catalog::Catalog;
pub use item::{PriceItem, PriceItemData, PriceTier, ProductCategory};
