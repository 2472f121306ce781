//! Cart domain module.
//!
//! Line items with a tons/pieces/meters quantity kept consistent by the
//! catalog item's weight-per-piece and unit length, a calculator that turns
//! a catalog pick into a line, and a store that persists the whole cart to
//! local storage on every mutation.

pub mod calculator;
pub mod changes;
pub mod item;
pub mod quantity;
pub mod store;

pub use calculator::{Calculator, ExchangeRate};
pub use changes::{CartChange, ChangeFeed, Subscription};
pub use item::{CartItem, NewCartItem};
pub use quantity::{LineQuantity, QuantityInput, UnitConversion};
pub use store::{CartStore, DEFAULT_STORAGE_KEY};
