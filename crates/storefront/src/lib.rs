//! `atlantmetal-storefront`
//!
//! **Responsibility:** headless view-models for the storefront UI.
//!
//! - Product browser: category tabs, call-to-action contact modal, cart badges
//! - Cart view: line rows, quantity stepper, totals, order form
//! - Checkout: order submission state machine feeding the CRM lead client
//!
//! A rendering host drives these types and re-renders on cart
//! notifications; no widget toolkit lives here.

pub mod app;
pub mod browser;
pub mod cart_view;
pub mod checkout;
pub mod config;
pub mod format;

pub use app::Storefront;
pub use browser::{CatalogCard, CategoryPanel, ContactModal, ProductBrowser, ShowcaseEntry, Tab};
pub use cart_view::{CartPane, CartRow, CartView, QuantityOutcome};
pub use checkout::{CheckoutError, CheckoutFlow, ClientContext, LeadLabels, OrderForm, SubmitState};
pub use config::StorefrontConfig;
