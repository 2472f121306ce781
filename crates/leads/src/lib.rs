//! `atlantmetal-leads`
//!
//! **Responsibility:** hand a captured lead (contact + cart contents) to the
//! CRM and report whether it was accepted.
//!
//! - [`LeadPayload`]: the structured lead
//! - [`LeadSubmitter`]: the seam the checkout flow depends on
//! - [`HttpLeadClient`]: JSON-over-HTTP webhook client
//! - [`RecordingSubmitter`]: scripted in-memory submitter for tests/dev

pub mod error;
pub mod http;
pub mod payload;
pub mod recording;
pub mod submitter;

pub use error::LeadError;
pub use http::{HttpLeadClient, LeadClientConfig};
pub use payload::{LeadCartLine, LeadPayload, ProductData};
pub use recording::RecordingSubmitter;
pub use submitter::{LeadReceipt, LeadSubmitter};
