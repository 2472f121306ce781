//! Lead payload: the JSON document sent to the CRM.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One cart line as the CRM sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadCartLine {
    pub name: String,
    pub size: String,
    /// Pieces.
    pub quantity: u64,
    /// Tons.
    pub weight: f64,
    /// Line total including delivery, tenge.
    pub price: f64,
    pub branch: String,
    pub gost: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductData {
    pub cart_items: Vec<LeadCartLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    pub name: String,
    pub phone: String,
    /// Which form produced the lead.
    pub form_type: String,
    pub comment: String,
    pub product_data: ProductData,
    pub source: String,
    pub url: String,
    pub user_agent: String,
    /// ISO-8601, millisecond precision, `Z` suffix.
    pub timestamp: String,
}

impl LeadPayload {
    pub fn format_timestamp(at: DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
