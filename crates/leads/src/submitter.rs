use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LeadError;
use crate::payload::LeadPayload;

/// What the CRM said about a submitted lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadReceipt {
    pub success: bool,
    /// CRM-side id of the created lead, when the CRM returns one.
    pub lead_id: Option<String>,
    pub error: Option<String>,
}

impl LeadReceipt {
    pub fn accepted(lead_id: Option<String>) -> Self {
        Self {
            success: true,
            lead_id,
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            lead_id: None,
            error: Some(error.into()),
        }
    }
}

/// Outbound lead submission.
///
/// `Ok` with `success == false` means the CRM answered but refused the lead;
/// `Err` means the lead never got a definite answer. Callers treat both as a
/// failed submission. Retries are the caller's business.
#[async_trait]
pub trait LeadSubmitter: Send + Sync {
    async fn submit_lead(&self, lead: &LeadPayload) -> Result<LeadReceipt, LeadError>;
}
