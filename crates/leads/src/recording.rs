//! In-memory submitter for tests/dev.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::LeadError;
use crate::payload::LeadPayload;
use crate::submitter::{LeadReceipt, LeadSubmitter};

/// Records every lead and answers from a script.
///
/// - No IO
/// - Scripted answers are consumed in order; once exhausted every lead is
///   accepted
#[derive(Debug, Default)]
pub struct RecordingSubmitter {
    received: Mutex<Vec<LeadPayload>>,
    script: Mutex<VecDeque<Result<LeadReceipt, LeadError>>>,
}

impl RecordingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer for the next submission.
    pub fn then(self, answer: Result<LeadReceipt, LeadError>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(answer);
        }
        self
    }

    pub fn received(&self) -> Vec<LeadPayload> {
        self.received
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.received.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LeadSubmitter for RecordingSubmitter {
    async fn submit_lead(&self, lead: &LeadPayload) -> Result<LeadReceipt, LeadError> {
        if let Ok(mut received) = self.received.lock() {
            received.push(lead.clone());
        }
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        next.unwrap_or_else(|| Ok(LeadReceipt::accepted(None)))
    }
}
