//! HTTP client for the CRM lead webhook.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LeadError;
use crate::payload::LeadPayload;
use crate::submitter::{LeadReceipt, LeadSubmitter};

/// Lead webhook configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadClientConfig {
    /// Full webhook URL the payload is POSTed to.
    pub endpoint: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Optional bearer token.
    #[serde(default)]
    pub token: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl LeadClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

/// Posts [`LeadPayload`]s as JSON.
///
/// A 2xx answer is a success unless its JSON body carries an `error` field
/// (webhook-style CRMs report refusals that way). A numeric or string
/// `result` field is taken as the created lead's id.
#[derive(Debug, Clone)]
pub struct HttpLeadClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpLeadClient {
    pub fn new(config: &LeadClientConfig) -> Result<Self, LeadError> {
        if config.endpoint.trim().is_empty() {
            return Err(LeadError::Config("lead endpoint is empty".to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LeadError::Config(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LeadSubmitter for HttpLeadClient {
    async fn submit_lead(&self, lead: &LeadPayload) -> Result<LeadReceipt, LeadError> {
        let mut req = self.client.post(&self.endpoint).json(lead);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| LeadError::Network(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| LeadError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "CRM rejected lead request");
            return Err(LeadError::Api(status.as_u16(), body));
        }

        let receipt = interpret_body(&body);
        if receipt.success {
            tracing::info!(lead_id = ?receipt.lead_id, "lead accepted by CRM");
        } else {
            tracing::warn!(error = ?receipt.error, "lead refused by CRM");
        }
        Ok(receipt)
    }
}

fn interpret_body(body: &str) -> LeadReceipt {
    if body.trim().is_empty() {
        return LeadReceipt::accepted(None);
    }
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return LeadReceipt::accepted(None);
    };

    match json.get("error") {
        Some(Value::Null) | None => {}
        Some(error) => {
            let message = json
                .get("error_description")
                .and_then(Value::as_str)
                .or_else(|| error.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return LeadReceipt::rejected(message);
        }
    }

    let lead_id = match json.get("result") {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    };
    LeadReceipt::accepted(lead_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_success() {
        assert_eq!(interpret_body("  "), LeadReceipt::accepted(None));
    }

    #[test]
    fn non_json_body_is_success() {
        assert_eq!(interpret_body("OK"), LeadReceipt::accepted(None));
    }

    #[test]
    fn numeric_result_becomes_lead_id() {
        assert_eq!(
            interpret_body(r#"{"result": 4821}"#),
            LeadReceipt::accepted(Some("4821".to_string()))
        );
    }

    #[test]
    fn error_field_is_refusal() {
        let receipt =
            interpret_body(r#"{"error": "INVALID_PHONE", "error_description": "Phone is invalid"}"#);
        assert!(!receipt.success);
        assert_eq!(receipt.error.as_deref(), Some("Phone is invalid"));
    }

    #[test]
    fn null_error_is_not_a_refusal() {
        assert!(interpret_body(r#"{"error": null, "result": "abc"}"#).success);
    }

    #[test]
    fn empty_endpoint_is_a_config_error() {
        let err = HttpLeadClient::new(&LeadClientConfig::new(" ")).unwrap_err();
        assert!(matches!(err, LeadError::Config(_)));
    }

    #[test]
    fn config_defaults_timeout() {
        let config: LeadClientConfig =
            serde_json::from_str(r#"{"endpoint": "https://crm.example/lead"}"#).unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.token, None);
    }
}
