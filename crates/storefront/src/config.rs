//! Storefront configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use atlantmetal_cart::DEFAULT_STORAGE_KEY;
use atlantmetal_leads::LeadClientConfig;
use serde::{Deserialize, Serialize};

pub const ENV_LEAD_ENDPOINT: &str = "ATLANTMETAL_LEAD_ENDPOINT";
pub const ENV_LEAD_TOKEN: &str = "ATLANTMETAL_LEAD_TOKEN";
pub const ENV_DATA_DIR: &str = "ATLANTMETAL_DATA_DIR";

/// Runtime configuration for a storefront session.
///
/// Every field has a default, so a JSON file only needs to name what it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Directory for persisted state. `None` means the platform data dir.
    pub data_dir: Option<PathBuf>,
    pub storage_key: String,
    pub lead: LeadClientConfig,
    /// `formType` attached to cart orders.
    pub form_type: String,
    /// `source` attached to cart orders.
    pub source: String,
    /// Delay before a successful order closes the cart.
    pub auto_close_ms: u64,
    pub tenge_per_rub: f64,
    /// Price tier used when the caller does not name one.
    pub default_price_category: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            lead: LeadClientConfig::new("http://localhost:8080/crm/lead"),
            form_type: "Заказ из корзины".to_string(),
            source: "Корзина АТЛАНТ МЕТАЛЛ".to_string(),
            auto_close_ms: 3000,
            tenge_per_rub: 5.5,
            default_price_category: "retail".to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid storefront config in {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with process environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `ATLANTMETAL_*` overrides from `lookup`. Blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(endpoint) = get(ENV_LEAD_ENDPOINT) {
            self.lead.endpoint = endpoint;
        }
        if let Some(token) = get(ENV_LEAD_TOKEN) {
            self.lead.token = Some(token);
        }
        if let Some(dir) = get(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.tenge_per_rub.is_finite() && self.tenge_per_rub > 0.0,
            "tenge_per_rub must be positive, got {}",
            self.tenge_per_rub
        );
        anyhow::ensure!(!self.storage_key.trim().is_empty(), "storage_key is empty");
        Ok(())
    }

    pub fn auto_close(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.auto_close_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_storefront_labels() {
        let config = StorefrontConfig::default();
        assert_eq!(config.storage_key, "atlantmetal_cart");
        assert_eq!(config.form_type, "Заказ из корзины");
        assert_eq!(config.source, "Корзина АТЛАНТ МЕТАЛЛ");
        assert_eq!(config.auto_close_ms, 3000);
        assert_eq!(config.lead.timeout_secs, 30);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.json");
        std::fs::write(
            &path,
            r#"{ "lead": { "endpoint": "https://crm.example/lead" }, "auto_close_ms": 1500 }"#,
        )
        .unwrap();

        let config = StorefrontConfig::load(&path).unwrap();
        assert_eq!(config.lead.endpoint, "https://crm.example/lead");
        assert_eq!(config.auto_close_ms, 1500);
        assert_eq!(config.source, "Корзина АТЛАНТ МЕТАЛЛ");
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let err = StorefrontConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }

    #[test]
    fn bad_rate_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.json");
        std::fs::write(&path, r#"{ "tenge_per_rub": 0 }"#).unwrap();

        assert!(StorefrontConfig::load(&path).is_err());
    }

    #[test]
    fn env_overrides_apply_and_blank_is_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_LEAD_ENDPOINT, "https://crm.example/hook"),
            (ENV_LEAD_TOKEN, "   "),
            (ENV_DATA_DIR, "/var/lib/atlantmetal"),
        ]);

        let mut config = StorefrontConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.lead.endpoint, "https://crm.example/hook");
        assert_eq!(config.lead.token, None);
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/atlantmetal")));
    }
}
