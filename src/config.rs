//! Backend configuration loaded from the environment (and `.env`).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::adjustment::TotalPolicy;

const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_DOWNLOAD_DIR: &str = "./downloads";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Where the invoice backend lives and how the client talks to it.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub base_url: String,
    pub generate_path: String,
    pub preview_path: String,
    pub invoices_path: String,
    pub upload_logo_path: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub total_policy: TotalPolicy,
    pub download_dir: PathBuf,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            generate_path: "/generate-invoice".to_string(),
            preview_path: "/api/preview-invoice".to_string(),
            invoices_path: "/api/invoices".to_string(),
            upload_logo_path: "/upload-logo".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("invoice-draft/{}", env!("CARGO_PKG_VERSION")),
            total_policy: TotalPolicy::default(),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
        }
    }
}

impl BackendConfig {
    /// Load `.env` if present, then read the `INVOICE_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("INVOICE_API_BASE_URL") {
            let trimmed = url.trim().trim_end_matches('/');
            if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    key: "INVOICE_API_BASE_URL",
                    value: url,
                });
            }
            config.base_url = trimmed.to_string();
        } else {
            log::warn!(
                "INVOICE_API_BASE_URL not set, using default backend at {}",
                DEFAULT_BASE_URL
            );
        }

        if let Some(raw) = lookup("INVOICE_API_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    key: "INVOICE_API_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("INVOICE_TOTAL_POLICY") {
            config.total_policy = raw.parse().map_err(|_| ConfigError::Invalid {
                key: "INVOICE_TOTAL_POLICY",
                value: raw.clone(),
            })?;
        }

        if let Some(dir) = lookup("INVOICE_DOWNLOAD_DIR") {
            config.download_dir = PathBuf::from(dir);
        }

        if let Some(agent) = lookup("INVOICE_USER_AGENT") {
            config.user_agent = agent;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Absolute URL for an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = BackendConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.total_policy, TotalPolicy::FloorAtZero);
        assert_eq!(config.endpoint(&config.generate_path), "http://localhost:5000/generate-invoice");
    }

    #[test]
    fn test_reads_overrides() {
        let config = BackendConfig::from_lookup(lookup_from(&[
            ("INVOICE_API_BASE_URL", "https://api.example.com/"),
            ("INVOICE_API_TIMEOUT_SECS", "5"),
            ("INVOICE_TOTAL_POLICY", "unclamped"),
            ("INVOICE_DOWNLOAD_DIR", "/tmp/invoices"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.total_policy, TotalPolicy::Unclamped);
        assert_eq!(config.download_dir, PathBuf::from("/tmp/invoices"));
        assert_eq!(
            config.endpoint(&config.preview_path),
            "https://api.example.com/api/preview-invoice"
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad_url = BackendConfig::from_lookup(lookup_from(&[("INVOICE_API_BASE_URL", "localhost")]));
        assert!(matches!(
            bad_url,
            Err(ConfigError::Invalid { key: "INVOICE_API_BASE_URL", .. })
        ));

        let bad_timeout = BackendConfig::from_lookup(lookup_from(&[("INVOICE_API_TIMEOUT_SECS", "0")]));
        assert!(bad_timeout.is_err());

        let bad_policy = BackendConfig::from_lookup(lookup_from(&[("INVOICE_TOTAL_POLICY", "maybe")]));
        assert!(bad_policy.is_err());
    }
}
