//! Backend configuration.
//!
//! The hosted backend is configured entirely through environment
//! variables. A missing or placeholder URL/key pair puts the data layer
//! into disabled mode: every storage operation fails fast with a
//! descriptive error instead of attempting network calls.

use std::env;

/// Markers that indicate a copied-from-docs placeholder rather than a real
/// credential.
const PLACEHOLDER_MARKERS: &[&str] = &["your-project", "your_project", "changeme", "example."];

/// Configuration for the hosted REST backend.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Base URL of the backend (e.g. `https://abc123.backend.host`).
    pub url: String,
    /// Public API key sent as the `apikey` header.
    pub api_key: String,
    /// Optional elevated token for the `Authorization: Bearer` header;
    /// falls back to the API key when absent.
    pub service_token: Option<String>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            service_token: None,
        }
    }
}

impl DbConfig {
    /// Read configuration from `HOMEWIZ_BACKEND_URL`,
    /// `HOMEWIZ_BACKEND_KEY`, and `HOMEWIZ_SERVICE_TOKEN`.
    pub fn from_env() -> Self {
        Self {
            url: env::var("HOMEWIZ_BACKEND_URL").unwrap_or_default(),
            api_key: env::var("HOMEWIZ_BACKEND_KEY").unwrap_or_default(),
            service_token: env::var("HOMEWIZ_SERVICE_TOKEN").ok().filter(|t| !t.is_empty()),
        }
    }

    /// Whether a usable URL/key pair is present. Placeholder values from
    /// setup templates count as unconfigured.
    pub fn is_configured(&self) -> bool {
        let usable = |value: &str| {
            !value.trim().is_empty()
                && !PLACEHOLDER_MARKERS
                    .iter()
                    .any(|marker| value.to_ascii_lowercase().contains(marker))
        };
        usable(&self.url) && usable(&self.api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_values_are_unconfigured() {
        let config = DbConfig {
            url: "https://your-project.backend.host".into(),
            api_key: "real-key".into(),
            service_token: None,
        };
        assert!(!config.is_configured());

        let config = DbConfig {
            url: "https://abc123.backend.host".into(),
            api_key: "anon-key".into(),
            service_token: None,
        };
        assert!(config.is_configured());
    }

    #[test]
    fn empty_values_are_unconfigured() {
        assert!(!DbConfig::default().is_configured());
    }
}
