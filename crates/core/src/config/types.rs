use serde::{Deserialize, Serialize};

use crate::orchestrator::OrchestratorConfig;
use crate::poller::PollerConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

/// Backend (JSON API) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// API base URL (e.g., "https://api.example.com")
    pub base_url: String,
    /// Request timeout in seconds. Unset means no client-side timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u32>,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: None,
            endpoints: EndpointsConfig::default(),
        }
    }
}

/// Paths of the backend operations, relative to `base_url`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_guest_registration")]
    pub guest_registration: String,
    #[serde(default = "default_ticket_purchase")]
    pub ticket_purchase: String,
    /// Must contain the `{payment_id}` placeholder
    #[serde(default = "default_payment_status")]
    pub payment_status: String,
    #[serde(default = "default_ticket_email")]
    pub ticket_email: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            guest_registration: default_guest_registration(),
            ticket_purchase: default_ticket_purchase(),
            payment_status: default_payment_status(),
            ticket_email: default_ticket_email(),
        }
    }
}

fn default_guest_registration() -> String {
    "/guest-list/register".to_string()
}

fn default_ticket_purchase() -> String {
    "/tickets/purchase".to_string()
}

fn default_payment_status() -> String {
    "/payments/{payment_id}/status".to_string()
}

fn default_ticket_email() -> String {
    "/tickets/email".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_defaults() {
        let endpoints = EndpointsConfig::default();
        assert_eq!(endpoints.guest_registration, "/guest-list/register");
        assert_eq!(endpoints.ticket_purchase, "/tickets/purchase");
        assert_eq!(endpoints.payment_status, "/payments/{payment_id}/status");
        assert_eq!(endpoints.ticket_email, "/tickets/email");
    }

    #[test]
    fn test_backend_config_partial_endpoints() {
        let toml = r#"
            base_url = "https://api.example.com"

            [endpoints]
            ticket_purchase = "/comprar"
        "#;
        let config: BackendConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.timeout_secs, None);
        assert_eq!(config.endpoints.ticket_purchase, "/comprar");
        assert_eq!(config.endpoints.guest_registration, "/guest-list/register");
    }
}
