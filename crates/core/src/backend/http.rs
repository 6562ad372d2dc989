//! reqwest implementation of the ticketing backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::json;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::context::ContextTokens;
use crate::ticket::{PaymentSession, PurchaseIntent, RegistrationRequest};

use super::wire;
use super::{BackendError, GuestRegistration, PaymentStatusReport, TicketBackend};

/// JSON-over-HTTP backend. No retries, no caching.
pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpBackend {
    /// Create a new backend client.
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs as u64));
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Get the base URL without trailing slash.
    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }

    fn status_url(&self, payment_id: &str, tokens: &ContextTokens) -> String {
        let path = self
            .config
            .endpoints
            .payment_status
            .replace("{payment_id}", &urlencoding::encode(payment_id));
        let mut url = self.url(&path);

        let pairs = tokens.query_pairs();
        if !pairs.is_empty() {
            let query = pairs
                .iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }

        url
    }

    /// Send a request, returning the status code and body text.
    async fn send(&self, request: RequestBuilder) -> Result<(u16, String), BackendError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Transport("request timed out".to_string())
            } else if e.is_connect() {
                BackendError::Transport(format!("connection failed: {}", e))
            } else {
                BackendError::Transport(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !(200..300).contains(&status) {
            warn!(status, "Backend answered with non-success status");
        }

        Ok((status, body))
    }
}

#[async_trait]
impl TicketBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn create_guest_registration(
        &self,
        request: &RegistrationRequest,
    ) -> Result<GuestRegistration, BackendError> {
        let url = self.url(&self.config.endpoints.guest_registration);
        debug!(event = %request.event_name, "Registering guest");

        let (status, body) = self.send(self.client.post(&url).json(request)).await?;
        wire::guest_registration(status, &body)
    }

    async fn create_ticket_purchase(
        &self,
        intent: &PurchaseIntent,
    ) -> Result<PaymentSession, BackendError> {
        let url = self.url(&self.config.endpoints.ticket_purchase);
        debug!(
            event = %intent.registration().event_name,
            price = %intent.ticket_price(),
            "Creating ticket purchase"
        );

        let (status, body) = self.send(self.client.post(&url).json(intent)).await?;
        wire::ticket_purchase(status, &body)
    }

    async fn get_payment_status(
        &self,
        payment_id: &str,
        tokens: &ContextTokens,
    ) -> Result<PaymentStatusReport, BackendError> {
        let url = self.status_url(payment_id, tokens);
        let (status, body) = self.send(self.client.get(&url)).await?;
        wire::payment_status(status, &body)
    }

    async fn send_ticket_email(&self, image_data: &str, email: &str) -> Result<(), BackendError> {
        let url = self.url(&self.config.endpoints.ticket_email);
        let payload = json!({
            "image_data": image_data,
            "email": email,
        });

        let (status, body) = self.send(self.client.post(&url).json(&payload)).await?;
        wire::ticket_email(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base_url: &str) -> HttpBackend {
        HttpBackend::new(BackendConfig::new(base_url)).unwrap()
    }

    #[test]
    fn test_url_joins_slashes() {
        let backend = backend("https://api.example.com/");
        assert_eq!(
            backend.url("/tickets/purchase"),
            "https://api.example.com/tickets/purchase"
        );
        assert_eq!(
            backend.url("tickets/email"),
            "https://api.example.com/tickets/email"
        );
    }

    #[test]
    fn test_status_url_encodes_id_and_tokens() {
        let backend = backend("https://api.example.com");
        let tokens = ContextTokens::new(Some("joao 10".into()), Some("b&day".into()));
        assert_eq!(
            backend.status_url("pay/1", &tokens),
            "https://api.example.com/payments/pay%2F1/status?promoter_token=joao%2010&birthday_token=b%26day"
        );
        assert_eq!(
            backend.status_url("123", &ContextTokens::default()),
            "https://api.example.com/payments/123/status"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let backend = backend("http://127.0.0.1:1");
        let err = backend
            .get_payment_status("123", &ContextTokens::default())
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }
}
