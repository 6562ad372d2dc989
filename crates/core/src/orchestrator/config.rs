//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the flow orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// How long a payment QR code stays payable (seconds).
    /// Display only; the backend expires sessions on its own.
    #[serde(default = "default_qr_validity")]
    pub qr_validity_secs: u64,

    /// Substrings (case-insensitive) marking a payment creation error the
    /// user can fix by editing the form, e.g. an invalid CPF.
    #[serde(default = "default_recoverable_markers")]
    pub recoverable_error_markers: Vec<String>,

    /// Notice shown when the backend cannot be reached.
    #[serde(default = "default_transport_message")]
    pub transport_error_message: String,

    /// Notice shown when a payment is rejected without a reason.
    #[serde(default = "default_rejected_message")]
    pub payment_rejected_message: String,
}

fn default_qr_validity() -> u64 {
    3600 // 1 hour
}

fn default_recoverable_markers() -> Vec<String> {
    vec!["CPF".to_string()]
}

fn default_transport_message() -> String {
    "Could not reach the server. Please try again.".to_string()
}

fn default_rejected_message() -> String {
    "Payment was not approved. Please start a new purchase.".to_string()
}

impl OrchestratorConfig {
    pub fn qr_validity(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.qr_validity_secs as i64)
    }

    /// Whether a backend refusal should send the user back to fix the form.
    pub fn is_recoverable(&self, reason: &str) -> bool {
        let reason = reason.to_lowercase();
        self.recoverable_error_markers
            .iter()
            .any(|marker| !marker.is_empty() && reason.contains(&marker.to_lowercase()))
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            qr_validity_secs: default_qr_validity(),
            recoverable_error_markers: default_recoverable_markers(),
            transport_error_message: default_transport_message(),
            payment_rejected_message: default_rejected_message(),
        }
    }
}
