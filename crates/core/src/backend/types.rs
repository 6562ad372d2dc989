//! Types for backend operations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::ContextTokens;
use crate::ticket::{PaymentSession, PaymentStatus, PurchaseIntent, RegistrationRequest};

/// Normalized failure of a backend call.
///
/// Every response shape the API produces collapses into one of these two
/// cases, so callers never look at raw bodies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend understood the request and refused it (`error` or
    /// `message` field, or `success: false`). The reason is user-facing.
    #[error("{0}")]
    Rejected(String),

    /// The request did not produce a usable answer: connection failure,
    /// non-2xx without a structured body, or an undecodable body.
    #[error("transport error: {0}")]
    Transport(String),
}

impl BackendError {
    pub fn is_transport(&self) -> bool {
        matches!(self, BackendError::Transport(_))
    }
}

/// Accepted guest-list registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestRegistration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code_image: Option<String>,
}

/// One answer from the payment status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatusReport {
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PaymentStatusReport {
    pub fn pending() -> Self {
        Self {
            status: PaymentStatus::Pending,
            qr_code_url: None,
            qr_code_image: None,
            message: None,
        }
    }

    pub fn approved(qr_code_url: Option<String>, qr_code_image: Option<String>) -> Self {
        Self {
            status: PaymentStatus::Approved,
            qr_code_url,
            qr_code_image,
            message: None,
        }
    }

    pub fn rejected(message: Option<String>) -> Self {
        Self {
            status: PaymentStatus::Rejected,
            qr_code_url: None,
            qr_code_image: None,
            message,
        }
    }
}

/// The ticketing API as seen by the confirmation flow.
#[async_trait]
pub trait TicketBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Put a guest on the event's list.
    async fn create_guest_registration(
        &self,
        request: &RegistrationRequest,
    ) -> Result<GuestRegistration, BackendError>;

    /// Open a QR payment for an early ticket.
    async fn create_ticket_purchase(
        &self,
        intent: &PurchaseIntent,
    ) -> Result<PaymentSession, BackendError>;

    /// Query the current status of a payment.
    async fn get_payment_status(
        &self,
        payment_id: &str,
        tokens: &ContextTokens,
    ) -> Result<PaymentStatusReport, BackendError>;

    /// Email the rendered ticket image. Best-effort.
    async fn send_ticket_email(&self, image_data: &str, email: &str) -> Result<(), BackendError>;
}
