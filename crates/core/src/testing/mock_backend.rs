//! Mock ticketing backend for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::backend::{
    BackendError, GuestRegistration, PaymentStatusReport, TicketBackend,
};
use crate::context::ContextTokens;
use crate::ticket::{PaymentSession, PurchaseIntent, RegistrationRequest};

use super::fixtures;

/// A recorded status query for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedStatusQuery {
    pub payment_id: String,
    pub tokens: ContextTokens,
    /// When the query was made.
    pub timestamp: chrono::DateTime<Utc>,
}

/// A recorded ticket email for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedEmail {
    pub image_data: String,
    pub email: String,
}

/// Mock implementation of the TicketBackend trait.
///
/// Every endpoint answers from a script queue and falls back to a success
/// when the queue is empty:
/// - guest registration succeeds with a generated QR
/// - purchases create a pending session `pay-<n>`
/// - status checks report pending
/// - emails are accepted
///
/// # Example
///
/// ```rust,ignore
/// let backend = MockBackend::new();
/// backend
///     .script_status("pay-1", vec![Ok(PaymentStatusReport::approved(None, None))])
///     .await;
///
/// // ... drive the flow ...
///
/// assert_eq!(backend.status_calls("pay-1").await, 1);
/// ```
#[derive(Debug, Default)]
pub struct MockBackend {
    guest_script: Arc<RwLock<VecDeque<Result<GuestRegistration, BackendError>>>>,
    purchase_script: Arc<RwLock<VecDeque<Result<PaymentSession, BackendError>>>>,
    status_scripts: Arc<RwLock<HashMap<String, VecDeque<Result<PaymentStatusReport, BackendError>>>>>,
    email_script: Arc<RwLock<VecDeque<Result<(), BackendError>>>>,

    registrations: Arc<RwLock<Vec<RegistrationRequest>>>,
    purchases: Arc<RwLock<Vec<PurchaseIntent>>>,
    status_queries: Arc<RwLock<Vec<RecordedStatusQuery>>>,
    emails: Arc<RwLock<Vec<RecordedEmail>>>,
}

impl MockBackend {
    /// Create a new mock backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue responses for guest registration.
    pub async fn script_guest(&self, responses: Vec<Result<GuestRegistration, BackendError>>) {
        self.guest_script.write().await.extend(responses);
    }

    /// Queue responses for purchase creation.
    pub async fn script_purchase(&self, responses: Vec<Result<PaymentSession, BackendError>>) {
        self.purchase_script.write().await.extend(responses);
    }

    /// Queue status reports for one payment, consumed one per check.
    pub async fn script_status(
        &self,
        payment_id: &str,
        responses: Vec<Result<PaymentStatusReport, BackendError>>,
    ) {
        self.status_scripts
            .write()
            .await
            .entry(payment_id.to_string())
            .or_default()
            .extend(responses);
    }

    /// Queue responses for ticket emails.
    pub async fn script_email(&self, responses: Vec<Result<(), BackendError>>) {
        self.email_script.write().await.extend(responses);
    }

    /// Get all recorded guest registrations.
    pub async fn registrations(&self) -> Vec<RegistrationRequest> {
        self.registrations.read().await.clone()
    }

    /// Get all recorded purchase intents.
    pub async fn purchases(&self) -> Vec<PurchaseIntent> {
        self.purchases.read().await.clone()
    }

    /// Get all recorded status queries.
    pub async fn status_queries(&self) -> Vec<RecordedStatusQuery> {
        self.status_queries.read().await.clone()
    }

    /// Number of status checks made for one payment.
    pub async fn status_calls(&self, payment_id: &str) -> usize {
        self.status_queries
            .read()
            .await
            .iter()
            .filter(|q| q.payment_id == payment_id)
            .count()
    }

    /// Get all recorded ticket emails.
    pub async fn emails(&self) -> Vec<RecordedEmail> {
        self.emails.read().await.clone()
    }
}

#[async_trait]
impl TicketBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn create_guest_registration(
        &self,
        request: &RegistrationRequest,
    ) -> Result<GuestRegistration, BackendError> {
        self.registrations.write().await.push(request.clone());
        match self.guest_script.write().await.pop_front() {
            Some(response) => response,
            None => Ok(fixtures::guest_registration()),
        }
    }

    async fn create_ticket_purchase(
        &self,
        intent: &PurchaseIntent,
    ) -> Result<PaymentSession, BackendError> {
        let mut purchases = self.purchases.write().await;
        purchases.push(intent.clone());
        let n = purchases.len();
        drop(purchases);

        match self.purchase_script.write().await.pop_front() {
            Some(response) => response,
            None => Ok(fixtures::payment_session(&format!("pay-{}", n))),
        }
    }

    async fn get_payment_status(
        &self,
        payment_id: &str,
        tokens: &ContextTokens,
    ) -> Result<PaymentStatusReport, BackendError> {
        self.status_queries.write().await.push(RecordedStatusQuery {
            payment_id: payment_id.to_string(),
            tokens: tokens.clone(),
            timestamp: Utc::now(),
        });

        let next = self
            .status_scripts
            .write()
            .await
            .get_mut(payment_id)
            .and_then(|script| script.pop_front());
        next.unwrap_or_else(|| Ok(PaymentStatusReport::pending()))
    }

    async fn send_ticket_email(&self, image_data: &str, email: &str) -> Result<(), BackendError> {
        self.emails.write().await.push(RecordedEmail {
            image_data: image_data.to_string(),
            email: email.to_string(),
        });
        self.email_script
            .write()
            .await
            .pop_front()
            .unwrap_or(Ok(()))
    }
}
