//! Payment / QR display dialog.

use chrono::{DateTime, Duration, Utc};

use crate::context::ContextTokens;
use crate::ticket::{EventSummary, PaymentSession, PaymentStatus, PurchaseIntent};

use super::form::RegistrationForm;
use super::types::{Modal, ModalInput, ModalIntent, ModalKind, ModalResult};

/// Payment modal.
///
/// Holds the intent being paid and, once the backend answers, the session
/// with its QR data. The form it came from is kept so the flow can reopen
/// the early-ticket step with the user's data intact.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentModal {
    open: bool,
    event: EventSummary,
    tokens: ContextTokens,
    form: RegistrationForm,
    intent: PurchaseIntent,
    session: Option<PaymentSession>,
    session_seq: Option<u64>,
    qr_validity: Duration,
}

impl PaymentModal {
    /// A payment modal waiting for the backend to create the session.
    pub fn creating(
        event: EventSummary,
        tokens: ContextTokens,
        form: RegistrationForm,
        intent: PurchaseIntent,
        qr_validity: Duration,
    ) -> Self {
        Self {
            open: true,
            event,
            tokens,
            form,
            intent,
            session: None,
            session_seq: None,
            qr_validity,
        }
    }

    pub fn event(&self) -> &EventSummary {
        &self.event
    }

    pub fn tokens(&self) -> &ContextTokens {
        &self.tokens
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn intent(&self) -> &PurchaseIntent {
        &self.intent
    }

    pub fn session(&self) -> Option<&PaymentSession> {
        self.session.as_ref()
    }

    /// Sequence number of the active session, used to gate poll results.
    pub fn session_seq(&self) -> Option<u64> {
        self.session_seq
    }

    /// True while the backend has not yet returned QR data.
    pub fn is_creating(&self) -> bool {
        self.session.is_none()
    }

    pub fn status(&self) -> Option<PaymentStatus> {
        self.session.as_ref().map(|s| s.status)
    }

    pub fn qr_code_image(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.qr_code_image.as_str())
    }

    pub fn copy_paste_code(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.copy_paste_code.as_str())
    }

    /// Time left on the QR code, for the countdown.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.session
            .as_ref()
            .map(|s| s.remaining(now, self.qr_validity))
    }

    pub(crate) fn attach_session(&mut self, session: PaymentSession, seq: u64) {
        self.session = Some(session);
        self.session_seq = Some(seq);
    }

    pub(crate) fn set_status(&mut self, status: PaymentStatus) {
        if let Some(session) = self.session.as_mut() {
            session.status = status;
        }
    }
}

impl Modal for PaymentModal {
    type Payload = ();

    fn kind(&self) -> ModalKind {
        ModalKind::Payment
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn handle(&mut self, input: ModalInput) -> ModalResult<()> {
        if !self.open {
            return Ok(None);
        }
        if input.is_dismiss() {
            self.open = false;
            return Ok(Some(ModalIntent::Cancel));
        }

        match input {
            ModalInput::EditPrevious => {
                self.open = false;
                Ok(Some(ModalIntent::RequestReopenPrevious))
            }
            _ => Ok(None),
        }
    }
}
