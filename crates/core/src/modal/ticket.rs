//! Final ticket render / download dialog.

use serde::Serialize;

use crate::ticket::TicketRecord;

use super::types::{Modal, ModalInput, ModalIntent, ModalKind, ModalResult, TicketAction};
use super::validate::check_email;

/// What the host saves when the user downloads the ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketDownload {
    pub file_name: String,
    /// QR image payload as issued by the server.
    pub image_data: Option<String>,
    pub record: TicketRecord,
}

/// Ticket modal.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketModal {
    open: bool,
    record: TicketRecord,
    /// Registrant's address, the default target for emailing the ticket.
    email: String,
    /// Payment that produced this ticket; `None` on the guest-list path.
    payment_id: Option<String>,
}

impl TicketModal {
    pub fn new(record: TicketRecord, email: String, payment_id: Option<String>) -> Self {
        Self {
            open: true,
            record,
            email,
            payment_id,
        }
    }

    pub fn record(&self) -> &TicketRecord {
        &self.record
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn payment_id(&self) -> Option<&str> {
        self.payment_id.as_deref()
    }

    pub fn download(&self) -> TicketDownload {
        TicketDownload {
            file_name: self.record.download_file_name(),
            image_data: self
                .record
                .qr_code_image
                .clone()
                .or_else(|| self.record.qr_code_url.clone()),
            record: self.record.clone(),
        }
    }
}

impl Modal for TicketModal {
    type Payload = TicketAction;

    fn kind(&self) -> ModalKind {
        ModalKind::Ticket
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn handle(&mut self, input: ModalInput) -> ModalResult<TicketAction> {
        if !self.open {
            return Ok(None);
        }
        if input.is_dismiss() {
            self.open = false;
            return Ok(Some(ModalIntent::Cancel));
        }

        match input {
            ModalInput::Download => Ok(Some(ModalIntent::Submit(TicketAction::Download))),
            ModalInput::EmailTicket { email } => {
                let email = email.unwrap_or_else(|| self.email.clone());
                check_email(&email)?;
                Ok(Some(ModalIntent::Submit(TicketAction::Email(
                    email.trim().to_string(),
                ))))
            }
            _ => Ok(None),
        }
    }
}
