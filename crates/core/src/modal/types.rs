//! Inputs and intents shared by all modals.

use serde::Serialize;

use super::validate::{FormField, ValidationError};

/// Which dialog a modal is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalKind {
    GuestList,
    EarlyTicket,
    Payment,
    Ticket,
}

/// Where a click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed overlay around the dialog.
    Backdrop,
    /// Anywhere inside the dialog body.
    Dialog,
}

/// Raw user input routed to the visible modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalInput {
    /// A keystroke changed a form field.
    Edit { field: FormField, value: String },
    /// The primary action button.
    Submit,
    /// The explicit close control.
    Close,
    Click(ClickTarget),
    /// "Edit my data" from the payment step.
    EditPrevious,
    /// Save the ticket locally.
    Download,
    /// Email the ticket; `None` uses the registrant's address.
    EmailTicket { email: Option<String> },
}

impl ModalInput {
    pub fn edit(field: FormField, value: impl Into<String>) -> Self {
        ModalInput::Edit {
            field,
            value: value.into(),
        }
    }

    /// Close control and backdrop clicks both dismiss a modal.
    pub fn is_dismiss(&self) -> bool {
        matches!(
            self,
            ModalInput::Close | ModalInput::Click(ClickTarget::Backdrop)
        )
    }
}

/// What a modal asks the orchestrator to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalIntent<P> {
    Submit(P),
    Cancel,
    RequestReopenPrevious,
}

/// Actions available on an issued ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketAction {
    Download,
    Email(String),
}

/// Result of feeding one input to a modal: an intent, nothing, or a
/// validation failure the modal also keeps for display.
pub type ModalResult<P> = Result<Option<ModalIntent<P>>, ValidationError>;

/// A dialog driven by the orchestrator.
///
/// Modals keep local form state but never switch to another modal; they
/// only report intents upward.
pub trait Modal {
    type Payload;

    fn kind(&self) -> ModalKind;

    fn is_open(&self) -> bool;

    fn handle(&mut self, input: ModalInput) -> ModalResult<Self::Payload>;
}
