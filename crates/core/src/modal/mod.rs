//! The four cooperating dialogs of the confirmation flow.
//!
//! Each modal turns user input into an intent (`Submit`, `Cancel`,
//! `RequestReopenPrevious`). Switching between modals is the
//! orchestrator's job.

mod early_ticket;
mod form;
mod guest_list;
mod mask;
mod payment;
mod ticket;
mod types;
mod validate;

pub use early_ticket::EarlyTicketModal;
pub use form::RegistrationForm;
pub use guest_list::GuestListModal;
pub use mask::{digits_only, format_cpf, format_phone};
pub use payment::PaymentModal;
pub use ticket::{TicketDownload, TicketModal};
pub use types::{
    ClickTarget, Modal, ModalInput, ModalIntent, ModalKind, ModalResult, TicketAction,
};
pub use validate::{is_valid_email, FormField, ValidationError};
