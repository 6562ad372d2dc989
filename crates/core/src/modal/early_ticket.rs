//! "Buy in advance" dialog.

use crate::context::ContextTokens;
use crate::ticket::{EventSummary, Gender, Price, PurchaseIntent};

use super::form::RegistrationForm;
use super::types::{Modal, ModalInput, ModalIntent, ModalKind, ModalResult};
use super::validate::ValidationError;

/// Early-ticket form. Collects the same data as the guest list, but submits
/// a priced [`PurchaseIntent`] instead of registering right away.
#[derive(Debug, Clone, PartialEq)]
pub struct EarlyTicketModal {
    open: bool,
    event: EventSummary,
    tokens: ContextTokens,
    form: RegistrationForm,
    error: Option<String>,
    /// Set when the flow came back here from the payment step.
    reopened: bool,
    submitting: bool,
}

impl EarlyTicketModal {
    pub fn new(event: EventSummary, tokens: ContextTokens) -> Self {
        Self {
            open: true,
            event,
            tokens,
            form: RegistrationForm::new(),
            error: None,
            reopened: false,
            submitting: false,
        }
    }

    /// Reopen with previously entered data.
    pub fn reopen(
        event: EventSummary,
        tokens: ContextTokens,
        form: RegistrationForm,
        error: Option<String>,
        reopened: bool,
    ) -> Self {
        Self {
            open: true,
            event,
            tokens,
            form,
            error,
            reopened,
            submitting: false,
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

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn was_reopened(&self) -> bool {
        self.reopened
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub(crate) fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    pub fn brand_color(&self) -> Option<&str> {
        self.event.brand_color.as_deref()
    }

    pub fn price_for(&self, gender: Gender) -> Option<Price> {
        self.event.price_for(gender)
    }

    /// Price for the tier currently selected, if it resolves.
    pub fn selected_price(&self) -> Option<Price> {
        self.form
            .gender
            .parse::<Gender>()
            .ok()
            .and_then(|g| self.event.price_for(g))
    }

    fn build_intent(&self) -> Result<PurchaseIntent, ValidationError> {
        let request = self.form.to_request(&self.event.name, &self.tokens)?;
        Ok(PurchaseIntent::resolve(request, &self.event)?)
    }
}

impl Modal for EarlyTicketModal {
    type Payload = PurchaseIntent;

    fn kind(&self) -> ModalKind {
        ModalKind::EarlyTicket
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn handle(&mut self, input: ModalInput) -> ModalResult<PurchaseIntent> {
        if !self.open {
            return Ok(None);
        }
        if input.is_dismiss() {
            self.open = false;
            return Ok(Some(ModalIntent::Cancel));
        }
        if self.submitting {
            return Ok(None);
        }

        match input {
            ModalInput::Edit { field, value } => {
                self.form.set(field, &value);
                Ok(None)
            }
            ModalInput::Submit => match self.build_intent() {
                Ok(intent) => {
                    self.error = None;
                    self.reopened = false;
                    Ok(Some(ModalIntent::Submit(intent)))
                }
                Err(e) => {
                    self.error = Some(e.to_string());
                    Err(e)
                }
            },
            _ => Ok(None),
        }
    }
}
