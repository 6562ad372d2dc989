//! "Name on the list" confirmation dialog.

use crate::context::ContextTokens;
use crate::ticket::{EventSummary, Gender, Price, RegistrationRequest};

use super::form::RegistrationForm;
use super::types::{Modal, ModalInput, ModalIntent, ModalKind, ModalResult};

/// Guest-list confirmation modal.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestListModal {
    open: bool,
    event: EventSummary,
    tokens: ContextTokens,
    form: RegistrationForm,
    error: Option<String>,
    submitting: bool,
}

impl GuestListModal {
    pub fn new(event: EventSummary, tokens: ContextTokens) -> Self {
        Self {
            open: true,
            event,
            tokens,
            form: RegistrationForm::new(),
            error: None,
            submitting: false,
        }
    }

    pub fn event(&self) -> &EventSummary {
        &self.event
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn brand_color(&self) -> Option<&str> {
        self.event.brand_color.as_deref()
    }

    /// Tier price shown next to each gender option.
    pub fn price_for(&self, gender: Gender) -> Option<Price> {
        self.event.price_for(gender)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub(crate) fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    pub(crate) fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

impl Modal for GuestListModal {
    type Payload = RegistrationRequest;

    fn kind(&self) -> ModalKind {
        ModalKind::GuestList
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn handle(&mut self, input: ModalInput) -> ModalResult<RegistrationRequest> {
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
            ModalInput::Submit => match self.form.to_request(&self.event.name, &self.tokens) {
                Ok(request) => {
                    self.error = None;
                    Ok(Some(ModalIntent::Submit(request)))
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
