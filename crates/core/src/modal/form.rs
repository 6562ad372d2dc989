//! Personal-data form shared by the guest-list and early-ticket modals.

use crate::context::ContextTokens;
use crate::ticket::{Gender, RegistrationRequest};

use super::mask::{format_cpf, format_phone};
use super::validate::{check_cpf, check_email, check_phone, require, FormField, ValidationError};

/// Field values as typed, with masks already applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub full_name: String,
    pub cpf: String,
    pub phone: String,
    pub email: String,
    /// Raw tier selection; empty until the user picks one.
    pub gender: String,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one keystroke. CPF and phone are re-masked from their digits.
    pub fn set(&mut self, field: FormField, value: &str) {
        match field {
            FormField::FullName => self.full_name = value.to_string(),
            FormField::Cpf => self.cpf = format_cpf(value),
            FormField::Phone => self.phone = format_phone(value),
            FormField::Email => self.email = value.trim().to_string(),
            FormField::Gender => self.gender = value.to_string(),
        }
    }

    pub fn with(mut self, field: FormField, value: &str) -> Self {
        self.set(field, value);
        self
    }

    /// Validate every field and build the request.
    pub fn to_request(
        &self,
        event_name: &str,
        tokens: &ContextTokens,
    ) -> Result<RegistrationRequest, ValidationError> {
        require(FormField::FullName, &self.full_name)?;
        check_cpf(&self.cpf)?;
        check_phone(&self.phone)?;
        check_email(&self.email)?;
        require(FormField::Gender, &self.gender)?;
        let gender: Gender = self.gender.parse()?;

        Ok(RegistrationRequest {
            full_name: self.full_name.trim().to_string(),
            cpf: format_cpf(&self.cpf),
            phone: format_phone(&self.phone),
            email: self.email.trim().to_string(),
            gender,
            event_name: event_name.to_string(),
            promoter_token: tokens.promoter_token.clone(),
            birthday_token: tokens.birthday_token.clone(),
        })
    }
}
