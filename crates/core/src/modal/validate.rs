//! Field validation run by the form modals before they emit a submit.

use std::fmt;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use thiserror::Error;

use crate::ticket::{GenderParseError, PriceUnavailable};

use super::mask::digits_only;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Fields of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    FullName,
    Cpf,
    Phone,
    Email,
    Gender,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormField::FullName => "full name",
            FormField::Cpf => "CPF",
            FormField::Phone => "phone",
            FormField::Email => "email",
            FormField::Gender => "gender",
        };
        f.write_str(name)
    }
}

/// A form the user must correct before it can be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(FormField),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("CPF must have 11 digits")]
    InvalidCpf,

    #[error("phone must have 10 or 11 digits")]
    InvalidPhone,

    #[error(transparent)]
    InvalidGender(#[from] GenderParseError),

    #[error(transparent)]
    PriceUnavailable(#[from] PriceUnavailable),
}

/// Simple `local@domain.tld` shape check.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub(crate) fn require(field: FormField, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

pub(crate) fn check_email(email: &str) -> Result<(), ValidationError> {
    require(FormField::Email, email)?;
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.trim().to_string()))
    }
}

pub(crate) fn check_cpf(cpf: &str) -> Result<(), ValidationError> {
    require(FormField::Cpf, cpf)?;
    if digits_only(cpf).len() == 11 {
        Ok(())
    } else {
        Err(ValidationError::InvalidCpf)
    }
}

pub(crate) fn check_phone(phone: &str) -> Result<(), ValidationError> {
    require(FormField::Phone, phone)?;
    match digits_only(phone).len() {
        10 | 11 => Ok(()),
        _ => Err(ValidationError::InvalidPhone),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("  ana.souza+vip@mail.example.com.br "));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_check_cpf() {
        assert!(check_cpf("123.456.789-00").is_ok());
        assert_eq!(check_cpf("123.456"), Err(ValidationError::InvalidCpf));
        assert_eq!(
            check_cpf("  "),
            Err(ValidationError::MissingField(FormField::Cpf))
        );
    }

    #[test]
    fn test_check_phone() {
        assert!(check_phone("(11) 91234-5678").is_ok());
        assert!(check_phone("(11) 3456-7890").is_ok());
        assert_eq!(check_phone("(11) 9123"), Err(ValidationError::InvalidPhone));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::MissingField(FormField::FullName).to_string(),
            "full name is required"
        );
        assert_eq!(
            ValidationError::InvalidEmail("x".into()).to_string(),
            "invalid email address: x"
        );
    }
}
