//! Core flow data types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::price::{Gender, Price};

// ============================================================================
// Event
// ============================================================================

/// The slice of an event the confirmation flow needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    /// Event display name, also sent to the backend as `event_name`.
    pub name: String,
    /// Whether visitors may put their name on the guest list.
    #[serde(default)]
    pub guest_list_enabled: bool,
    /// Whether early (batch) tickets are on sale.
    #[serde(default)]
    pub batch_sales_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_price_men: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_price_women: Option<Price>,
    /// Brand color used to tint the modals (e.g. `#ff3366`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_color: Option<String>,
}

impl EventSummary {
    /// Resolve the ticket price for a gender tier.
    pub fn price_for(&self, gender: Gender) -> Option<Price> {
        match gender {
            Gender::Masculino => self.ticket_price_men,
            Gender::Feminino => self.ticket_price_women,
        }
    }
}

// ============================================================================
// Registration / purchase
// ============================================================================

/// Personal data submitted from the guest-list or early-ticket form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub full_name: String,
    /// Formatted CPF (`###.###.###-##`).
    pub cpf: String,
    /// Formatted phone (`(##) #####-####`).
    pub phone: String,
    pub email: String,
    pub gender: Gender,
    pub event_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promoter_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday_token: Option<String>,
}

/// The event has no price for the requested gender tier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no {gender} ticket price configured for {event_name}")]
pub struct PriceUnavailable {
    pub event_name: String,
    pub gender: Gender,
}

/// A registration with a resolved ticket price, ready for payment.
///
/// Only constructible through [`PurchaseIntent::resolve`], so an intent
/// always carries a real tier price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseIntent {
    #[serde(flatten)]
    registration: RegistrationRequest,
    ticket_price: Price,
}

impl PurchaseIntent {
    /// Resolve the ticket price for the registrant's gender tier.
    pub fn resolve(
        registration: RegistrationRequest,
        event: &EventSummary,
    ) -> Result<Self, PriceUnavailable> {
        let ticket_price = event
            .price_for(registration.gender)
            .ok_or_else(|| PriceUnavailable {
                event_name: event.name.clone(),
                gender: registration.gender,
            })?;

        Ok(Self {
            registration,
            ticket_price,
        })
    }

    pub fn registration(&self) -> &RegistrationRequest {
        &self.registration
    }

    pub fn ticket_price(&self) -> Price {
        self.ticket_price
    }
}

// ============================================================================
// Payment
// ============================================================================

/// Status of a payment session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Approved,
    Rejected,
}

impl PaymentStatus {
    /// Normalize a backend status string.
    ///
    /// Returns `None` for values outside the known in-progress and terminal
    /// sets.
    pub fn from_backend(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "approved" => Some(PaymentStatus::Approved),
            "pending" | "in_process" | "in_mediation" | "authorized" => {
                Some(PaymentStatus::Pending)
            }
            "rejected" | "cancelled" | "canceled" | "expired" | "refunded" | "charged_back"
            | "failed" => Some(PaymentStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Approved => "approved",
            PaymentStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

/// A QR (pix) payment tracked between creation and resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    pub payment_id: String,
    /// QR code image payload (usually a base64 data URL).
    pub qr_code_image: String,
    /// Pix "copia e cola" code.
    pub copy_paste_code: String,
    pub status: PaymentStatus,
    /// When the client received the session.
    pub created_at: DateTime<Utc>,
}

impl PaymentSession {
    /// When the QR code stops being payable, for display.
    pub fn expires_at(&self, validity: Duration) -> DateTime<Utc> {
        self.created_at + validity
    }

    /// Time left on the QR code, clamped at zero.
    pub fn remaining(&self, now: DateTime<Utc>, validity: Duration) -> Duration {
        let left = self.expires_at(validity) - now;
        if left < Duration::zero() {
            Duration::zero()
        } else {
            left
        }
    }
}

// ============================================================================
// Ticket
// ============================================================================

/// Final proof of registration or purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub name: String,
    pub cpf: String,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_price: Option<Price>,
    pub event_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code_image: Option<String>,
}

impl TicketRecord {
    /// Ticket for a guest-list registration.
    pub fn for_guest(
        request: &RegistrationRequest,
        ticket_price: Option<Price>,
        qr_code_url: Option<String>,
        qr_code_image: Option<String>,
    ) -> Self {
        Self {
            name: request.full_name.clone(),
            cpf: request.cpf.clone(),
            gender: request.gender,
            ticket_price,
            event_name: request.event_name.clone(),
            qr_code_url,
            qr_code_image,
        }
    }

    /// Ticket for an approved purchase.
    pub fn for_purchase(
        intent: &PurchaseIntent,
        qr_code_url: Option<String>,
        qr_code_image: Option<String>,
    ) -> Self {
        Self::for_guest(
            intent.registration(),
            Some(intent.ticket_price()),
            qr_code_url,
            qr_code_image,
        )
    }

    /// File name used when the ticket is downloaded.
    pub fn download_file_name(&self) -> String {
        let slug = |s: &str| {
            s.chars()
                .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
                .collect::<String>()
                .split('-')
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join("-")
        };
        format!("ingresso-{}-{}.png", slug(&self.event_name), slug(&self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summer_bash() -> EventSummary {
        EventSummary {
            name: "Summer Bash".to_string(),
            guest_list_enabled: true,
            batch_sales_enabled: true,
            ticket_price_men: Some(Price::from_units(50)),
            ticket_price_women: Some(Price::from_units(40)),
            brand_color: Some("#ff3366".to_string()),
        }
    }

    fn registration(gender: Gender) -> RegistrationRequest {
        RegistrationRequest {
            full_name: "Ana Souza".to_string(),
            cpf: "123.456.789-00".to_string(),
            phone: "(11) 91234-5678".to_string(),
            email: "ana@example.com".to_string(),
            gender,
            event_name: "Summer Bash".to_string(),
            promoter_token: None,
            birthday_token: None,
        }
    }

    #[test]
    fn test_purchase_intent_resolves_tier_price() {
        let intent = PurchaseIntent::resolve(registration(Gender::Feminino), &summer_bash()).unwrap();
        assert_eq!(intent.ticket_price().to_string(), "40.00");

        let intent = PurchaseIntent::resolve(registration(Gender::Masculino), &summer_bash()).unwrap();
        assert_eq!(intent.ticket_price().to_string(), "50.00");
    }

    #[test]
    fn test_purchase_intent_requires_price() {
        let mut event = summer_bash();
        event.ticket_price_women = None;

        let err = PurchaseIntent::resolve(registration(Gender::Feminino), &event).unwrap_err();
        assert_eq!(err.gender, Gender::Feminino);
        assert_eq!(err.event_name, "Summer Bash");
    }

    #[test]
    fn test_purchase_intent_serializes_flat() {
        let intent = PurchaseIntent::resolve(registration(Gender::Feminino), &summer_bash()).unwrap();
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["full_name"], "Ana Souza");
        assert_eq!(json["gender"], "feminino");
        assert_eq!(json["ticket_price"], "40.00");
        assert!(json.get("promoter_token").is_none());
    }

    #[test]
    fn test_payment_status_normalization() {
        assert_eq!(PaymentStatus::from_backend("approved"), Some(PaymentStatus::Approved));
        assert_eq!(PaymentStatus::from_backend("PENDING"), Some(PaymentStatus::Pending));
        assert_eq!(PaymentStatus::from_backend("in_process"), Some(PaymentStatus::Pending));
        assert_eq!(PaymentStatus::from_backend("rejected"), Some(PaymentStatus::Rejected));
        assert_eq!(PaymentStatus::from_backend("cancelled"), Some(PaymentStatus::Rejected));
        assert_eq!(PaymentStatus::from_backend("expired"), Some(PaymentStatus::Rejected));
        assert_eq!(PaymentStatus::from_backend("processing"), None);
        assert_eq!(PaymentStatus::from_backend(""), None);
        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(PaymentStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_event_with_overflowing_price_fails_to_decode() {
        let result = serde_json::from_str::<EventSummary>(
            r#"{"name": "x", "ticket_price_men": "999999999999999999"}"#,
        );
        assert!(result.is_err());

        let event: EventSummary =
            serde_json::from_str(r#"{"name": "x", "ticket_price_women": "R$ 40,00"}"#).unwrap();
        assert_eq!(event.ticket_price_women, Some(Price::from_units(40)));
    }

    #[test]
    fn test_payment_session_remaining() {
        let created_at = Utc::now();
        let session = PaymentSession {
            payment_id: "pay-1".to_string(),
            qr_code_image: "img".to_string(),
            copy_paste_code: "000201".to_string(),
            status: PaymentStatus::Pending,
            created_at,
        };
        let validity = Duration::hours(1);

        assert_eq!(session.expires_at(validity), created_at + Duration::hours(1));
        assert_eq!(
            session.remaining(created_at + Duration::minutes(15), validity),
            Duration::minutes(45)
        );
        assert_eq!(
            session.remaining(created_at + Duration::hours(2), validity),
            Duration::zero()
        );
    }

    #[test]
    fn test_ticket_record_from_purchase() {
        let intent = PurchaseIntent::resolve(registration(Gender::Feminino), &summer_bash()).unwrap();
        let record = TicketRecord::for_purchase(&intent, Some("u".into()), Some("i".into()));

        assert_eq!(record.name, "Ana Souza");
        assert_eq!(record.cpf, "123.456.789-00");
        assert_eq!(record.gender, Gender::Feminino);
        assert_eq!(record.ticket_price, Some(Price::from_units(40)));
        assert_eq!(record.qr_code_url.as_deref(), Some("u"));
        assert_eq!(record.download_file_name(), "ingresso-summer-bash-ana-souza.png");
    }
}
