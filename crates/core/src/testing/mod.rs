//! Testing utilities and a mock backend for flow tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use ticketflow_core::testing::{fixtures, MockBackend};
//!
//! let backend = Arc::new(MockBackend::new());
//! backend.script_purchase(vec![Ok(fixtures::payment_session("pay-1"))]).await;
//!
//! // Use in FlowOrchestrator::new(...)
//! ```

mod mock_backend;

pub use mock_backend::{MockBackend, RecordedEmail, RecordedStatusQuery};

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::Utc;

    use crate::backend::GuestRegistration;
    use crate::context::ContextTokens;
    use crate::modal::{FormField, RegistrationForm};
    use crate::ticket::{
        EventSummary, PaymentSession, PaymentStatus, Price, PurchaseIntent, RegistrationRequest,
    };

    /// An event with both entry paths open. Men pay 50.00, women 40.00.
    pub fn summer_bash() -> EventSummary {
        EventSummary {
            name: "Summer Bash".to_string(),
            guest_list_enabled: true,
            batch_sales_enabled: true,
            ticket_price_men: Some(Price::from_units(50)),
            ticket_price_women: Some(Price::from_units(40)),
            brand_color: Some("#ff3366".to_string()),
        }
    }

    /// A valid form, typed the way a user would (unmasked digits).
    pub fn filled_form(gender: &str) -> RegistrationForm {
        RegistrationForm::new()
            .with(FormField::FullName, "Maria Silva")
            .with(FormField::Cpf, "12345678901")
            .with(FormField::Phone, "11987654321")
            .with(FormField::Email, "maria@example.com")
            .with(FormField::Gender, gender)
    }

    /// The request [`filled_form`] produces for [`summer_bash`].
    pub fn registration(gender: &str) -> RegistrationRequest {
        filled_form(gender)
            .to_request("Summer Bash", &ContextTokens::default())
            .expect("fixture form is valid")
    }

    /// A priced purchase for [`summer_bash`].
    pub fn purchase_intent(gender: &str) -> PurchaseIntent {
        PurchaseIntent::resolve(registration(gender), &summer_bash())
            .expect("fixture event prices both tiers")
    }

    /// A pending pix session.
    pub fn payment_session(payment_id: &str) -> PaymentSession {
        PaymentSession {
            payment_id: payment_id.to_string(),
            qr_code_image: format!("data:image/png;base64,pix-{}", payment_id),
            copy_paste_code: format!("00020126-pix-{}", payment_id),
            status: PaymentStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// A successful guest-list response.
    pub fn guest_registration() -> GuestRegistration {
        GuestRegistration {
            message: Some("Name added to the list!".to_string()),
            qr_code_url: Some("https://tickets.example.com/qr/guest.png".to_string()),
            qr_code_image: Some("data:image/png;base64,guest".to_string()),
        }
    }
}
