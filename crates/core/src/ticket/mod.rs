//! Entities carried through the confirmation flow.

mod price;
mod types;

pub use price::{Gender, GenderParseError, Price, PriceParseError};
pub use types::{
    EventSummary, PaymentSession, PaymentStatus, PriceUnavailable, PurchaseIntent,
    RegistrationRequest, TicketRecord,
};
