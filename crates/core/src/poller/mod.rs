//! Payment status polling.
//!
//! A poller checks one payment at a fixed interval until it is approved or
//! rejected, or until its handle is cancelled.

mod config;
mod runner;
mod types;

pub use config::PollerConfig;
pub use runner::{PaymentPoller, PollerHandle};
pub use types::{PollEvent, PollMessage, PollTarget};
