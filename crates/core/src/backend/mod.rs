//! HTTP client adapter for the ticketing API.
//!
//! This module provides a `TicketBackend` trait so the flow can run against
//! the real API (`HttpBackend`) or a scripted mock in tests.

mod http;
mod types;
mod wire;

pub use http::HttpBackend;
pub use types::*;
