//! Types for the payment status poller.

use crate::context::ContextTokens;

/// What the poller is watching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTarget {
    /// Orchestrator-issued sequence number of the session.
    pub session_seq: u64,
    pub payment_id: String,
    /// Sent along with every status query.
    pub tokens: ContextTokens,
}

/// Terminal outcome observed by the poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    Approved {
        qr_code_url: Option<String>,
        qr_code_image: Option<String>,
    },
    Rejected {
        message: Option<String>,
    },
}

/// A poll event tagged with the session it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollMessage {
    pub session_seq: u64,
    pub payment_id: String,
    pub event: PollEvent,
}
