//! Types for the flow orchestrator.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::modal::{EarlyTicketModal, GuestListModal, PaymentModal, TicketDownload, TicketModal};
use crate::ticket::TicketRecord;

/// Errors that can occur while driving the flow.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The requested move is not in the transition table.
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: FlowStage, to: FlowStage },

    /// Operation needs a different current stage.
    #[error("invalid flow state: expected {expected}, got {actual}")]
    InvalidState { expected: FlowStage, actual: FlowStage },

    /// Input arrived while no modal is open.
    #[error("no modal is open")]
    NoOpenModal,

    #[error("guest list is not enabled for {0}")]
    GuestListDisabled(String),

    #[error("early tickets are not on sale for {0}")]
    BatchSalesDisabled(String),
}

/// Which step the flow is on.
///
/// ```text
/// Idle -> GuestListForm -> TicketIssued
///   |          |
///   |          v
///   |         Idle
///   v
/// EarlyTicketForm -> PaymentPending -> TicketIssued
///                          |
///                          v
///                 EarlyTicketForm (reopened) | Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStage {
    Idle,
    GuestListForm,
    EarlyTicketForm,
    PaymentPending,
    TicketIssued,
}

impl FlowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowStage::Idle => "idle",
            FlowStage::GuestListForm => "guest_list_form",
            FlowStage::EarlyTicketForm => "early_ticket_form",
            FlowStage::PaymentPending => "payment_pending",
            FlowStage::TicketIssued => "ticket_issued",
        }
    }

    /// The transition table.
    pub fn can_transition_to(&self, next: FlowStage) -> bool {
        use FlowStage::*;
        matches!(
            (self, next),
            (Idle, GuestListForm)
                | (Idle, EarlyTicketForm)
                | (GuestListForm, TicketIssued)
                | (GuestListForm, Idle)
                | (EarlyTicketForm, PaymentPending)
                | (EarlyTicketForm, Idle)
                | (PaymentPending, TicketIssued)
                | (PaymentPending, EarlyTicketForm)
                | (PaymentPending, Idle)
                | (TicketIssued, Idle)
        )
    }
}

impl fmt::Display for FlowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current flow state. The variant is the visible modal.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FlowState {
    #[default]
    Idle,
    GuestListForm(GuestListModal),
    EarlyTicketForm(EarlyTicketModal),
    PaymentPending(PaymentModal),
    TicketIssued(TicketModal),
}

impl FlowState {
    pub fn stage(&self) -> FlowStage {
        match self {
            FlowState::Idle => FlowStage::Idle,
            FlowState::GuestListForm(_) => FlowStage::GuestListForm,
            FlowState::EarlyTicketForm(_) => FlowStage::EarlyTicketForm,
            FlowState::PaymentPending(_) => FlowStage::PaymentPending,
            FlowState::TicketIssued(_) => FlowStage::TicketIssued,
        }
    }
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

/// A toast/inline message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// What one orchestrator call did.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutcome {
    /// Input absorbed by the modal (e.g. a keystroke).
    Unchanged,
    /// Stayed on the current step with a message.
    Notice(Notice),
    Transition {
        from: FlowStage,
        to: FlowStage,
        notice: Option<Notice>,
    },
    /// A ticket was issued and the ticket modal opened.
    Issued {
        from: FlowStage,
        record: TicketRecord,
    },
    /// The host should save this file.
    Download(TicketDownload),
    /// A stale or duplicate poll result was dropped.
    Ignored,
}

impl FlowOutcome {
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            FlowOutcome::Notice(notice) => Some(notice),
            FlowOutcome::Transition { notice, .. } => notice.as_ref(),
            _ => None,
        }
    }
}

/// What observers see on the watch channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSnapshot {
    pub stage: FlowStage,
    /// A backend call for the current step is in flight.
    pub submitting: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl Default for FlowSnapshot {
    fn default() -> Self {
        Self {
            stage: FlowStage::Idle,
            submitting: false,
            notice: None,
        }
    }
}
