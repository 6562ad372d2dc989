//! Flow orchestrator.
//!
//! Drives one visitor through the confirmation flow: the guest-list path,
//! the early-ticket path with QR payment, and the issued ticket. At most one
//! modal is open at a time and every move goes through a single transition
//! table.

mod config;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use runner::FlowOrchestrator;
pub use types::{
    FlowError, FlowOutcome, FlowSnapshot, FlowStage, FlowState, Notice, NoticeKind,
};
