pub mod backend;
pub mod config;
pub mod context;
pub mod modal;
pub mod orchestrator;
pub mod poller;
pub mod testing;
pub mod ticket;

pub use backend::{
    BackendError, GuestRegistration, HttpBackend, PaymentStatusReport, TicketBackend,
};
pub use config::{
    load_config, load_config_from_str, validate_config, BackendConfig, Config, ConfigError,
    EndpointsConfig,
};
pub use context::{ContextTokens, NoContext, SessionContext, StaticContext};
pub use modal::{
    ClickTarget, EarlyTicketModal, FormField, GuestListModal, Modal, ModalInput, ModalIntent,
    ModalKind, PaymentModal, RegistrationForm, TicketAction, TicketDownload, TicketModal,
    ValidationError,
};
pub use orchestrator::{
    FlowError, FlowOrchestrator, FlowOutcome, FlowSnapshot, FlowStage, FlowState, Notice,
    NoticeKind, OrchestratorConfig,
};
pub use poller::{PaymentPoller, PollEvent, PollMessage, PollTarget, PollerConfig, PollerHandle};
pub use ticket::{
    EventSummary, Gender, PaymentSession, PaymentStatus, Price, PurchaseIntent,
    RegistrationRequest, TicketRecord,
};
