//! Common test utilities for flow and HTTP tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use ticketflow_core::{
    testing::MockBackend, FlowOrchestrator, FlowOutcome, FormField, ModalInput, NoContext,
    OrchestratorConfig, PollerConfig, SessionContext, TicketBackend,
};

/// Re-export fixtures for test convenience
pub use ticketflow_core::testing::fixtures;

/// Install a test subscriber once. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// An orchestrator wired to a scripted backend.
pub struct TestHarness {
    pub orchestrator: FlowOrchestrator,
    pub backend: Arc<MockBackend>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_context(Arc::new(NoContext::new()))
    }

    pub fn with_context(context: Arc<dyn SessionContext>) -> Self {
        init_tracing();
        let backend = Arc::new(MockBackend::new());
        let orchestrator = FlowOrchestrator::new(
            OrchestratorConfig::default(),
            PollerConfig::default(),
            Arc::clone(&backend) as Arc<dyn TicketBackend>,
            context,
        );
        Self {
            orchestrator,
            backend,
        }
    }

    /// Type a valid form into the open modal, field by field.
    pub async fn fill_form(&mut self, gender: &str) {
        let form = fixtures::filled_form(gender);
        let fields = [
            (FormField::FullName, form.full_name),
            (FormField::Cpf, form.cpf),
            (FormField::Phone, form.phone),
            (FormField::Email, form.email),
            (FormField::Gender, form.gender),
        ];
        for (field, value) in fields {
            let outcome = self
                .orchestrator
                .dispatch(ModalInput::edit(field, value))
                .await
                .expect("edit failed");
            assert_eq!(outcome, FlowOutcome::Unchanged);
        }
    }

    /// Open the early-ticket form, fill it in and submit.
    pub async fn submit_early_ticket(&mut self, gender: &str) -> FlowOutcome {
        self.orchestrator
            .open_early_ticket(fixtures::summer_bash())
            .expect("open early ticket");
        self.fill_form(gender).await;
        self.orchestrator
            .dispatch(ModalInput::Submit)
            .await
            .expect("submit early ticket")
    }

    /// Open the guest-list form, fill it in and submit.
    pub async fn submit_guest_list(&mut self, gender: &str) -> FlowOutcome {
        self.orchestrator
            .open_guest_list(fixtures::summer_bash())
            .expect("open guest list");
        self.fill_form(gender).await;
        self.orchestrator
            .dispatch(ModalInput::Submit)
            .await
            .expect("submit guest list")
    }
}

/// Serve a stub API on an ephemeral local port and return its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
    format!("http://{}", addr)
}
