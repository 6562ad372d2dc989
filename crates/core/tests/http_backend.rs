//! HttpBackend integration tests against an in-process stub API.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tokio_test::{assert_err, assert_ok};

use common::{fixtures, init_tracing, spawn_stub};
use ticketflow_core::{
    BackendConfig, BackendError, ContextTokens, FlowOrchestrator, FlowOutcome, FlowStage,
    FormField, HttpBackend, ModalInput, NoContext, OrchestratorConfig, PaymentStatus,
    PollerConfig, StaticContext, TicketBackend,
};

/// Requests seen by the stub, by route.
#[derive(Default)]
struct Seen {
    bodies: HashMap<&'static str, Vec<Value>>,
    status_queries: Vec<(String, HashMap<String, String>)>,
}

type Shared = Arc<Mutex<Seen>>;

async fn register(State(seen): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let cpf = body["cpf"].as_str().unwrap_or_default().to_string();
    seen.lock().await.bodies.entry("register").or_default().push(body);

    if cpf == "000.000.000-00" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "CPF já cadastrado" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Nome adicionado à lista",
            "qrCodeUrl": "https://stub/qr/guest.png",
            "qrCodeImage": "data:image/png;base64,Z3Vlc3Q="
        })),
    )
}

async fn purchase(State(seen): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let gender = body["gender"].as_str().unwrap_or_default().to_string();
    seen.lock().await.bodies.entry("purchase").or_default().push(body);

    if gender == "masculino" {
        return (
            StatusCode::OK,
            Json(json!({ "error": "O CPF fornecido é inválido" })),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "paymentId": 98765,
            "qrCodeImage": "data:image/png;base64,cGl4",
            "copyPasteCode": "00020126580014br.gov.bcb.pix",
            "status": "pending"
        })),
    )
}

async fn payment_status(
    State(seen): State<Shared>,
    Path(payment_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    seen.lock()
        .await
        .status_queries
        .push((payment_id.clone(), query));

    match payment_id.as_str() {
        "98765" => (
            StatusCode::OK,
            json!({
                "status": "approved",
                "qr_code_url": "https://stub/qr/98765.png",
                "qr_code_image": "data:image/png;base64,dGlja2V0"
            })
            .to_string(),
        ),
        "mediation" => (StatusCode::OK, json!({ "status": "in_mediation" }).to_string()),
        "expired" => (StatusCode::OK, json!({ "status": "expired" }).to_string()),
        "processing" => (StatusCode::OK, json!({ "status": "processing" }).to_string()),
        "garbage" => (StatusCode::OK, "<html>oops</html>".to_string()),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, String::new()),
    }
}

async fn email(State(seen): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    seen.lock().await.bodies.entry("email").or_default().push(body);
    Json(json!({ "success": true }))
}

async fn stub() -> (String, Shared) {
    init_tracing();
    let seen: Shared = Arc::new(Mutex::new(Seen::default()));
    let router = Router::new()
        .route("/guest-list/register", post(register))
        .route("/tickets/purchase", post(purchase))
        .route("/payments/{payment_id}/status", get(payment_status))
        .route("/tickets/email", post(email))
        .with_state(Arc::clone(&seen));
    (spawn_stub(router).await, seen)
}

fn backend(base_url: &str) -> HttpBackend {
    HttpBackend::new(BackendConfig::new(base_url)).expect("client")
}

#[tokio::test]
async fn test_guest_registration_maps_camel_case() {
    let (base_url, seen) = stub().await;
    let backend = backend(&base_url);

    let registration = assert_ok!(
        backend
            .create_guest_registration(&fixtures::registration("feminino"))
            .await
    );
    assert_eq!(registration.qr_code_url.as_deref(), Some("https://stub/qr/guest.png"));
    assert_eq!(
        registration.qr_code_image.as_deref(),
        Some("data:image/png;base64,Z3Vlc3Q=")
    );
    assert_eq!(registration.message.as_deref(), Some("Nome adicionado à lista"));

    let seen = seen.lock().await;
    let body = &seen.bodies["register"][0];
    assert_eq!(body["full_name"], "Maria Silva");
    assert_eq!(body["cpf"], "123.456.789-01");
    assert_eq!(body["phone"], "(11) 98765-4321");
    assert_eq!(body["gender"], "feminino");
    assert!(body.get("promoter_token").is_none());
}

#[tokio::test]
async fn test_error_body_is_domain_rejection() {
    let (base_url, _seen) = stub().await;
    let backend = backend(&base_url);

    let mut request = fixtures::registration("feminino");
    request.cpf = "000.000.000-00".to_string();
    let err = assert_err!(backend.create_guest_registration(&request).await);
    assert_eq!(err, BackendError::Rejected("CPF já cadastrado".into()));

    // `{error}` with a 200 is a rejection too
    let err = assert_err!(
        backend
            .create_ticket_purchase(&fixtures::purchase_intent("masculino"))
            .await
    );
    assert_eq!(err, BackendError::Rejected("O CPF fornecido é inválido".into()));
}

#[tokio::test]
async fn test_purchase_maps_numeric_payment_id() {
    let (base_url, seen) = stub().await;
    let backend = backend(&base_url);

    let session = assert_ok!(
        backend
            .create_ticket_purchase(&fixtures::purchase_intent("feminino"))
            .await
    );
    assert_eq!(session.payment_id, "98765");
    assert_eq!(session.copy_paste_code, "00020126580014br.gov.bcb.pix");
    assert_eq!(session.status, PaymentStatus::Pending);

    let seen = seen.lock().await;
    assert_eq!(seen.bodies["purchase"][0]["ticket_price"], "40.00");
}

#[tokio::test]
async fn test_payment_status_normalization() {
    let (base_url, _seen) = stub().await;
    let backend = backend(&base_url);
    let tokens = ContextTokens::default();

    let report = assert_ok!(backend.get_payment_status("98765", &tokens).await);
    assert_eq!(report.status, PaymentStatus::Approved);
    assert_eq!(report.qr_code_url.as_deref(), Some("https://stub/qr/98765.png"));

    let report = assert_ok!(backend.get_payment_status("mediation", &tokens).await);
    assert_eq!(report.status, PaymentStatus::Pending);

    let report = assert_ok!(backend.get_payment_status("expired", &tokens).await);
    assert_eq!(report.status, PaymentStatus::Rejected);

    // Unrecognized values keep the session pending
    let report = assert_ok!(backend.get_payment_status("processing", &tokens).await);
    assert_eq!(report.status, PaymentStatus::Pending);
}

#[tokio::test]
async fn test_server_failures_are_transport_errors() {
    let (base_url, _seen) = stub().await;
    let backend = backend(&base_url);
    let tokens = ContextTokens::default();

    let err = assert_err!(backend.get_payment_status("unknown", &tokens).await);
    assert_eq!(err, BackendError::Transport("HTTP 500".into()));

    let err = assert_err!(backend.get_payment_status("garbage", &tokens).await);
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_status_query_carries_context_tokens() {
    let (base_url, seen) = stub().await;
    let backend = backend(&base_url);
    let tokens = ContextTokens::new(Some("joão 10".into()), None);

    assert_ok!(backend.get_payment_status("98765", &tokens).await);

    let seen = seen.lock().await;
    let (payment_id, query) = &seen.status_queries[0];
    assert_eq!(payment_id, "98765");
    assert_eq!(query.get("promoter_token").map(String::as_str), Some("joão 10"));
    assert!(!query.contains_key("birthday_token"));
}

#[tokio::test]
async fn test_send_ticket_email() {
    let (base_url, seen) = stub().await;
    let backend = backend(&base_url);

    assert_ok!(
        backend
            .send_ticket_email("data:image/png;base64,dGlja2V0", "maria@example.com")
            .await
    );

    let seen = seen.lock().await;
    let body = &seen.bodies["email"][0];
    assert_eq!(body["email"], "maria@example.com");
    assert_eq!(body["image_data"], "data:image/png;base64,dGlja2V0");
}

#[tokio::test]
async fn test_full_purchase_over_http() {
    let (base_url, seen) = stub().await;
    let backend = Arc::new(backend(&base_url));
    let mut orchestrator = FlowOrchestrator::new(
        OrchestratorConfig::default(),
        PollerConfig { interval_ms: 20 },
        backend as Arc<dyn TicketBackend>,
        Arc::new(StaticContext::from_query("promoter=joao")),
    );

    orchestrator
        .open_early_ticket(fixtures::summer_bash())
        .unwrap();
    let form = fixtures::filled_form("feminino");
    for (field, value) in [
        (FormField::FullName, form.full_name),
        (FormField::Cpf, form.cpf),
        (FormField::Phone, form.phone),
        (FormField::Email, form.email),
        (FormField::Gender, form.gender),
    ] {
        assert_ok!(
            orchestrator
                .dispatch(ModalInput::edit(field, value))
                .await
        );
    }
    assert_ok!(orchestrator.dispatch(ModalInput::Submit).await);
    assert_eq!(orchestrator.stage(), FlowStage::PaymentPending);

    let outcome = assert_ok!(orchestrator.poll_next().await.expect("poll"));
    let FlowOutcome::Issued { record, .. } = outcome else {
        panic!("expected a ticket, got {:?}", outcome);
    };
    assert_eq!(record.qr_code_url.as_deref(), Some("https://stub/qr/98765.png"));
    assert_eq!(orchestrator.stage(), FlowStage::TicketIssued);

    let seen = seen.lock().await;
    assert_eq!(seen.bodies["purchase"][0]["promoter_token"], "joao");
    assert_eq!(
        seen.status_queries[0].1.get("promoter_token").map(String::as_str),
        Some("joao")
    );
}

#[tokio::test]
async fn test_unreachable_backend_keeps_guest_form() {
    init_tracing();
    let backend = Arc::new(backend("http://127.0.0.1:1"));
    let mut orchestrator = FlowOrchestrator::new(
        OrchestratorConfig::default(),
        PollerConfig::default(),
        backend as Arc<dyn TicketBackend>,
        Arc::new(NoContext::new()),
    );

    orchestrator.open_guest_list(fixtures::summer_bash()).unwrap();
    let form = fixtures::filled_form("masculino");
    for (field, value) in [
        (FormField::FullName, form.full_name),
        (FormField::Cpf, form.cpf),
        (FormField::Phone, form.phone),
        (FormField::Email, form.email),
        (FormField::Gender, form.gender),
    ] {
        assert_ok!(
            orchestrator
                .dispatch(ModalInput::edit(field, value))
                .await
        );
    }

    let outcome = assert_ok!(orchestrator.dispatch(ModalInput::Submit).await);
    assert_eq!(
        outcome.notice().map(|n| n.message.clone()),
        Some(OrchestratorConfig::default().transport_error_message)
    );
    assert_eq!(orchestrator.stage(), FlowStage::GuestListForm);
}
