//! Flow orchestrator implementation.
//!
//! Owns the current flow state, routes user input to the visible modal and
//! acts on the intents it emits. Backend calls suspend the step that made
//! them; the payment poller is the only concurrent task and reports back
//! over a channel the orchestrator drains.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::{BackendError, TicketBackend};
use crate::config::Config;
use crate::context::SessionContext;
use crate::modal::{
    EarlyTicketModal, GuestListModal, Modal, ModalInput, ModalIntent, ModalResult, PaymentModal,
    TicketAction, TicketModal,
};
use crate::poller::{PaymentPoller, PollEvent, PollMessage, PollTarget, PollerConfig, PollerHandle};
use crate::ticket::{
    EventSummary, PaymentStatus, PurchaseIntent, RegistrationRequest, TicketRecord,
};

use super::config::OrchestratorConfig;
use super::types::{FlowError, FlowOutcome, FlowSnapshot, FlowStage, FlowState, Notice};

/// Modal results collected before the state borrow is released.
enum Routed {
    GuestList(ModalResult<RegistrationRequest>),
    EarlyTicket(ModalResult<PurchaseIntent>),
    Payment(ModalResult<()>),
    Ticket(ModalResult<TicketAction>),
}

/// The flow controller.
pub struct FlowOrchestrator {
    config: OrchestratorConfig,
    backend: Arc<dyn TicketBackend>,
    context: Arc<dyn SessionContext>,
    poller: PaymentPoller,

    // Flow state
    flow_id: Uuid,
    state: FlowState,
    active_poll: Option<PollerHandle>,
    next_seq: u64,
    /// Sessions that already produced a ticket.
    issued_sessions: HashSet<u64>,

    poll_tx: mpsc::UnboundedSender<PollMessage>,
    poll_rx: mpsc::UnboundedReceiver<PollMessage>,
    snapshot_tx: watch::Sender<FlowSnapshot>,
}

impl FlowOrchestrator {
    /// Create a new orchestrator.
    pub fn new(
        config: OrchestratorConfig,
        poller_config: PollerConfig,
        backend: Arc<dyn TicketBackend>,
        context: Arc<dyn SessionContext>,
    ) -> Self {
        let (poll_tx, poll_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(FlowSnapshot::default());
        let poller = PaymentPoller::new(poller_config, Arc::clone(&backend));

        info!(
            backend = backend.name(),
            context = context.source_name(),
            "Flow orchestrator created"
        );

        Self {
            config,
            backend,
            context,
            poller,
            flow_id: Uuid::new_v4(),
            state: FlowState::Idle,
            active_poll: None,
            next_seq: 0,
            issued_sessions: HashSet::new(),
            poll_tx,
            poll_rx,
            snapshot_tx,
        }
    }

    /// Create an orchestrator from the root configuration.
    pub fn from_config(
        config: &Config,
        backend: Arc<dyn TicketBackend>,
        context: Arc<dyn SessionContext>,
    ) -> Self {
        Self::new(
            config.orchestrator.clone(),
            config.poller.clone(),
            backend,
            context,
        )
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn stage(&self) -> FlowStage {
        self.state.stage()
    }

    /// Correlation id of the current flow, for logs.
    pub fn flow_id(&self) -> Uuid {
        self.flow_id
    }

    /// Watch stage changes, submissions in flight and notices.
    pub fn subscribe(&self) -> watch::Receiver<FlowSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// The ticket currently on screen, if any.
    pub fn issued_ticket(&self) -> Option<&TicketRecord> {
        match &self.state {
            FlowState::TicketIssued(modal) => Some(modal.record()),
            _ => None,
        }
    }

    /// The running poller, if a payment is pending.
    pub fn active_poller(&self) -> Option<&PollerHandle> {
        self.active_poll.as_ref()
    }

    // ------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------

    /// "Name on the list" for an event.
    pub fn open_guest_list(&mut self, event: EventSummary) -> Result<FlowOutcome, FlowError> {
        if !event.guest_list_enabled {
            return Err(FlowError::GuestListDisabled(event.name));
        }
        let modal = GuestListModal::new(event, self.context.tokens());
        self.transition(FlowState::GuestListForm(modal), None)
    }

    /// "Buy in advance" for an event.
    pub fn open_early_ticket(&mut self, event: EventSummary) -> Result<FlowOutcome, FlowError> {
        if !event.batch_sales_enabled {
            return Err(FlowError::BatchSalesDisabled(event.name));
        }
        let modal = EarlyTicketModal::new(event, self.context.tokens());
        self.transition(FlowState::EarlyTicketForm(modal), None)
    }

    /// Feed one user input to the visible modal and act on its intent.
    pub async fn dispatch(&mut self, input: ModalInput) -> Result<FlowOutcome, FlowError> {
        let routed = match &mut self.state {
            FlowState::Idle => return Err(FlowError::NoOpenModal),
            FlowState::GuestListForm(modal) => Routed::GuestList(modal.handle(input)),
            FlowState::EarlyTicketForm(modal) => Routed::EarlyTicket(modal.handle(input)),
            FlowState::PaymentPending(modal) => Routed::Payment(modal.handle(input)),
            FlowState::TicketIssued(modal) => Routed::Ticket(modal.handle(input)),
        };

        match routed {
            Routed::GuestList(result) => match self.validated(result)? {
                Ok(Some(ModalIntent::Submit(request))) => self.submit_guest_list(request).await,
                Ok(Some(ModalIntent::Cancel)) => self.transition(FlowState::Idle, None),
                Ok(_) => Ok(FlowOutcome::Unchanged),
                Err(outcome) => Ok(outcome),
            },
            Routed::EarlyTicket(result) => match self.validated(result)? {
                Ok(Some(ModalIntent::Submit(intent))) => self.start_payment(intent).await,
                Ok(Some(ModalIntent::Cancel)) => self.transition(FlowState::Idle, None),
                Ok(_) => Ok(FlowOutcome::Unchanged),
                Err(outcome) => Ok(outcome),
            },
            Routed::Payment(result) => match self.validated(result)? {
                Ok(Some(ModalIntent::Cancel)) => {
                    self.transition(FlowState::Idle, Some(Notice::info("Payment cancelled.")))
                }
                Ok(Some(ModalIntent::RequestReopenPrevious)) => self.reopen_early_ticket(None, true),
                Ok(_) => Ok(FlowOutcome::Unchanged),
                Err(outcome) => Ok(outcome),
            },
            Routed::Ticket(result) => match self.validated(result)? {
                Ok(Some(ModalIntent::Submit(TicketAction::Download))) => self.download(),
                Ok(Some(ModalIntent::Submit(TicketAction::Email(email)))) => {
                    Ok(self.email_ticket(&email).await)
                }
                Ok(Some(ModalIntent::Cancel)) => self.transition(FlowState::Idle, None),
                Ok(_) => Ok(FlowOutcome::Unchanged),
                Err(outcome) => Ok(outcome),
            },
        }
    }

    /// Turn a modal validation failure into an inline notice.
    #[allow(clippy::type_complexity)]
    fn validated<P>(
        &self,
        result: ModalResult<P>,
    ) -> Result<Result<Option<ModalIntent<P>>, FlowOutcome>, FlowError> {
        match result {
            Ok(intent) => Ok(Ok(intent)),
            Err(e) => {
                debug!(flow_id = %self.flow_id, stage = %self.stage(), "Form rejected: {}", e);
                let notice = Notice::error(e.to_string());
                self.publish(false, Some(notice.clone()));
                Ok(Err(FlowOutcome::Notice(notice)))
            }
        }
    }

    // ------------------------------------------------------------------
    // Guest-list path
    // ------------------------------------------------------------------

    async fn submit_guest_list(
        &mut self,
        request: RegistrationRequest,
    ) -> Result<FlowOutcome, FlowError> {
        self.set_submitting(true);
        let result = self.backend.create_guest_registration(&request).await;
        self.set_submitting(false);

        match result {
            Ok(registration) => {
                let price = match &self.state {
                    FlowState::GuestListForm(modal) => modal.price_for(request.gender),
                    _ => None,
                };
                info!(flow_id = %self.flow_id, event = %request.event_name, "Guest registered");
                let record = TicketRecord::for_guest(
                    &request,
                    price,
                    registration.qr_code_url,
                    registration.qr_code_image,
                );
                self.issue(record, request.email, None, None, registration.message)
            }
            Err(e) => {
                let message = self.failure_message(&e);
                if let FlowState::GuestListForm(modal) = &mut self.state {
                    modal.set_error(Some(message.clone()));
                }
                warn!(flow_id = %self.flow_id, "Guest registration failed: {}", e);
                let notice = Notice::error(message);
                self.publish(false, Some(notice.clone()));
                Ok(FlowOutcome::Notice(notice))
            }
        }
    }

    // ------------------------------------------------------------------
    // Early-ticket / payment path
    // ------------------------------------------------------------------

    async fn start_payment(&mut self, intent: PurchaseIntent) -> Result<FlowOutcome, FlowError> {
        let FlowState::EarlyTicketForm(form_modal) = &self.state else {
            return Err(FlowError::InvalidState {
                expected: FlowStage::EarlyTicketForm,
                actual: self.stage(),
            });
        };
        let payment = PaymentModal::creating(
            form_modal.event().clone(),
            form_modal.tokens().clone(),
            form_modal.form().clone(),
            intent.clone(),
            self.config.qr_validity(),
        );
        self.transition(FlowState::PaymentPending(payment), None)?;

        self.set_submitting(true);
        let result = self.backend.create_ticket_purchase(&intent).await;
        self.set_submitting(false);

        match result {
            Ok(session) if session.status == PaymentStatus::Rejected => {
                warn!(flow_id = %self.flow_id, payment_id = %session.payment_id, "Payment rejected at creation");
                let message = self.config.payment_rejected_message.clone();
                self.transition(FlowState::Idle, Some(Notice::error(message)))
            }
            Ok(session) => {
                self.next_seq += 1;
                let seq = self.next_seq;
                let target = PollTarget {
                    session_seq: seq,
                    payment_id: session.payment_id.clone(),
                    tokens: self.context.tokens(),
                };
                info!(
                    flow_id = %self.flow_id,
                    payment_id = %session.payment_id,
                    seq,
                    "Payment session created"
                );

                if let FlowState::PaymentPending(modal) = &mut self.state {
                    modal.attach_session(session, seq);
                }
                self.stop_poller();
                self.active_poll = Some(self.poller.spawn(target, self.poll_tx.clone()));
                self.publish(false, None);

                Ok(FlowOutcome::Transition {
                    from: FlowStage::EarlyTicketForm,
                    to: FlowStage::PaymentPending,
                    notice: None,
                })
            }
            Err(BackendError::Rejected(reason)) => {
                let recoverable = self.config.is_recoverable(&reason);
                warn!(flow_id = %self.flow_id, recoverable, "Payment creation refused: {}", reason);
                self.reopen_early_ticket(Some(reason), recoverable)
            }
            Err(e @ BackendError::Transport(_)) => {
                warn!(flow_id = %self.flow_id, "Payment creation failed: {}", e);
                let message = self.config.transport_error_message.clone();
                self.reopen_early_ticket(Some(message), false)
            }
        }
    }

    /// Close the payment modal and bring the early-ticket form back with the
    /// data the user entered.
    fn reopen_early_ticket(
        &mut self,
        error: Option<String>,
        reopened: bool,
    ) -> Result<FlowOutcome, FlowError> {
        let FlowState::PaymentPending(payment) = &self.state else {
            return Err(FlowError::InvalidState {
                expected: FlowStage::PaymentPending,
                actual: self.stage(),
            });
        };
        let modal = EarlyTicketModal::reopen(
            payment.event().clone(),
            payment.tokens().clone(),
            payment.form().clone(),
            error.clone(),
            reopened,
        );
        self.transition(FlowState::EarlyTicketForm(modal), error.map(Notice::error))
    }

    // ------------------------------------------------------------------
    // Poller events
    // ------------------------------------------------------------------

    /// Wait for the next poller message.
    pub async fn recv_poll(&mut self) -> Option<PollMessage> {
        self.poll_rx.recv().await
    }

    /// Wait for the next poller message and apply it.
    pub async fn poll_next(&mut self) -> Option<Result<FlowOutcome, FlowError>> {
        let message = self.recv_poll().await?;
        Some(self.apply_poll(message))
    }

    /// Apply a poller message.
    ///
    /// Messages for a session other than the active one are dropped, and a
    /// session that already produced a ticket never produces another.
    pub fn apply_poll(&mut self, message: PollMessage) -> Result<FlowOutcome, FlowError> {
        if self.issued_sessions.contains(&message.session_seq) {
            debug!(
                flow_id = %self.flow_id,
                payment_id = %message.payment_id,
                "Ticket already issued for session, ignoring"
            );
            return Ok(FlowOutcome::Ignored);
        }

        let stage = self.state.stage();
        let modal = match &mut self.state {
            FlowState::PaymentPending(modal) if modal.session_seq() == Some(message.session_seq) => {
                modal
            }
            _ => {
                debug!(
                    flow_id = %self.flow_id,
                    payment_id = %message.payment_id,
                    seq = message.session_seq,
                    %stage,
                    "Stale poll result, ignoring"
                );
                return Ok(FlowOutcome::Ignored);
            }
        };

        match message.event {
            PollEvent::Approved {
                qr_code_url,
                qr_code_image,
            } => {
                modal.set_status(PaymentStatus::Approved);
                let record = TicketRecord::for_purchase(modal.intent(), qr_code_url, qr_code_image);
                let email = modal.intent().registration().email.clone();
                info!(flow_id = %self.flow_id, payment_id = %message.payment_id, "Payment approved");
                self.issue(
                    record,
                    email,
                    Some(message.payment_id),
                    Some(message.session_seq),
                    None,
                )
            }
            PollEvent::Rejected { message: reason } => {
                modal.set_status(PaymentStatus::Rejected);
                warn!(flow_id = %self.flow_id, payment_id = %message.payment_id, "Payment rejected");
                let text = reason.unwrap_or_else(|| self.config.payment_rejected_message.clone());
                self.transition(FlowState::Idle, Some(Notice::error(text)))
            }
        }
    }

    // ------------------------------------------------------------------
    // Ticket
    // ------------------------------------------------------------------

    fn issue(
        &mut self,
        record: TicketRecord,
        email: String,
        payment_id: Option<String>,
        session_seq: Option<u64>,
        message: Option<String>,
    ) -> Result<FlowOutcome, FlowError> {
        if let Some(seq) = session_seq {
            if !self.issued_sessions.insert(seq) {
                return Ok(FlowOutcome::Ignored);
            }
        }

        let from = self.stage();
        let notice = Notice::success(message.unwrap_or_else(|| "Ticket confirmed!".to_string()));
        let modal = TicketModal::new(record.clone(), email, payment_id);
        self.transition(FlowState::TicketIssued(modal), Some(notice))?;
        Ok(FlowOutcome::Issued { from, record })
    }

    fn download(&self) -> Result<FlowOutcome, FlowError> {
        match &self.state {
            FlowState::TicketIssued(modal) => Ok(FlowOutcome::Download(modal.download())),
            _ => Err(FlowError::InvalidState {
                expected: FlowStage::TicketIssued,
                actual: self.stage(),
            }),
        }
    }

    /// Best-effort email. Never changes state and never fails the flow.
    async fn email_ticket(&mut self, email: &str) -> FlowOutcome {
        let image = match &self.state {
            FlowState::TicketIssued(modal) => modal.download().image_data,
            _ => None,
        };
        let Some(image) = image else {
            let notice = Notice::warning("This ticket has no image to send.");
            self.publish(false, Some(notice.clone()));
            return FlowOutcome::Notice(notice);
        };

        self.set_submitting(true);
        let result = self.backend.send_ticket_email(&image, email).await;
        self.set_submitting(false);

        let notice = match result {
            Ok(()) => {
                info!(flow_id = %self.flow_id, "Ticket emailed");
                Notice::success(format!("Ticket sent to {}.", email))
            }
            Err(e) => {
                warn!(flow_id = %self.flow_id, "Ticket email failed: {}", e);
                Notice::warning("Could not email the ticket. You can still download it.")
            }
        };
        self.publish(false, Some(notice.clone()));
        FlowOutcome::Notice(notice)
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// The single place the flow state changes.
    fn transition(
        &mut self,
        next: FlowState,
        notice: Option<Notice>,
    ) -> Result<FlowOutcome, FlowError> {
        let from = self.state.stage();
        let to = next.stage();
        if !from.can_transition_to(to) {
            return Err(FlowError::InvalidTransition { from, to });
        }

        if from == FlowStage::PaymentPending {
            self.stop_poller();
        }
        if from == FlowStage::Idle {
            self.flow_id = Uuid::new_v4();
        }

        info!(flow_id = %self.flow_id, %from, %to, "Flow transition");
        self.state = next;
        self.publish(false, notice.clone());

        Ok(FlowOutcome::Transition { from, to, notice })
    }

    fn stop_poller(&mut self) {
        if let Some(handle) = self.active_poll.take() {
            debug!(
                flow_id = %self.flow_id,
                payment_id = handle.payment_id(),
                ticks = handle.ticks(),
                "Stopping payment poller"
            );
            handle.cancel();
        }
    }

    fn failure_message(&self, error: &BackendError) -> String {
        match error {
            BackendError::Rejected(reason) => reason.clone(),
            BackendError::Transport(_) => self.config.transport_error_message.clone(),
        }
    }

    fn set_submitting(&mut self, submitting: bool) {
        match &mut self.state {
            FlowState::GuestListForm(modal) => modal.set_submitting(submitting),
            FlowState::EarlyTicketForm(modal) => modal.set_submitting(submitting),
            _ => {}
        }
        let notice = self.snapshot_tx.borrow().notice.clone();
        self.publish(submitting, if submitting { None } else { notice });
    }

    fn publish(&self, submitting: bool, notice: Option<Notice>) {
        self.snapshot_tx.send_replace(FlowSnapshot {
            stage: self.state.stage(),
            submitting,
            notice,
        });
    }
}
