//! Payment status poller implementation.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::TicketBackend;
use crate::ticket::PaymentStatus;

use super::config::PollerConfig;
use super::types::{PollEvent, PollMessage, PollTarget};

/// Spawns status polling tasks against a backend.
#[derive(Clone)]
pub struct PaymentPoller {
    config: PollerConfig,
    backend: Arc<dyn TicketBackend>,
}

impl PaymentPoller {
    pub fn new(config: PollerConfig, backend: Arc<dyn TicketBackend>) -> Self {
        Self { config, backend }
    }

    /// Start polling `target`, delivering the terminal event on `events`.
    ///
    /// Ticks are serialized: the next interval starts only once the previous
    /// status request has completed.
    pub fn spawn(&self, target: PollTarget, events: mpsc::UnboundedSender<PollMessage>) -> PollerHandle {
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
        let cancelled = Arc::new(AtomicBool::new(false));
        let ticks = Arc::new(AtomicU64::new(0));

        let backend = Arc::clone(&self.backend);
        let interval = self.config.interval();
        let task_cancelled = Arc::clone(&cancelled);
        let task_ticks = Arc::clone(&ticks);
        let task_target = target.clone();

        let task = tokio::spawn(async move {
            let target = task_target;
            info!(payment_id = %target.payment_id, seq = target.session_seq, "Payment poller started");

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
                if task_cancelled.load(Ordering::SeqCst) {
                    break;
                }

                let tick = task_ticks.fetch_add(1, Ordering::SeqCst) + 1;
                let result = tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => break,
                    result = backend.get_payment_status(&target.payment_id, &target.tokens) => result,
                };
                if task_cancelled.load(Ordering::SeqCst) {
                    break;
                }

                let report = match result {
                    Ok(report) => report,
                    Err(e) => {
                        warn!(payment_id = %target.payment_id, tick, "Status check failed, skipping tick: {}", e);
                        continue;
                    }
                };

                let event = match report.status {
                    PaymentStatus::Pending => {
                        debug!(payment_id = %target.payment_id, tick, "Payment still pending");
                        continue;
                    }
                    PaymentStatus::Approved => PollEvent::Approved {
                        qr_code_url: report.qr_code_url,
                        qr_code_image: report.qr_code_image,
                    },
                    PaymentStatus::Rejected => PollEvent::Rejected {
                        message: report.message,
                    },
                };

                info!(payment_id = %target.payment_id, tick, status = report.status.as_str(), "Payment resolved");
                let message = PollMessage {
                    session_seq: target.session_seq,
                    payment_id: target.payment_id.clone(),
                    event,
                };
                if events.send(message).is_err() {
                    debug!(payment_id = %target.payment_id, "Poll receiver dropped");
                }
                break;
            }

            debug!(payment_id = %target.payment_id, "Payment poller stopped");
        });

        PollerHandle {
            target,
            cancelled,
            ticks,
            shutdown_tx,
            task,
        }
    }
}

/// Handle to a running poller. Dropping it cancels the poller.
pub struct PollerHandle {
    target: PollTarget,
    cancelled: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn payment_id(&self) -> &str {
        &self.target.payment_id
    }

    pub fn session_seq(&self) -> u64 {
        self.target.session_seq
    }

    /// Number of status requests issued so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// True once the task has exited, by resolution or cancellation.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop polling now. No tick runs and no event is sent after this.
    pub fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!(payment_id = %self.target.payment_id, "Cancelling payment poller");
        let _ = self.shutdown_tx.send(());
        self.task.abort();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for PollerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollerHandle")
            .field("payment_id", &self.target.payment_id)
            .field("session_seq", &self.target.session_seq)
            .field("cancelled", &self.is_cancelled())
            .field("ticks", &self.ticks())
            .finish()
    }
}
