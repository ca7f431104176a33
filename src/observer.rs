//! Host UI notifications
//!
//! The controller reports through a [`LifecycleObserver`]. Hosts that prefer a
//! stream of events (async UIs, tests) use [`ChannelObserver`].

use crate::error::LifecycleError;
use crate::provider::{BroadcastResult, SettlementResult};
use crate::state::Step;
use serde::Serialize;
use tokio::sync::mpsc;

/// Delivered to `on_success` once the settle delay has passed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessReport {
    pub tx_hash: String,
    pub broadcast: BroadcastResult,
    pub settlement: SettlementResult,
    /// Explorer link for the transaction, if one is known
    pub explorer_url: Option<String>,
}

/// Callbacks fired by the controller
///
/// All methods default to no-ops. They are called synchronously, in
/// transition order, while the controller holds its transition lock: keep
/// them short, and do not call `submit`, `acknowledge` or `close` from inside
/// one. Reading `step` or `snapshot` is fine.
pub trait LifecycleObserver: Send + Sync {
    /// Every step transition
    fn on_step_change(&self, _step: Step) {}

    /// Once per successful run, after the settle delay
    fn on_success(&self, _report: &SuccessReport) {}

    /// Once per entry into `Error`
    fn on_error(&self, _error: &LifecycleError) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl LifecycleObserver for NoopObserver {}

/// One controller notification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    StepChanged { step: Step },
    Succeeded(SuccessReport),
    Failed(LifecycleError),
}

/// Forwards notifications into an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<LifecycleEvent>,
}

impl ChannelObserver {
    /// Observer plus the receiving end of its events
    pub fn new() -> (Self, mpsc::UnboundedReceiver<LifecycleEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: LifecycleEvent) {
        // Host dropped the receiver; nobody is listening any more
        if self.tx.send(event).is_err() {
            tracing::trace!("Lifecycle event receiver dropped");
        }
    }
}

impl LifecycleObserver for ChannelObserver {
    fn on_step_change(&self, step: Step) {
        self.send(LifecycleEvent::StepChanged { step });
    }

    fn on_success(&self, report: &SuccessReport) {
        self.send(LifecycleEvent::Succeeded(report.clone()));
    }

    fn on_error(&self, error: &LifecycleError) {
        self.send(LifecycleEvent::Failed(error.clone()));
    }
}

impl<O: LifecycleObserver + ?Sized> LifecycleObserver for std::sync::Arc<O> {
    fn on_step_change(&self, step: Step) {
        (**self).on_step_change(step)
    }

    fn on_success(&self, report: &SuccessReport) {
        (**self).on_success(report)
    }

    fn on_error(&self, error: &LifecycleError) {
        (**self).on_error(error)
    }
}
