//! LifecycleController - drives one build → sign → broadcast → settle run

use crate::asset::AssetContext;
use crate::builder::build_request;
use crate::config::LifecycleConfig;
use crate::error::{ErrorKind, LifecycleError};
use crate::intent::{TransactionIntent, ValidIntent};
use crate::observer::{LifecycleObserver, NoopObserver, SuccessReport};
use crate::provider::TransactionProvider;
use crate::state::{LifecycleState, Step};
use crate::validation::{validate, ValidationError};
use parking_lot::Mutex;
use std::sync::Arc;

/// How a call to [`LifecycleController::submit`] ended
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Reached `Success`
    Succeeded(SuccessReport),
    /// Entered `Error`; the host was told through `on_error`
    Failed(LifecycleError),
    /// The wizard was closed while the run was in flight
    Cancelled,
    /// Not in `Form`; duplicate submissions do nothing
    Ignored,
}

/// What was lost when the wizard closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseReport {
    /// Step the wizard was in
    pub step: Step,
    /// Hash recorded before closing, if the broadcast went out
    pub tx_hash: Option<String>,
    /// A broadcast may have reached the network. Only the provider's next
    /// balance refresh can say whether it landed.
    pub outcome_unknown: bool,
}

struct Inner<U, S> {
    state: LifecycleState<U, S>,
    /// Bumped on close; runs from an older session are ignored
    session: u64,
}

/// Transaction lifecycle state machine
///
/// ```text
/// Form --submit--> Confirm --built--> Sign --signed--> Broadcast --settled--> Success
/// Confirm | Sign | Broadcast --failure--> Error --acknowledge--> Form
/// ```
///
/// One controller per open wizard. Methods take `&self` so the host can
/// `close()` while `submit()` is suspended on the provider.
pub struct LifecycleController<P: TransactionProvider, O: LifecycleObserver = NoopObserver> {
    provider: P,
    asset: Arc<AssetContext>,
    config: LifecycleConfig,
    observer: O,
    inner: Mutex<Inner<P::Unsigned, P::Signed>>,
    /// Held across a state change and its notification so observers see
    /// transitions in the order they happened
    transitions: Mutex<()>,
}

impl<P: TransactionProvider> LifecycleController<P> {
    /// Create a controller with default timing and no observer
    pub fn new(provider: P, asset: Arc<AssetContext>) -> Self {
        Self {
            provider,
            asset,
            config: LifecycleConfig::default(),
            observer: NoopObserver,
            inner: Mutex::new(Inner {
                state: LifecycleState::default(),
                session: 0,
            }),
            transitions: Mutex::new(()),
        }
    }
}

impl<P: TransactionProvider, O: LifecycleObserver> LifecycleController<P, O> {
    /// Replace the timing policy
    pub fn with_config(mut self, config: LifecycleConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the observer
    pub fn with_observer<O2: LifecycleObserver>(self, observer: O2) -> LifecycleController<P, O2> {
        LifecycleController {
            provider: self.provider,
            asset: self.asset,
            config: self.config,
            observer,
            inner: self.inner,
            transitions: self.transitions,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn asset(&self) -> &AssetContext {
        &self.asset
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub fn step(&self) -> Step {
        self.inner.lock().state.step
    }

    /// Copy of the current state for rendering
    pub fn snapshot(&self) -> LifecycleState<P::Unsigned, P::Signed> {
        self.inner.lock().state.clone()
    }

    /// Explorer link for the recorded transaction
    pub fn explorer_url(&self) -> Option<String> {
        let tx_hash = self.inner.lock().state.tx_hash.clone()?;
        self.asset.explorer_url(&tx_hash)
    }

    // ========== Transitions ==========

    /// Validate `intent` and, if it passes, run the whole pipeline
    ///
    /// Validation failures leave the wizard on `Form` and come back as `Err`.
    /// Provider failures never do: they end the run in `Error` and are
    /// reported through the observer and [`SubmitOutcome::Failed`].
    pub async fn submit(
        &self,
        intent: &TransactionIntent,
    ) -> Result<SubmitOutcome, ValidationError> {
        match self.begin(intent)? {
            Some((session, valid)) => Ok(self.run(session, valid).await),
            None => Ok(SubmitOutcome::Ignored),
        }
    }

    /// Form -> Confirm if `intent` is valid; `None` outside the form step
    fn begin(&self, intent: &TransactionIntent) -> Result<Option<(u64, ValidIntent)>, ValidationError> {
        let _order = self.transitions.lock();
        let (session, valid) = {
            let mut inner = self.inner.lock();
            if inner.state.step != Step::Form {
                tracing::debug!(step = %inner.state.step, "Ignoring submit outside the form step");
                return Ok(None);
            }

            match validate(intent, &self.asset) {
                Ok(valid) => {
                    inner.state.field_error = None;
                    inner.state.step = Step::Confirm;
                    (inner.session, valid)
                }
                Err(e) => {
                    tracing::debug!(kind = %intent.kind, "Intent rejected: {e}");
                    inner.state.field_error = Some(e.clone());
                    return Err(e);
                }
            }
        };

        self.observer.on_step_change(Step::Confirm);
        Ok(Some((session, valid)))
    }

    /// Leave `Error` for a fresh `Form`
    ///
    /// Returns `false` (and does nothing) from any other step. The retry
    /// rebuilds from scratch; no payload of the failed run is reused.
    pub fn acknowledge(&self) -> bool {
        let _order = self.transitions.lock();
        {
            let mut inner = self.inner.lock();
            if inner.state.step != Step::Error {
                return false;
            }
            if inner.state.failed_at == Some(Step::Broadcast) {
                tracing::warn!(
                    tx_hash = ?inner.state.tx_hash,
                    "Retrying after a broadcast-stage failure; the earlier transaction may still land"
                );
            }
            inner.state = LifecycleState::default();
        }

        self.observer.on_step_change(Step::Form);
        true
    }

    /// Reset to a fresh `Form`, abandoning any run in flight
    ///
    /// The provider call in flight is not aborted: its result is ignored.
    pub fn close(&self) -> CloseReport {
        let _order = self.transitions.lock();
        let previous = {
            let mut inner = self.inner.lock();
            inner.session = inner.session.wrapping_add(1);
            std::mem::take(&mut inner.state)
        };

        let outcome_unknown = previous.step == Step::Broadcast
            || (previous.step == Step::Error && previous.failed_at == Some(Step::Broadcast));
        if outcome_unknown {
            tracing::warn!(
                tx_hash = ?previous.tx_hash,
                "Wizard closed after broadcast; final state comes from the next balance refresh"
            );
        } else {
            tracing::debug!(step = %previous.step, "Wizard closed");
        }

        if previous.step != Step::Form {
            self.observer.on_step_change(Step::Form);
        }

        CloseReport {
            step: previous.step,
            tx_hash: previous.tx_hash,
            outcome_unknown,
        }
    }

    // ========== Pipeline ==========

    async fn run(&self, session: u64, intent: ValidIntent) -> SubmitOutcome {
        let request = build_request(&intent, &self.asset);
        tracing::info!(
            kind = %intent.kind(),
            caip = %self.asset.caip,
            amount = intent.amount(),
            counterparty = intent.counterparty(),
            "Building transaction"
        );

        let unsigned = match self.provider.build_transaction(&self.asset, &request).await {
            Ok(unsigned) => unsigned,
            Err(e) => return self.fail(session, LifecycleError::from_report(&e)),
        };
        if !self.advance(session, Step::Sign, |state| {
            state.unsigned_tx = Some(unsigned.clone())
        }) {
            return SubmitOutcome::Cancelled;
        }

        tracing::info!(caip = %self.asset.caip, "Waiting for signature");
        let signed = match self.sign(&unsigned).await {
            Ok(signed) => signed,
            Err(e) => return self.fail(session, e),
        };
        if !self.advance(session, Step::Broadcast, |state| {
            state.signed_tx = Some(signed.clone())
        }) {
            return SubmitOutcome::Cancelled;
        }

        tracing::info!(caip = %self.asset.caip, "Broadcasting transaction");
        let broadcast = match self.provider.broadcast_transaction(&self.asset, &signed).await {
            Ok(broadcast) => broadcast,
            Err(e) => return self.fail(session, LifecycleError::from_report(&e)),
        };
        tracing::info!(tx_hash = %broadcast.tx_hash, "Transaction broadcast");
        let recorded = self.update(session, |state| {
            state.tx_hash = Some(broadcast.tx_hash.clone())
        });
        if !recorded {
            tracing::warn!(
                tx_hash = %broadcast.tx_hash,
                "Broadcast completed after the wizard closed"
            );
            return SubmitOutcome::Cancelled;
        }

        let settlement = match self
            .provider
            .follow_transaction(&self.asset, &broadcast, &self.config.follow)
            .await
        {
            Ok(settlement) => settlement,
            Err(e) => return self.fail(session, LifecycleError::from_report(&e)),
        };
        if !self.advance(session, Step::Success, |_| {}) {
            return SubmitOutcome::Cancelled;
        }

        let report = SuccessReport {
            tx_hash: broadcast.tx_hash.clone(),
            explorer_url: self.asset.explorer_url(&broadcast.tx_hash),
            broadcast,
            settlement,
        };
        tracing::info!(tx_hash = %report.tx_hash, "Transaction settled");

        tokio::time::sleep(self.config.settle_delay).await;
        self.notify_success(session, &report);

        SubmitOutcome::Succeeded(report)
    }

    async fn sign(&self, unsigned: &P::Unsigned) -> Result<P::Signed, LifecycleError> {
        let signing = self.provider.sign_transaction(&self.asset, unsigned);
        let result = match self.config.sign_timeout {
            None => signing.await,
            Some(limit) => match tokio::time::timeout(limit, signing).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(LifecycleError::new(
                        ErrorKind::SignTimeout,
                        format!("No signature within {limit:?}"),
                    ))
                }
            },
        };
        result.map_err(|e| LifecycleError::from_report(&e))
    }

    // ========== State helpers ==========

    fn notify_success(&self, session: u64, report: &SuccessReport) {
        let _order = self.transitions.lock();
        if self.is_current(session, Step::Success) {
            self.observer.on_success(report);
        } else {
            tracing::debug!(tx_hash = %report.tx_hash, "Wizard closed before success notice");
        }
    }

    fn is_current(&self, session: u64, step: Step) -> bool {
        let inner = self.inner.lock();
        inner.session == session && inner.state.step == step
    }

    /// Mutate the state if `session` is still open
    fn update(
        &self,
        session: u64,
        f: impl FnOnce(&mut LifecycleState<P::Unsigned, P::Signed>),
    ) -> bool {
        let mut inner = self.inner.lock();
        if inner.session != session {
            tracing::debug!(session, "Discarding result of a closed session");
            return false;
        }
        f(&mut inner.state);
        true
    }

    /// Mutate and move to `step`, then notify
    fn advance(
        &self,
        session: u64,
        step: Step,
        f: impl FnOnce(&mut LifecycleState<P::Unsigned, P::Signed>),
    ) -> bool {
        let _order = self.transitions.lock();
        let moved = self.update(session, |state| {
            f(state);
            state.step = step;
        });
        if moved {
            tracing::debug!(%step, "Step changed");
            self.observer.on_step_change(step);
        }
        moved
    }

    fn fail(&self, session: u64, error: LifecycleError) -> SubmitOutcome {
        let _order = self.transitions.lock();
        let recorded = self.update(session, |state| state.fail(error.clone()));
        if !recorded {
            tracing::debug!("Ignoring failure of a closed session: {error}");
            return SubmitOutcome::Cancelled;
        }

        tracing::warn!(kind = ?error.kind, "Transaction failed: {}", error.message);
        self.observer.on_step_change(Step::Error);
        self.observer.on_error(&error);
        SubmitOutcome::Failed(error)
    }
}
