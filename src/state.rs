//! Wizard state owned by the lifecycle controller

use crate::error::LifecycleError;
use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wizard step, the single source of truth for what the UI renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Form,
    /// Building the transaction
    Confirm,
    /// Waiting on the signer
    Sign,
    /// Broadcasting and following
    Broadcast,
    Success,
    Error,
}

impl Step {
    /// A pipeline is running
    pub fn is_active(self) -> bool {
        matches!(self, Step::Confirm | Step::Sign | Step::Broadcast)
    }

    /// Something may already be on the network
    pub fn may_have_broadcast(self) -> bool {
        matches!(self, Step::Broadcast | Step::Success)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::Form => "form",
            Step::Confirm => "confirm",
            Step::Sign => "sign",
            Step::Broadcast => "broadcast",
            Step::Success => "success",
            Step::Error => "error",
        };
        f.write_str(s)
    }
}

/// State of one wizard session
///
/// `unsigned_tx` is present from the end of the build until the run ends;
/// `signed_tx` from the end of signing. Neither survives into `Error`.
#[derive(Debug, Clone)]
pub struct LifecycleState<U, S> {
    pub step: Step,
    pub error: Option<LifecycleError>,
    /// Step that was running when `error` occurred
    pub failed_at: Option<Step>,
    /// Last rejected submission, shown inline on the form
    pub field_error: Option<ValidationError>,
    pub unsigned_tx: Option<U>,
    pub signed_tx: Option<S>,
    pub tx_hash: Option<String>,
}

impl<U, S> Default for LifecycleState<U, S> {
    fn default() -> Self {
        Self {
            step: Step::Form,
            error: None,
            failed_at: None,
            field_error: None,
            unsigned_tx: None,
            signed_tx: None,
            tx_hash: None,
        }
    }
}

impl<U, S> LifecycleState<U, S> {
    /// Whether the payloads match what `step` requires
    pub fn payloads_consistent(&self) -> bool {
        match self.step {
            Step::Form => {
                self.unsigned_tx.is_none() && self.signed_tx.is_none() && self.tx_hash.is_none()
            }
            Step::Confirm => self.signed_tx.is_none() && self.tx_hash.is_none(),
            Step::Sign => {
                self.unsigned_tx.is_some() && self.signed_tx.is_none() && self.tx_hash.is_none()
            }
            Step::Broadcast => self.unsigned_tx.is_some() && self.signed_tx.is_some(),
            Step::Success => {
                self.unsigned_tx.is_some() && self.signed_tx.is_some() && self.tx_hash.is_some()
            }
            Step::Error => {
                self.error.is_some() && self.unsigned_tx.is_none() && self.signed_tx.is_none()
            }
        }
    }

    /// Drop the in-flight payloads, keeping any broadcast hash
    pub(crate) fn fail(&mut self, error: LifecycleError) {
        self.failed_at = Some(self.step);
        self.step = Step::Error;
        self.error = Some(error);
        self.unsigned_tx = None;
        self.signed_tx = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_initial_state() {
        let state = LifecycleState::<(), ()>::default();
        assert_eq!(state.step, Step::Form);
        assert!(state.payloads_consistent());
    }

    #[test]
    fn test_sign_requires_unsigned() {
        let mut state = LifecycleState::<u8, u8> {
            step: Step::Sign,
            ..Default::default()
        };
        assert!(!state.payloads_consistent());
        state.unsigned_tx = Some(1);
        assert!(state.payloads_consistent());
    }

    #[test]
    fn test_fail_clears_payloads_keeps_hash() {
        let mut state = LifecycleState::<u8, u8> {
            step: Step::Broadcast,
            unsigned_tx: Some(1),
            signed_tx: Some(2),
            tx_hash: Some("abc".into()),
            ..Default::default()
        };
        state.fail(LifecycleError::new(ErrorKind::SettlementTimeout, "slow"));
        assert_eq!(state.step, Step::Error);
        assert!(state.unsigned_tx.is_none());
        assert!(state.signed_tx.is_none());
        assert_eq!(state.tx_hash.as_deref(), Some("abc"));
        assert_eq!(state.failed_at, Some(Step::Broadcast));
        assert!(state.payloads_consistent());
    }

    #[test]
    fn test_step_flags() {
        assert!(Step::Sign.is_active());
        assert!(!Step::Error.is_active());
        assert!(Step::Broadcast.may_have_broadcast());
        assert!(!Step::Sign.may_have_broadcast());
    }
}
