//! Error types for txflow
//!
//! Provider calls use `eyre` for ergonomic error handling with context. Providers
//! that know *why* a call failed wrap a [`ProviderError`] in the report so the
//! controller can keep the distinguishing kind for display.

pub use eyre::{eyre, Context, Report, Result};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed provider failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Intent could not be turned into a transaction (unknown counterparty, unsupported asset)
    #[error("{0}")]
    Build(String),
    /// The human or the device declined to sign
    #[error("{0}")]
    UserRejected(String),
    /// Hardware communication failure
    #[error("{0}")]
    Device(String),
    /// Network rejected the signed transaction
    #[error("{0}")]
    Broadcast(String),
    /// Confirmation was not observed in time
    #[error("{0}")]
    SettlementTimeout(String),
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::Build(_) => ErrorKind::Build,
            ProviderError::UserRejected(_) => ErrorKind::UserRejected,
            ProviderError::Device(_) => ErrorKind::Device,
            ProviderError::Broadcast(_) => ErrorKind::Broadcast,
            ProviderError::SettlementTimeout(_) => ErrorKind::SettlementTimeout,
        }
    }
}

/// Kind of failure that moved the controller into the `Error` step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Build,
    UserRejected,
    Device,
    Broadcast,
    SettlementTimeout,
    /// Host-configured signing deadline elapsed
    SignTimeout,
    /// Any rejection that carried no [`ProviderError`]
    UnknownProvider,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Build => "build error",
            ErrorKind::UserRejected => "rejected by user",
            ErrorKind::Device => "device error",
            ErrorKind::Broadcast => "broadcast error",
            ErrorKind::SettlementTimeout => "settlement timeout",
            ErrorKind::SignTimeout => "signing timed out",
            ErrorKind::UnknownProvider => "provider error",
        };
        f.write_str(s)
    }
}

/// Structured error held by the lifecycle state while in `Error`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleError {
    pub kind: ErrorKind,
    /// Provider message, verbatim
    pub message: String,
}

impl LifecycleError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classify a provider report, keeping its full message chain
    pub fn from_report(report: &Report) -> Self {
        let kind = report
            .chain()
            .find_map(|cause| cause.downcast_ref::<ProviderError>())
            .map(ProviderError::kind)
            .unwrap_or(ErrorKind::UnknownProvider);

        Self {
            kind,
            message: format!("{report:#}"),
        }
    }
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for LifecycleError {}
