//! Transaction intents for user-facing API

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the user wants the transaction to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    Delegate,
    Undelegate,
    ClaimRewards,
    Swap,
    Transfer,
}

impl TxKind {
    /// Whether the amount leaves the spendable balance
    pub fn is_outbound(self) -> bool {
        matches!(self, TxKind::Delegate | TxKind::Swap | TxKind::Transfer)
    }

    /// Memo attached when the user left it blank
    pub fn default_memo(self) -> Option<&'static str> {
        match self {
            TxKind::Delegate => Some("Delegation via KeepKey Vault"),
            TxKind::Undelegate => Some("Undelegation via KeepKey Vault"),
            TxKind::ClaimRewards => Some("Claim rewards via KeepKey Vault"),
            TxKind::Swap | TxKind::Transfer => None,
        }
    }

    /// What the counterparty field names for this kind
    pub fn counterparty_label(self) -> &'static str {
        match self {
            TxKind::Delegate | TxKind::Undelegate | TxKind::ClaimRewards => "validator",
            TxKind::Transfer => "recipient",
            TxKind::Swap => "destination asset",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TxKind::Delegate => "delegate",
            TxKind::Undelegate => "undelegate",
            TxKind::ClaimRewards => "claim rewards",
            TxKind::Swap => "swap",
            TxKind::Transfer => "transfer",
        };
        f.write_str(s)
    }
}

/// Form input for one wizard run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionIntent {
    pub kind: TxKind,
    /// Decimal string in display units, validated against the balance
    pub amount: String,
    /// Validator address, recipient address or destination asset CAIP
    pub counterparty: Option<String>,
    pub memo: Option<String>,
}

impl TransactionIntent {
    fn new(kind: TxKind, amount: impl Into<String>, counterparty: impl Into<String>) -> Self {
        Self {
            kind,
            amount: amount.into(),
            counterparty: Some(counterparty.into()),
            memo: None,
        }
    }

    /// Stake `amount` with `validator`
    pub fn delegate(amount: impl Into<String>, validator: impl Into<String>) -> Self {
        Self::new(TxKind::Delegate, amount, validator)
    }

    /// Unstake `amount` from `validator`
    pub fn undelegate(amount: impl Into<String>, validator: impl Into<String>) -> Self {
        Self::new(TxKind::Undelegate, amount, validator)
    }

    /// Withdraw `amount` of accrued rewards from `validator`
    pub fn claim_rewards(amount: impl Into<String>, validator: impl Into<String>) -> Self {
        Self::new(TxKind::ClaimRewards, amount, validator)
    }

    /// Send `amount` to `recipient`
    pub fn transfer(amount: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self::new(TxKind::Transfer, amount, recipient)
    }

    /// Swap `amount` into the asset identified by `destination_caip`
    pub fn swap(amount: impl Into<String>, destination_caip: impl Into<String>) -> Self {
        Self::new(TxKind::Swap, amount, destination_caip)
    }

    /// Set memo
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Clear the counterparty (nothing selected yet)
    pub fn without_counterparty(mut self) -> Self {
        self.counterparty = None;
        self
    }
}

/// Intent that passed the validation guard
///
/// Only [`crate::validation::validate`] constructs this, so holding one proves the
/// amount is positive, within balance, and the counterparty is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidIntent {
    pub(crate) kind: TxKind,
    pub(crate) amount: String,
    pub(crate) counterparty: String,
    pub(crate) memo: Option<String>,
}

impl ValidIntent {
    pub fn kind(&self) -> TxKind {
        self.kind
    }

    /// Canonical decimal amount
    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn counterparty(&self) -> &str {
        &self.counterparty
    }

    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }
}
