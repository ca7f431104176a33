//! Pre-flight checks that gate leaving the form step

use crate::amount::{self, AmountError};
use crate::asset::AssetContext;
use crate::intent::{TransactionIntent, TxKind, ValidIntent};
use alloy::primitives::U256;
use serde::Serialize;

/// Field-level problem shown inline on the form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "code", content = "detail", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("select a {0}")]
    MissingSelection(&'static str),
    #[error("invalid amount: {0}")]
    InvalidAmount(#[serde(serialize_with = "display")] AmountError),
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("amount exceeds available balance of {available}")]
    InsufficientBalance { available: String },
    #[error("no delegation with {0}")]
    NoDelegation(String),
    #[error("provider balance is unreadable: {0}")]
    UnreadableBalance(#[serde(serialize_with = "display")] AmountError),
}

fn display<S: serde::Serializer>(err: &AmountError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(err)
}

/// Check `intent` against `asset` and return the normalized intent
///
/// Pure: no I/O, no mutation of the asset context.
pub fn validate(
    intent: &TransactionIntent,
    asset: &AssetContext,
) -> Result<ValidIntent, ValidationError> {
    let counterparty = intent
        .counterparty
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or(ValidationError::MissingSelection(
            intent.kind.counterparty_label(),
        ))?;

    if is_negative_decimal(&intent.amount, asset.precision) {
        return Err(ValidationError::NonPositiveAmount);
    }
    let units = amount::parse_units(&intent.amount, asset.precision)
        .map_err(ValidationError::InvalidAmount)?;
    if units == U256::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }

    match intent.kind {
        TxKind::Undelegate => {
            let position = asset
                .delegation(counterparty)
                .ok_or_else(|| ValidationError::NoDelegation(counterparty.to_string()))?;
            let delegated = amount::parse_units(&position.balance, asset.precision)
                .map_err(ValidationError::UnreadableBalance)?;
            ensure_within(units, delegated, &position.balance)?;
        }
        kind if kind.is_outbound() => {
            let available = asset
                .available_units()
                .map_err(ValidationError::UnreadableBalance)?;
            ensure_within(units, available, &asset.available_balance)?;
        }
        _ => {}
    }

    let memo = intent
        .memo
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .or_else(|| intent.kind.default_memo().map(str::to_string));

    Ok(ValidIntent {
        kind: intent.kind,
        amount: amount::format_units(units, asset.precision),
        counterparty: counterparty.to_string(),
        memo,
    })
}

/// `-` followed by a well-formed decimal, however many places it has
fn is_negative_decimal(value: &str, precision: u8) -> bool {
    match value.trim().strip_prefix('-') {
        Some(rest) => matches!(
            amount::parse_units(rest, precision),
            Ok(_) | Err(AmountError::TooPrecise { .. })
        ),
        None => false,
    }
}

fn ensure_within(units: U256, limit: U256, limit_display: &str) -> Result<(), ValidationError> {
    if units > limit {
        return Err(ValidationError::InsufficientBalance {
            available: limit_display.trim().to_string(),
        });
    }
    Ok(())
}
