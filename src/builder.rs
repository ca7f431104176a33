//! Maps a validated intent to the provider's build call

use crate::asset::AssetContext;
use crate::intent::{TxKind, ValidIntent};
use serde::Serialize;

/// Parameters for staking messages (delegate, undelegate, claim)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingParams {
    pub validator_address: String,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// Parameters for a plain send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferParams {
    pub to: String,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// Parameters for a cross-asset swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapParams {
    pub sell_caip: String,
    pub buy_caip: String,
    pub sell_amount: String,
}

/// Kind-specific payload of a build request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
pub enum BuildParams {
    Delegate(StakingParams),
    Undelegate(StakingParams),
    ClaimRewards(StakingParams),
    Transfer(TransferParams),
    Swap(SwapParams),
}

/// Everything the provider needs to construct an unsigned transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildRequest {
    /// Source asset
    pub caip: String,
    pub params: BuildParams,
}

impl BuildRequest {
    pub fn kind(&self) -> TxKind {
        match self.params {
            BuildParams::Delegate(_) => TxKind::Delegate,
            BuildParams::Undelegate(_) => TxKind::Undelegate,
            BuildParams::ClaimRewards(_) => TxKind::ClaimRewards,
            BuildParams::Transfer(_) => TxKind::Transfer,
            BuildParams::Swap(_) => TxKind::Swap,
        }
    }
}

/// Build request for `intent` on `asset`
pub fn build_request(intent: &ValidIntent, asset: &AssetContext) -> BuildRequest {
    let staking = || StakingParams {
        validator_address: intent.counterparty().to_string(),
        amount: intent.amount().to_string(),
        memo: intent.memo().map(str::to_string),
    };

    let params = match intent.kind() {
        TxKind::Delegate => BuildParams::Delegate(staking()),
        TxKind::Undelegate => BuildParams::Undelegate(staking()),
        TxKind::ClaimRewards => BuildParams::ClaimRewards(staking()),
        TxKind::Transfer => BuildParams::Transfer(TransferParams {
            to: intent.counterparty().to_string(),
            amount: intent.amount().to_string(),
            memo: intent.memo().map(str::to_string),
        }),
        TxKind::Swap => BuildParams::Swap(SwapParams {
            sell_caip: asset.caip.clone(),
            buy_caip: intent.counterparty().to_string(),
            sell_amount: intent.amount().to_string(),
        }),
    };

    BuildRequest {
        caip: asset.caip.clone(),
        params,
    }
}
