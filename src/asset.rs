//! Asset context supplied by the wallet provider, and CAIP helpers

use crate::amount::{self, AmountError};
use crate::explorer::resolve_explorer_url;
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bitcoin mainnet chain reference
pub const BITCOIN_NETWORK: &str = "bip122:000000000019d6689c085ae165831e93";
/// Dogecoin mainnet chain reference
pub const DOGECOIN_NETWORK: &str = "bip122:00000000001a91e3dace36e2be3bf030";

/// UTXO assets a KeepKey can sign for
pub const UTXO_SUPPORT: &[&str] = &[
    "bip122:000000000019d6689c085ae165831e93/slip44:0",
    "bip122:000000000000000000651ef99cb9fcbe/slip44:145",
    "bip122:000007d91d1254d60e2dd1ae58038307/slip44:5",
    "bip122:00000000001a91e3dace36e2be3bf030/slip44:3",
    "bip122:12a765e31ffd4059bada1e25190f6e98/slip44:2",
];

/// Tendermint/Cosmos SDK assets
pub const TENDERMINT_SUPPORT: &[&str] = &[
    "cosmos:mayachain-mainnet-v1/slip44:931",
    "cosmos:mayachain-mainnet-v1/denom:maya",
    "cosmos:osmosis-1/slip44:118",
    "cosmos:cosmoshub-4/slip44:118",
    "cosmos:kaiyo-1/slip44:118",
    "cosmos:thorchain-mainnet-v1/slip44:931",
];

/// Everything else with dedicated signing support (XRP)
pub const OTHER_SUPPORT: &[&str] = &["ripple:4109c6f2045fc7eff4cde8f9905d19c2/slip44:144"];

/// Signing family of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainFamily {
    Utxo,
    Tendermint,
    Eip155,
    Other,
}

impl ChainFamily {
    /// Classify a CAIP, `None` when no family supports it
    pub fn classify(caip: &str) -> Option<Self> {
        if UTXO_SUPPORT.contains(&caip) {
            Some(ChainFamily::Utxo)
        } else if TENDERMINT_SUPPORT.contains(&caip) {
            Some(ChainFamily::Tendermint)
        } else if caip.starts_with("eip155:") {
            Some(ChainFamily::Eip155)
        } else if OTHER_SUPPORT.contains(&caip) {
            Some(ChainFamily::Other)
        } else {
            None
        }
    }
}

/// Network part of a CAIP-19 asset id (`cosmos:cosmoshub-4/slip44:118` -> `cosmos:cosmoshub-4`)
pub fn network_id_from_caip(caip: &str) -> &str {
    caip.split_once('/').map(|(network, _)| network).unwrap_or(caip)
}

/// Blocks the network must add on top before a transaction counts as settled
pub fn required_confirmations(caip: &str) -> u32 {
    match network_id_from_caip(caip) {
        BITCOIN_NETWORK => 6,
        DOGECOIN_NETWORK => 3,
        _ => 1,
    }
}

/// Time stake stays locked after an undelegation
pub fn unbonding_period(network_id: &str) -> Duration {
    const DAY: u64 = 24 * 60 * 60;
    let days = if network_id.contains("cosmos:cosmoshub") {
        21
    } else if network_id.contains("cosmos:osmosis") {
        14
    } else if network_id.contains("cosmos:thorchain") {
        3
    } else if network_id.contains("cosmos:mayachain") {
        10
    } else {
        21
    };
    Duration::from_secs(days * DAY)
}

/// Kind of staking balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionType {
    Delegation,
    Reward,
    Unbonding,
}

/// A staking balance held with one validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingPosition {
    #[serde(rename = "type")]
    pub position_type: PositionType,
    pub validator_address: String,
    /// Decimal string in display units
    pub balance: String,
}

/// Asset the wizard operates on
///
/// Owned and refreshed by the wallet provider. The controller only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetContext {
    /// Chain-agnostic asset id, stable key
    pub caip: String,
    pub symbol: String,
    pub network_id: String,
    /// Decimal places of one display unit
    pub precision: u8,
    /// Spendable balance as a decimal string
    pub available_balance: String,
    /// Staking positions for this asset, if the chain supports staking
    #[serde(default)]
    pub delegations: Vec<StakingPosition>,
    /// Provider explorer prefix; the tx hash is appended
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_tx_link: Option<String>,
}

impl AssetContext {
    /// Create a context with the network derived from the CAIP
    pub fn new(
        caip: impl Into<String>,
        symbol: impl Into<String>,
        precision: u8,
        available_balance: impl Into<String>,
    ) -> Self {
        let caip = caip.into();
        let network_id = network_id_from_caip(&caip).to_string();
        Self {
            caip,
            symbol: symbol.into(),
            network_id,
            precision,
            available_balance: available_balance.into(),
            delegations: Vec::new(),
            explorer_tx_link: None,
        }
    }

    /// Attach staking positions
    pub fn with_delegations(mut self, delegations: Vec<StakingPosition>) -> Self {
        self.delegations = delegations;
        self
    }

    /// Set the provider explorer prefix
    pub fn with_explorer_tx_link(mut self, link: impl Into<String>) -> Self {
        self.explorer_tx_link = Some(link.into());
        self
    }

    /// Spendable balance in base units
    pub fn available_units(&self) -> Result<U256, AmountError> {
        amount::parse_units(&self.available_balance, self.precision)
    }

    /// Delegation held with `validator`, if any
    pub fn delegation(&self, validator: &str) -> Option<&StakingPosition> {
        self.delegations.iter().find(|pos| {
            pos.position_type == PositionType::Delegation && pos.validator_address == validator
        })
    }

    /// Largest delegable amount after reserving `fee`
    pub fn max_delegate_amount(&self, fee: &str) -> Result<String, AmountError> {
        amount::max_spendable(&self.available_balance, fee, self.precision)
    }

    /// Largest undelegable amount: the whole delegation
    pub fn max_undelegate_amount(&self, validator: &str) -> Option<String> {
        self.delegation(validator).map(|pos| pos.balance.clone())
    }

    /// Link to view `tx_hash`, preferring the provider's explorer prefix
    pub fn explorer_url(&self, tx_hash: &str) -> Option<String> {
        match &self.explorer_tx_link {
            Some(link) if !link.is_empty() => Some(format!("{link}{tx_hash}")),
            _ => resolve_explorer_url(&self.network_id, tx_hash),
        }
    }
}
