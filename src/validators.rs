//! Validator sets for the staking wizards

use eyre::Result;
use serde::{Deserialize, Serialize};

/// Bonded status reported by Cosmos SDK chains
pub const BONDED: &str = "BOND_STATUS_BONDED";

/// Validator as listed by the portfolio API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub address: String,
    pub moniker: String,
    /// Commission rate as a decimal fraction ("0.05" = 5%)
    pub commission: String,
    pub status: String,
    #[serde(default)]
    pub jailed: bool,
    /// Bonded tokens in base units
    #[serde(default)]
    pub tokens: String,
    #[serde(default)]
    pub delegator_shares: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<ValidatorDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorDescription {
    pub moniker: String,
    #[serde(default)]
    pub identity: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub details: String,
}

impl Validator {
    /// Commission as a percentage (0.05 -> 5.0)
    pub fn commission_percent(&self) -> f64 {
        self.commission.parse::<f64>().unwrap_or(0.0) * 100.0
    }

    /// Can receive new delegations
    pub fn is_active(&self) -> bool {
        self.status == BONDED && !self.jailed
    }

    fn voting_power(&self) -> f64 {
        self.tokens.parse::<f64>().unwrap_or(0.0)
    }
}

/// Bonded, unjailed validators, largest stake first
pub fn active_validators(validators: Vec<Validator>) -> Vec<Validator> {
    let mut active: Vec<_> = validators.into_iter().filter(Validator::is_active).collect();
    active.sort_by(|a, b| b.voting_power().total_cmp(&a.voting_power()));
    active
}

/// Source of validator listings
pub trait ValidatorDirectory: Send + Sync {
    fn fetch_validators(
        &self,
        network_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Validator>>> + Send;
}

/// Active validators for `network_id`, or a built-in set if the directory fails
pub async fn load_validators<D: ValidatorDirectory>(
    directory: &D,
    network_id: &str,
) -> Vec<Validator> {
    match directory.fetch_validators(network_id).await {
        Ok(validators) => {
            let active = active_validators(validators);
            tracing::info!(network_id, count = active.len(), "Loaded validators");
            active
        }
        Err(e) => {
            tracing::warn!(network_id, "Failed to load validators, using fallback set: {e:#}");
            fallback_validators(network_id)
        }
    }
}

/// Well-known validators, re-addressed for the network's bech32 prefix
pub fn fallback_validators(network_id: &str) -> Vec<Validator> {
    let prefix = if network_id.contains("osmosis") {
        "osmovaloper"
    } else if network_id.contains("thorchain") {
        "thorvaloper"
    } else if network_id.contains("mayachain") {
        "mayavaloper"
    } else {
        "cosmosvaloper"
    };

    [
        (
            "cosmosvaloper1sjllsnramtg3ewxqwwrwjxfgc4n4ef9u2lcnj0",
            "Stake.fish",
            "0.05",
            "1000000000000",
            "https://stake.fish",
        ),
        (
            "cosmosvaloper1c4k24jzduc365kywrsvf5ujz4ya6mwympnc4en",
            "Coinbase Custody",
            "0.20",
            "800000000000",
            "https://custody.coinbase.com",
        ),
        (
            "cosmosvaloper14lultfckehtszvzw4ehu0apvsr77afvyju5zzy",
            "DokiaCapital",
            "0.03",
            "600000000000",
            "https://dokia.capital",
        ),
    ]
    .into_iter()
    .map(|(address, moniker, commission, tokens, website)| Validator {
        address: address.replacen("cosmosvaloper", prefix, 1),
        moniker: moniker.to_string(),
        commission: commission.to_string(),
        status: BONDED.to_string(),
        jailed: false,
        tokens: tokens.to_string(),
        delegator_shares: tokens.to_string(),
        description: Some(ValidatorDescription {
            moniker: moniker.to_string(),
            identity: String::new(),
            website: website.to_string(),
            details: String::new(),
        }),
    })
    .collect()
}
