//! Wallet provider abstraction for txflow
//!
//! The controller never builds, signs or broadcasts anything itself. It drives a
//! [`TransactionProvider`], which may be a hardware-wallet bridge, a portfolio SDK
//! or a test double. Transaction payloads stay opaque to the controller: each
//! provider names its own `Unsigned` and `Signed` types.

use crate::asset::AssetContext;
use crate::builder::BuildRequest;
use crate::config::FollowPolicy;
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of a successful broadcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastResult {
    pub tx_hash: String,
    /// Provider response as received, when the provider returns JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl BroadcastResult {
    pub fn new(tx_hash: impl Into<String>) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            raw: None,
        }
    }

    /// Extract the hash from a provider response
    ///
    /// Accepts a bare string, `{"txHash": ..}` or `{"txid": ..}`.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let tx_hash = match &value {
            serde_json::Value::String(hash) => Some(hash.clone()),
            serde_json::Value::Object(map) => ["txHash", "txid"]
                .iter()
                .filter_map(|key| map.get(*key).and_then(|v| v.as_str()))
                .find(|hash| !hash.is_empty())
                .map(str::to_string),
            _ => None,
        };

        match tx_hash {
            Some(hash) if !hash.is_empty() => Ok(Self {
                tx_hash: hash,
                raw: Some(value),
            }),
            _ => Err(eyre!("Broadcast response carries no transaction hash: {value}")),
        }
    }
}

/// Network confirmation of a broadcast transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    pub caip: String,
    pub tx_hash: String,
    pub confirmations: u32,
    pub required_confirmations: u32,
    /// Broadcast to first sighting by the indexer
    pub time_to_detect: Option<Duration>,
    /// Broadcast to required depth
    pub time_to_confirm: Option<Duration>,
}

impl SettlementResult {
    /// Settlement for providers that consider a broadcast final
    pub fn immediate(caip: impl Into<String>, tx_hash: impl Into<String>) -> Self {
        Self {
            caip: caip.into(),
            tx_hash: tx_hash.into(),
            confirmations: 0,
            required_confirmations: 0,
            time_to_detect: None,
            time_to_confirm: None,
        }
    }
}

/// Trait for building, signing, broadcasting and following transactions
///
/// Failures are `eyre` reports. Wrap a [`crate::error::ProviderError`] in the
/// report to tell the controller what kind of failure it was; anything else is
/// shown as an unknown provider error with its message intact.
pub trait TransactionProvider: Send + Sync {
    /// Unsigned transaction descriptor
    type Unsigned: Clone + Send + Sync + std::fmt::Debug;
    /// Signed, serialized transaction
    type Signed: Clone + Send + Sync + std::fmt::Debug;

    /// Builds an unsigned transaction
    fn build_transaction(
        &self,
        asset: &AssetContext,
        request: &BuildRequest,
    ) -> impl std::future::Future<Output = Result<Self::Unsigned>> + Send;

    /// Signs the transaction; may wait on a human at the device indefinitely
    fn sign_transaction(
        &self,
        asset: &AssetContext,
        unsigned: &Self::Unsigned,
    ) -> impl std::future::Future<Output = Result<Self::Signed>> + Send;

    /// Submits the signed transaction to the network
    fn broadcast_transaction(
        &self,
        asset: &AssetContext,
        signed: &Self::Signed,
    ) -> impl std::future::Future<Output = Result<BroadcastResult>> + Send;

    /// Resolves once the network confirms the transaction
    ///
    /// `policy` is the controller's [`crate::config::LifecycleConfig::follow`].
    /// Providers that poll should honour it, e.g. through
    /// [`crate::follow::follow_until_confirmed`]; providers with their own
    /// confirmation source may ignore it.
    fn follow_transaction(
        &self,
        asset: &AssetContext,
        broadcast: &BroadcastResult,
        policy: &FollowPolicy,
    ) -> impl std::future::Future<Output = Result<SettlementResult>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hash_from_string() {
        let result = BroadcastResult::from_json(json!("ABC123")).unwrap();
        assert_eq!(result.tx_hash, "ABC123");
    }

    #[test]
    fn test_hash_from_object() {
        let result = BroadcastResult::from_json(json!({ "txHash": "abc123", "code": 0 })).unwrap();
        assert_eq!(result.tx_hash, "abc123");
        assert_eq!(result.raw.unwrap()["code"], 0);

        let result = BroadcastResult::from_json(json!({ "txid": "ff00" })).unwrap();
        assert_eq!(result.tx_hash, "ff00");

        // Empty txHash falls through to txid
        let result = BroadcastResult::from_json(json!({ "txHash": "", "txid": "ee" })).unwrap();
        assert_eq!(result.tx_hash, "ee");
    }

    #[test]
    fn test_missing_hash_is_error() {
        assert!(BroadcastResult::from_json(json!({ "success": true })).is_err());
        assert!(BroadcastResult::from_json(json!("")).is_err());
        assert!(BroadcastResult::from_json(json!(42)).is_err());
    }
}
