//! Confirmation polling for providers that expose a transaction lookup

use crate::asset::{network_id_from_caip, required_confirmations};
use crate::config::FollowPolicy;
use crate::error::ProviderError;
use crate::provider::SettlementResult;
use eyre::{Report, Result};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// What the indexer currently knows about a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxStatus {
    pub txid: String,
    pub confirmations: u32,
}

/// Transaction lookup against an indexer
pub trait TxLookup: Send + Sync {
    /// `Ok(None)` while the indexer has not seen the transaction yet
    fn lookup_tx(
        &self,
        network_id: &str,
        txid: &str,
    ) -> impl std::future::Future<Output = Result<Option<TxStatus>>> + Send;
}

/// Poll `lookup` until `txid` reaches the depth required for `caip`
///
/// Lookup errors are logged and retried on the next tick. With
/// `policy.max_wait` set, gives up with [`ProviderError::SettlementTimeout`].
pub async fn follow_until_confirmed<L: TxLookup>(
    lookup: &L,
    caip: &str,
    txid: &str,
    policy: &FollowPolicy,
) -> Result<SettlementResult> {
    let network_id = network_id_from_caip(caip);
    let required = required_confirmations(caip);
    let broadcast_time = Instant::now();
    let mut detected = None;

    loop {
        match lookup.lookup_tx(network_id, txid).await {
            Ok(Some(status)) => {
                if detected.is_none() {
                    let elapsed = broadcast_time.elapsed();
                    tracing::debug!(txid, ?elapsed, "Transaction detected");
                    detected = Some(elapsed);
                }

                if status.confirmations >= required {
                    let elapsed = broadcast_time.elapsed();
                    tracing::info!(
                        txid,
                        confirmations = status.confirmations,
                        ?elapsed,
                        "Transaction confirmed"
                    );
                    return Ok(SettlementResult {
                        caip: caip.to_string(),
                        tx_hash: txid.to_string(),
                        confirmations: status.confirmations,
                        required_confirmations: required,
                        time_to_detect: detected,
                        time_to_confirm: Some(elapsed),
                    });
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(txid, "Transaction lookup failed: {e:#}"),
        }

        if let Some(max_wait) = policy.max_wait {
            if broadcast_time.elapsed() + policy.poll_interval > max_wait {
                return Err(Report::new(ProviderError::SettlementTimeout(format!(
                    "Transaction {txid} not confirmed after {max_wait:?}"
                ))));
            }
        }

        tokio::time::sleep(policy.poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, LifecycleError};
    use eyre::eyre;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Replays scripted lookup responses, repeating the last one
    struct Scripted {
        responses: Mutex<VecDeque<Result<Option<u32>>>>,
        calls: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<Option<u32>>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl TxLookup for Scripted {
        async fn lookup_tx(&self, network_id: &str, txid: &str) -> Result<Option<TxStatus>> {
            self.calls.lock().push(network_id.to_string());
            let mut responses = self.responses.lock();
            let next = if responses.len() > 1 {
                responses.pop_front()
            } else {
                responses.front().map(|r| match r {
                    Ok(v) => Ok(*v),
                    Err(e) => Err(eyre!("{e}")),
                })
            };
            match next.unwrap_or(Ok(None))? {
                Some(confirmations) => Ok(Some(TxStatus {
                    txid: txid.to_string(),
                    confirmations,
                })),
                None => Ok(None),
            }
        }
    }

    fn policy() -> FollowPolicy {
        FollowPolicy::default().with_poll_interval(Duration::from_secs(8))
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirms_after_detection() {
        let lookup = Scripted::new(vec![Ok(None), Ok(Some(0)), Ok(Some(1))]);
        let result = follow_until_confirmed(&lookup, "cosmos:cosmoshub-4/slip44:118", "abc", &policy())
            .await
            .unwrap();

        assert_eq!(result.confirmations, 1);
        assert_eq!(result.required_confirmations, 1);
        assert_eq!(result.time_to_detect, Some(Duration::from_secs(8)));
        assert_eq!(result.time_to_confirm, Some(Duration::from_secs(16)));
        assert_eq!(*lookup.calls.lock(), vec!["cosmos:cosmoshub-4".to_string(); 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bitcoin_needs_six() {
        let lookup = Scripted::new(vec![Ok(Some(1)), Ok(Some(5)), Ok(Some(6))]);
        let result = follow_until_confirmed(
            &lookup,
            "bip122:000000000019d6689c085ae165831e93/slip44:0",
            "ff",
            &policy(),
        )
        .await
        .unwrap();
        assert_eq!(result.required_confirmations, 6);
        assert_eq!(lookup.calls.lock().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_errors_are_retried() {
        let lookup = Scripted::new(vec![Err(eyre!("502 bad gateway")), Ok(Some(1))]);
        let result = follow_until_confirmed(&lookup, "cosmos:osmosis-1/slip44:118", "aa", &policy())
            .await
            .unwrap();
        assert_eq!(result.tx_hash, "aa");
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_wait_times_out() {
        let lookup = Scripted::new(vec![Ok(None)]);
        let policy = policy().with_max_wait(Duration::from_secs(30));
        let err = follow_until_confirmed(&lookup, "cosmos:osmosis-1/slip44:118", "aa", &policy)
            .await
            .unwrap_err();

        assert_eq!(LifecycleError::from_report(&err).kind, ErrorKind::SettlementTimeout);
        // Lookups at 0s, 8s, 16s and 24s; waiting for 32s would overshoot
        assert_eq!(lookup.calls.lock().len(), 4);
    }
}
