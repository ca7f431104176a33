//! Delegation walkthrough against a simulated wallet
//!
//! Run with: cargo run --example delegate
//!
//! Optional: DELEGATE_AMOUNT, plus the TXFLOW_* timing variables
//! (TXFLOW_POLL_INTERVAL_MS=1000 makes the walkthrough quick)

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use serde_json::{json, Value};
use txflow::asset::unbonding_period;
use txflow::{
    eyre, follow_until_confirmed, load_validators, AssetContext, BroadcastResult, BuildParams,
    BuildRequest, FollowPolicy, LifecycleConfig, LifecycleController, LifecycleError,
    LifecycleObserver, PositionType, Result, SettlementResult, StakingPosition, Step,
    SubmitOutcome, SuccessReport, TransactionIntent, TransactionProvider, TxLookup, TxStatus,
    Validator, ValidatorDirectory,
};

/// In-memory wallet: signs anything, confirms on the second lookup
struct SimulatedWallet {
    lookups: AtomicU32,
}

impl TxLookup for SimulatedWallet {
    async fn lookup_tx(&self, _network_id: &str, txid: &str) -> Result<Option<TxStatus>> {
        let seen = self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok((seen > 0).then(|| TxStatus {
            txid: txid.to_string(),
            confirmations: seen,
        }))
    }
}

impl TransactionProvider for SimulatedWallet {
    type Unsigned = Value;
    type Signed = String;

    async fn build_transaction(&self, asset: &AssetContext, request: &BuildRequest) -> Result<Value> {
        let BuildParams::Delegate(params) = &request.params else {
            return Err(eyre!("Simulated wallet only delegates"));
        };
        Ok(json!({
            "chain_id": asset.network_id,
            "msgs": [{
                "type": "cosmos-sdk/MsgDelegate",
                "value": {
                    "validator_address": params.validator_address,
                    "amount": { "denom": asset.symbol.to_lowercase(), "amount": params.amount },
                },
            }],
            "memo": params.memo,
        }))
    }

    async fn sign_transaction(&self, _asset: &AssetContext, unsigned: &Value) -> Result<String> {
        println!("  [device] Approve: {unsigned}");
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        Ok(format!("0a{:x}", unsigned.to_string().len()))
    }

    async fn broadcast_transaction(&self, _asset: &AssetContext, signed: &String) -> Result<BroadcastResult> {
        BroadcastResult::from_json(json!({ "txHash": format!("{:0>64}", signed.to_uppercase()) }))
    }

    async fn follow_transaction(
        &self,
        asset: &AssetContext,
        broadcast: &BroadcastResult,
        policy: &FollowPolicy,
    ) -> Result<SettlementResult> {
        follow_until_confirmed(self, &asset.caip, &broadcast.tx_hash, policy).await
    }
}

/// Directory that only knows the Cosmos Hub; other networks use the fallback set
struct HubOnly;

impl ValidatorDirectory for HubOnly {
    async fn fetch_validators(&self, network_id: &str) -> Result<Vec<Validator>> {
        if network_id != "cosmos:cosmoshub-4" {
            return Err(eyre!("No listing for {network_id}"));
        }
        Ok(txflow::validators::fallback_validators(network_id)
            .into_iter()
            .rev()
            .collect())
    }
}

struct Printer;

impl LifecycleObserver for Printer {
    fn on_step_change(&self, step: Step) {
        println!("  -> {step}");
    }

    fn on_success(&self, report: &SuccessReport) {
        println!("  Delegated! {}", report.explorer_url.as_deref().unwrap_or(&report.tx_hash));
    }

    fn on_error(&self, error: &LifecycleError) {
        println!("  Failed ({}): {}", error.kind, error.message);
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = LifecycleConfig::from_env()?;
    let amount = std::env::var("DELEGATE_AMOUNT").unwrap_or_else(|_| "1.5".to_string());

    // Validator sets for every staking network, fetched concurrently
    let networks = [
        "cosmos:cosmoshub-4",
        "cosmos:osmosis-1",
        "cosmos:thorchain-mainnet-v1",
        "cosmos:mayachain-mainnet-v1",
    ];
    let directory = HubOnly;
    let sets = join_all(networks.iter().map(|n| load_validators(&directory, n))).await;

    println!("\n========== Validators ==========");
    for (network, set) in networks.iter().zip(&sets) {
        println!(
            "{network}: {} validators, unbonding {} days",
            set.len(),
            unbonding_period(network).as_secs() / 86_400
        );
        for v in set {
            println!("  {:<20} {:>5.1}%  {}", v.moniker, v.commission_percent(), v.address);
        }
    }

    let validator = sets[0]
        .first()
        .ok_or_else(|| eyre!("No validators on the Cosmos Hub"))?
        .clone();

    let asset = AssetContext::new("cosmos:cosmoshub-4/slip44:118", "ATOM", 6, "12.34").with_delegations(
        vec![StakingPosition {
            position_type: PositionType::Delegation,
            validator_address: validator.address.clone(),
            balance: "3".to_string(),
        }],
    );
    println!("\n========== Delegate ==========");
    println!(
        "Balance {} {} (max delegable {})",
        asset.available_balance,
        asset.symbol,
        asset.max_delegate_amount(txflow::amount::DEFAULT_ESTIMATED_FEE)?
    );
    println!("Delegating {amount} to {}", validator.moniker);

    let wallet = SimulatedWallet {
        lookups: AtomicU32::new(0),
    };
    let controller = LifecycleController::new(wallet, Arc::new(asset))
        .with_config(config)
        .with_observer(Printer);

    match controller
        .submit(&TransactionIntent::delegate(amount, &validator.address))
        .await
    {
        Ok(SubmitOutcome::Succeeded(report)) => {
            println!(
                "\nConfirmed with {} confirmation(s) after {:?}",
                report.settlement.confirmations,
                report.settlement.time_to_confirm.unwrap_or_default()
            );
        }
        Ok(other) => println!("\nRun ended: {other:?}"),
        Err(e) => println!("\nNot submitted: {e}"),
    }

    let closed = controller.close();
    println!("Closed from {} (outcome unknown: {})", closed.step, closed.outcome_unknown);

    Ok(())
}
