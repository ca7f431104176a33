//! txflow
//!
//! A transaction lifecycle controller for wallet wizards: validate a user's
//! intent, then build, sign, broadcast and follow the transaction through an
//! injected wallet provider, exposing every step to the host UI.
//!
//! # Features
//!
//! - Delegate / undelegate / claim rewards on Cosmos SDK chains
//! - Transfers and swaps through the same pipeline
//! - Inline validation against the provider's balances
//! - Explorer links for broadcast transactions
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use txflow::{AssetContext, LifecycleController, SubmitOutcome, TransactionIntent};
//!
//! #[tokio::main]
//! async fn main() -> eyre::Result<()> {
//!     let asset = AssetContext::new("cosmos:cosmoshub-4/slip44:118", "ATOM", 6, "100");
//!     let controller = LifecycleController::new(my_keepkey_provider(), Arc::new(asset));
//!
//!     match controller.submit(&TransactionIntent::delegate("10", "cosmosvaloper1...")).await? {
//!         SubmitOutcome::Succeeded(report) => println!("sent {}", report.tx_hash),
//!         other => println!("{other:?}"),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod amount;
pub mod asset;
pub mod builder;
pub mod config;
pub mod controller;
pub mod error;
pub mod explorer;
pub mod follow;
pub mod intent;
pub mod observer;
pub mod provider;
pub mod state;
pub mod validation;
pub mod validators;

// Re-export main types for convenience
pub use asset::{AssetContext, ChainFamily, PositionType, StakingPosition};
pub use builder::{build_request, BuildParams, BuildRequest};
pub use config::{FollowPolicy, LifecycleConfig};
pub use controller::{CloseReport, LifecycleController, SubmitOutcome};
pub use error::{eyre, Context, ErrorKind, LifecycleError, ProviderError, Report, Result};
pub use explorer::resolve_explorer_url;
pub use follow::{follow_until_confirmed, TxLookup, TxStatus};
pub use intent::{TransactionIntent, TxKind, ValidIntent};
pub use observer::{
    ChannelObserver, LifecycleEvent, LifecycleObserver, NoopObserver, SuccessReport,
};
pub use provider::{BroadcastResult, SettlementResult, TransactionProvider};
pub use state::{LifecycleState, Step};
pub use validation::{validate, ValidationError};
pub use validators::{load_validators, Validator, ValidatorDirectory};
