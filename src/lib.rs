// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! # treat-bridge
//!
//! Transaction lifecycle coordinator for bridging the TREAT token between
//! LayerZero testnets.
//!
//! The crate drives one bridge attempt from a user's intent to cross-chain
//! delivery: allowance checks and approval, fee quoting with a fallback, gas
//! estimation with retries and a sufficiency check, submission, receipt
//! confirmation and delivery polling against the LayerZero scan service. It
//! stays consistent when the user switches chains, edits amounts or changes
//! accounts in the middle of an attempt.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use treat_bridge::{BridgeConfig, Coordinator, Event, LayerZeroScanProvider, TokioClock};
//! use treat_bridge::providers::AlloyWallet;
//! use alloy_provider::ProviderBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sepolia = ProviderBuilder::new().connect("http://localhost:8545").await?;
//! let wallet = AlloyWallet::new(11155111).with_chain(11155111, sepolia);
//!
//! let config = BridgeConfig::from_env()?;
//! let mut coordinator = Coordinator::builder()
//!     .wallet(wallet)
//!     .scan(LayerZeroScanProvider::from_config(&config))
//!     .clock(TokioClock::new())
//!     .config(config)
//!     .build();
//!
//! let account = "0x742d35Cc6634C0532925a3b844Bc9e7595f8fA0d".parse()?;
//! coordinator.handle(Event::Connected { account, chain_id: 11155111 }).await;
//! coordinator.handle(Event::SetAmount("1.5".to_string())).await;
//! coordinator.handle(Event::RequestApproval).await;
//! coordinator.handle(Event::RequestBridge).await;
//!
//! println!("{:?}", coordinator.view().status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`coordinator`] holds the state machine. [`reduce`] is pure; the
//!   [`Coordinator`] runs the effects it returns.
//! - [`traits`] defines the seams to the outside world: [`WalletProvider`],
//!   [`MessageScanProvider`] and [`Clock`]. [`providers`] has the production
//!   implementations and [`testing`] the fakes.
//! - [`BridgeView`] projects the state into what a front end renders.
//!
//! ## Public API
//!
//! - [`Registry`] and [`NetworkDescriptor`] - supported networks
//! - [`BridgeConfig`], [`PollingConfig`] and [`GasConfig`] - tunables
//! - [`BridgeError`] and [`Result`] - error handling
//! - [`FeeQuoter`], [`GasEstimator`], [`BalanceReader`] and [`DeliveryMonitor`] -
//!   the individual steps, usable without the coordinator
//! - Contract wrappers: [`Erc20Contract`], [`OftContract`]

mod balances;
mod chain;
mod config;
mod contracts;
mod error;
mod fees;
mod gas;
mod monitor;
mod protocol;
mod receipt;
mod units;
mod view;

pub mod coordinator;
pub mod providers;
pub mod testing;
pub mod traits;

pub use balances::{BalanceReader, Balances};
pub use chain::{
    ContractVariant, NetworkDescriptor, Registry, BSC_TESTNET_ENDPOINT_ID, BSC_TESTNET_TREAT_OFT,
    POLYGON_AMOY_ENDPOINT_ID, POLYGON_AMOY_TREAT_OFT, SEPOLIA_ENDPOINT_ID, SEPOLIA_TREAT_OFT,
};
pub use config::{
    BridgeConfig, GasConfig, GasConfigBuilder, PollingConfig, LAYERZERO_SCAN_API_TESTNET,
    LAYERZERO_SCAN_TX_PAGE_TESTNET,
};
pub use contracts::{
    erc20::{approve_request, is_approve_request, Erc20, Erc20Contract},
    oft::{
        build_send_param, decode_sent_events, is_send_request, send_request, Oft, OftContract,
        SentEvent,
        Oft::{MessagingFee, SendParam},
    },
};
pub use coordinator::{
    reduce, ApprovalState, BridgeState, Coordinator, Effect, Event, LifecycleState,
    TransferIntent,
};
pub use error::{classify_wallet_error, BridgeError, Result, GENERIC_FAILURE_MESSAGE};
pub use fees::{FeeQuote, FeeQuoter};
pub use gas::{BridgeGas, GasEstimator, APPROVAL_ESTIMATE_ADVISORY};
pub use monitor::{DeliveryMonitor, PollDecision, WatchOutcome, EXHAUSTED_ADVISORY};
pub use protocol::{DeliveryRecord, DeliveryStatus, MessageStatus, ScanMessage, ScanResponse};
pub use providers::{AlloyWallet, LayerZeroScanProvider, TokioClock};
pub use receipt::SourceReceipt;
pub use traits::{Clock, MessageScanProvider, WalletProvider};
pub use units::{
    amount_for_percentage, format_amount, format_fixed, parse_amount, percentage_of_balance,
};
pub use view::{ActionButton, BridgeView};

// Public module for advanced users who need custom instrumentation
pub mod spans;
