// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Core trait abstractions for bridge operations.
//!
//! The coordinator never talks to a node, a wallet or the scan service
//! directly. It goes through the traits in this module so every collaborator
//! can be replaced by a fake in tests, including adversarial ones (rejecting
//! wallets, flaky quotes, scan services that never deliver).
//!
//! # Example: Implementing a Test Fake
//!
//! ```rust,ignore
//! use treat_bridge::traits::MessageScanProvider;
//! use treat_bridge::{ScanResponse, Result};
//!
//! struct NeverIndexed;
//!
//! #[async_trait::async_trait]
//! impl MessageScanProvider for NeverIndexed {
//!     async fn get_messages_by_src_tx_hash(&self, _tx_hash: TxHash) -> Result<ScanResponse> {
//!         Ok(ScanResponse::default())
//!     }
//! }
//! ```

use alloy_primitives::{Address, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use std::time::{Duration, Instant};

use crate::contracts::oft::Oft::{MessagingFee, SendParam};
use crate::error::Result;
use crate::protocol::ScanResponse;
use crate::receipt::SourceReceipt;

/// Trait for the connected wallet and the chain nodes behind it.
///
/// Reads may target any registered chain; writes are signed by the connected
/// account and must target the wallet's active chain.
///
/// # Errors
///
/// Implementations translate failures at the origin: a user declining a
/// prompt must surface as [`BridgeError::UserRejected`](crate::BridgeError::UserRejected),
/// everything else as a provider, RPC or contract error.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Asks the wallet to make `chain_id` its active chain.
    async fn switch_chain(&self, chain_id: u64) -> Result<()>;

    /// Native currency balance of `account`.
    async fn native_balance(&self, chain_id: u64, account: Address) -> Result<U256>;

    /// ERC-20 balance of `account` on `token`.
    async fn token_balance(&self, chain_id: u64, token: Address, account: Address)
        -> Result<U256>;

    /// ERC-20 allowance `owner` granted to `spender`.
    async fn allowance(
        &self,
        chain_id: u64,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256>;

    /// Calls `quoteSend(send_param, false)` on the bridge contract.
    async fn quote_send(
        &self,
        chain_id: u64,
        bridge: Address,
        send_param: SendParam,
    ) -> Result<MessagingFee>;

    /// Simulates `request` and returns the raw gas used.
    async fn estimate_gas(&self, chain_id: u64, request: TransactionRequest) -> Result<u64>;

    /// Current EIP-1559 `maxFeePerGas` the wallet would sign with.
    async fn max_fee_per_gas(&self, chain_id: u64) -> Result<u128>;

    /// Signs and broadcasts `request`, returning its hash.
    async fn send_transaction(&self, chain_id: u64, request: TransactionRequest)
        -> Result<TxHash>;

    /// Returns `None` while the transaction is not yet mined.
    async fn get_transaction_receipt(
        &self,
        chain_id: u64,
        tx_hash: TxHash,
    ) -> Result<Option<SourceReceipt>>;
}

/// Trait for the cross-chain message scan service.
///
/// # Test Scenarios
///
/// - Messages not yet indexed (empty list)
/// - Progressions INFLIGHT → CONFIRMING → DELIVERED
/// - FAILED messages
/// - HTTP or decoding failures
#[async_trait]
pub trait MessageScanProvider: Send + Sync {
    /// Looks up every message emitted by a source transaction.
    async fn get_messages_by_src_tx_hash(&self, tx_hash: TxHash) -> Result<ScanResponse>;
}

/// Trait for time-based operations.
///
/// Lets tests fast-forward through polling loops and retry delays without
/// actually waiting.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);

    fn now(&self) -> Instant;
}
