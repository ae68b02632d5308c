// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Test utilities and fake implementations of the bridge traits
//!
//! These fakes let the coordinator run end to end without a node, a wallet or
//! the scan service, including adversarial scenarios: rejecting wallets,
//! failing quotes and estimates, reverted receipts, scan services that never
//! deliver.
//!
//! Every fake is cheaply cloneable and clones share state, so a test can hand
//! one clone to the coordinator and inspect recorded calls through another.

use alloy_primitives::{Address, Log, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::contracts::erc20::{is_approve_request, Erc20};
use crate::contracts::oft::Oft::{MessagingFee, SendParam};
use crate::error::{BridgeError, Result};
use crate::protocol::ScanResponse;
use crate::receipt::SourceReceipt;
use crate::traits::{Clock, MessageScanProvider, WalletProvider};

// ============================================================================
// Fake Wallet
// ============================================================================

/// Native fee returned by [`FakeWallet`] when no quote is scripted: 0.001 ETH.
pub const DEFAULT_FAKE_NATIVE_FEE: u64 = 1_000_000_000_000_000;

/// Raw gas returned by [`FakeWallet`] when no estimate is scripted.
pub const DEFAULT_FAKE_GAS: u64 = 100_000;

/// One call observed by [`FakeWallet`].
#[derive(Debug, Clone, PartialEq)]
pub enum WalletCall {
    SwitchChain(u64),
    NativeBalance(u64),
    TokenBalance(u64),
    Allowance(u64),
    QuoteSend(u64, SendParam),
    EstimateGas(u64),
    MaxFeePerGas(u64),
    SendTransaction(u64, TransactionRequest),
    GetTransactionReceipt(u64, TxHash),
}

#[derive(Debug)]
struct WalletState {
    token_balances: HashMap<u64, U256>,
    native_balances: HashMap<u64, U256>,
    allowances: HashMap<u64, U256>,
    failing_reads: bool,
    quote_results: VecDeque<Result<MessagingFee>>,
    gas_estimates: VecDeque<Result<u64>>,
    max_fee_per_gas: u128,
    send_results: VecDeque<Result<TxHash>>,
    switch_results: VecDeque<Result<()>>,
    /// `None` answers before a receipt shows up.
    receipt_delay: u32,
    receipt_polls: HashMap<TxHash, u32>,
    reverted: bool,
    receipt_logs: Vec<Log>,
    sent: Vec<TxHash>,
    calls: Vec<WalletCall>,
}

impl Default for WalletState {
    fn default() -> Self {
        Self {
            token_balances: HashMap::new(),
            native_balances: HashMap::new(),
            allowances: HashMap::new(),
            failing_reads: false,
            quote_results: VecDeque::new(),
            gas_estimates: VecDeque::new(),
            max_fee_per_gas: 1_000_000_000,
            send_results: VecDeque::new(),
            switch_results: VecDeque::new(),
            receipt_delay: 0,
            receipt_polls: HashMap::new(),
            reverted: false,
            receipt_logs: Vec::new(),
            sent: Vec::new(),
            calls: Vec::new(),
        }
    }
}

/// A fake wallet with scripted answers and a call log.
///
/// Scripted sequences (quotes, estimates, sends) are consumed front to back;
/// once empty, the defaults apply: a 0.001 native fee, 100k gas, and a fresh
/// hash per send. Native balances default to 10 ether so sufficiency checks
/// pass unless a test says otherwise.
///
/// Sending an `approve` updates the fake allowance, so an approval flow reads
/// back the approved amount like a real chain would.
#[derive(Clone, Debug, Default)]
pub struct FakeWallet {
    state: Arc<Mutex<WalletState>>,
}

impl FakeWallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token_balance(self, chain_id: u64, balance: U256) -> Self {
        self.state.lock().unwrap().token_balances.insert(chain_id, balance);
        self
    }

    pub fn with_native_balance(self, chain_id: u64, balance: U256) -> Self {
        self.state.lock().unwrap().native_balances.insert(chain_id, balance);
        self
    }

    pub fn with_allowance(self, chain_id: u64, allowance: U256) -> Self {
        self.set_allowance(chain_id, allowance);
        self
    }

    /// Every read (balances, allowance) fails.
    pub fn with_failing_reads(self) -> Self {
        self.state.lock().unwrap().failing_reads = true;
        self
    }

    pub fn with_quote_results(self, results: Vec<Result<MessagingFee>>) -> Self {
        self.state.lock().unwrap().quote_results = results.into();
        self
    }

    pub fn with_gas_estimates(self, results: Vec<Result<u64>>) -> Self {
        self.state.lock().unwrap().gas_estimates = results.into();
        self
    }

    pub fn with_max_fee_per_gas(self, fee: u128) -> Self {
        self.state.lock().unwrap().max_fee_per_gas = fee;
        self
    }

    pub fn with_send_results(self, results: Vec<Result<TxHash>>) -> Self {
        self.state.lock().unwrap().send_results = results.into();
        self
    }

    pub fn with_switch_results(self, results: Vec<Result<()>>) -> Self {
        self.state.lock().unwrap().switch_results = results.into();
        self
    }

    /// Receipts appear only after `polls` empty lookups.
    pub fn with_receipt_delay(self, polls: u32) -> Self {
        self.state.lock().unwrap().receipt_delay = polls;
        self
    }

    /// Every mined transaction reverts.
    pub fn with_reverted_receipts(self) -> Self {
        self.state.lock().unwrap().reverted = true;
        self
    }

    /// Logs attached to every receipt.
    pub fn with_receipt_logs(self, logs: Vec<Log>) -> Self {
        self.state.lock().unwrap().receipt_logs = logs;
        self
    }

    pub fn set_allowance(&self, chain_id: u64, allowance: U256) {
        self.state.lock().unwrap().allowances.insert(chain_id, allowance);
    }

    pub fn push_send_result(&self, result: Result<TxHash>) {
        self.state.lock().unwrap().send_results.push_back(result);
    }

    pub fn calls(&self) -> Vec<WalletCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Requests handed to `send_transaction`, successful or not.
    pub fn sent_requests(&self) -> Vec<TransactionRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                WalletCall::SendTransaction(_, request) => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn send_count(&self) -> usize {
        self.sent_requests().len()
    }

    pub fn quoted_params(&self) -> Vec<SendParam> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                WalletCall::QuoteSend(_, param) => Some(param),
                _ => None,
            })
            .collect()
    }

    pub fn estimate_gas_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, WalletCall::EstimateGas(_)))
            .count()
    }

    pub fn switch_requests(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                WalletCall::SwitchChain(chain_id) => Some(chain_id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: WalletCall) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn read_failure(&self) -> Option<BridgeError> {
        self.state
            .lock()
            .unwrap()
            .failing_reads
            .then(|| BridgeError::Provider("Simulated RPC error".to_string()))
    }
}

#[async_trait]
impl WalletProvider for FakeWallet {
    async fn switch_chain(&self, chain_id: u64) -> Result<()> {
        self.record(WalletCall::SwitchChain(chain_id));
        self.state
            .lock()
            .unwrap()
            .switch_results
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn native_balance(&self, chain_id: u64, _account: Address) -> Result<U256> {
        self.record(WalletCall::NativeBalance(chain_id));
        if let Some(err) = self.read_failure() {
            return Err(err);
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .native_balances
            .get(&chain_id)
            .copied()
            .unwrap_or(U256::from(10u64).pow(U256::from(19))))
    }

    async fn token_balance(
        &self,
        chain_id: u64,
        _token: Address,
        _account: Address,
    ) -> Result<U256> {
        self.record(WalletCall::TokenBalance(chain_id));
        if let Some(err) = self.read_failure() {
            return Err(err);
        }
        let state = self.state.lock().unwrap();
        Ok(state.token_balances.get(&chain_id).copied().unwrap_or_default())
    }

    async fn allowance(
        &self,
        chain_id: u64,
        _token: Address,
        _owner: Address,
        _spender: Address,
    ) -> Result<U256> {
        self.record(WalletCall::Allowance(chain_id));
        if let Some(err) = self.read_failure() {
            return Err(err);
        }
        let state = self.state.lock().unwrap();
        Ok(state.allowances.get(&chain_id).copied().unwrap_or_default())
    }

    async fn quote_send(
        &self,
        chain_id: u64,
        _bridge: Address,
        send_param: SendParam,
    ) -> Result<MessagingFee> {
        self.record(WalletCall::QuoteSend(chain_id, send_param));
        self.state
            .lock()
            .unwrap()
            .quote_results
            .pop_front()
            .unwrap_or(Ok(MessagingFee {
                nativeFee: U256::from(DEFAULT_FAKE_NATIVE_FEE),
                lzTokenFee: U256::ZERO,
            }))
    }

    async fn estimate_gas(&self, chain_id: u64, _request: TransactionRequest) -> Result<u64> {
        self.record(WalletCall::EstimateGas(chain_id));
        self.state
            .lock()
            .unwrap()
            .gas_estimates
            .pop_front()
            .unwrap_or(Ok(DEFAULT_FAKE_GAS))
    }

    async fn max_fee_per_gas(&self, chain_id: u64) -> Result<u128> {
        self.record(WalletCall::MaxFeePerGas(chain_id));
        Ok(self.state.lock().unwrap().max_fee_per_gas)
    }

    async fn send_transaction(&self, chain_id: u64, request: TransactionRequest) -> Result<TxHash> {
        self.record(WalletCall::SendTransaction(chain_id, request.clone()));
        let mut state = self.state.lock().unwrap();

        let result = state.send_results.pop_front().unwrap_or_else(|| {
            let nonce = state.sent.len() as u64 + 1;
            Ok(TxHash::from(U256::from(0xb000 + nonce).to_be_bytes::<32>()))
        });

        if let Ok(tx_hash) = &result {
            state.sent.push(*tx_hash);
            if is_approve_request(&request) {
                let approved = request
                    .input
                    .input()
                    .and_then(|data| Erc20::approveCall::abi_decode(data).ok());
                if let Some(call) = approved {
                    state.allowances.insert(chain_id, call.amount);
                }
            }
        }

        result
    }

    async fn get_transaction_receipt(
        &self,
        chain_id: u64,
        tx_hash: TxHash,
    ) -> Result<Option<SourceReceipt>> {
        self.record(WalletCall::GetTransactionReceipt(chain_id, tx_hash));
        let mut state = self.state.lock().unwrap();

        if !state.sent.contains(&tx_hash) {
            return Ok(None);
        }

        let delay = state.receipt_delay;
        let polls = state.receipt_polls.entry(tx_hash).or_insert(0);
        if *polls < delay {
            *polls += 1;
            return Ok(None);
        }

        let receipt = if state.reverted {
            SourceReceipt::reverted(tx_hash, 100)
        } else {
            SourceReceipt::success(tx_hash, 100)
        };
        Ok(Some(receipt.with_logs(state.receipt_logs.clone())))
    }
}

// ============================================================================
// Fake Scan Provider
// ============================================================================

/// A fake scan service answering from a scripted sequence.
///
/// Once the sequence runs out the last answer repeats (or an empty response
/// when the last answer was an error or nothing was scripted).
#[derive(Clone, Debug, Default)]
pub struct FakeScanProvider {
    responses: Arc<Mutex<VecDeque<Result<ScanResponse>>>>,
    last: Arc<Mutex<Option<ScanResponse>>>,
    calls: Arc<Mutex<Vec<TxHash>>>,
}

impl FakeScanProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: Vec<Result<ScanResponse>>) -> Self {
        let provider = Self::new();
        *provider.responses.lock().unwrap() = responses.into();
        provider
    }

    /// Answers `response` forever.
    pub fn repeating(response: Result<ScanResponse>) -> Self {
        Self::with_responses(vec![response])
    }

    pub fn push_response(&self, response: Result<ScanResponse>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn queried_hashes(&self) -> Vec<TxHash> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageScanProvider for FakeScanProvider {
    async fn get_messages_by_src_tx_hash(&self, tx_hash: TxHash) -> Result<ScanResponse> {
        self.calls.lock().unwrap().push(tx_hash);

        let next = self.responses.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        match next {
            Some(Ok(response)) => {
                *last = Some(response.clone());
                Ok(response)
            }
            Some(Err(e)) => {
                *last = None;
                Err(e)
            }
            None => Ok(last.clone().unwrap_or_default()),
        }
    }
}

// ============================================================================
// Fake Clock
// ============================================================================

/// A fake clock that allows fast-forwarding time in tests.
///
/// This enables testing polling budgets and retry delays without actually
/// waiting.
#[derive(Clone, Debug)]
pub struct FakeClock {
    current_time: Arc<Mutex<Instant>>,
    sleep_log: Arc<Mutex<Vec<Duration>>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self {
            current_time: Arc::new(Mutex::new(Instant::now())),
            sleep_log: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fast-forward the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut time = self.current_time.lock().unwrap();
        *time += duration;
    }

    /// Every duration passed to `sleep`, in order
    pub fn sleep_log(&self) -> Vec<Duration> {
        self.sleep_log.lock().unwrap().clone()
    }

    /// Get the number of times sleep was called
    pub fn sleep_count(&self) -> usize {
        self.sleep_log.lock().unwrap().len()
    }

    /// Get the total time "slept" by this clock
    pub fn total_sleep_time(&self) -> Duration {
        self.sleep_log.lock().unwrap().iter().sum()
    }
}

#[async_trait]
impl Clock for FakeClock {
    async fn sleep(&self, duration: Duration) {
        self.sleep_log.lock().unwrap().push(duration);
        self.advance(duration);
    }

    fn now(&self) -> Instant {
        *self.current_time.lock().unwrap()
    }
}
