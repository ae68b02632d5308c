// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use alloy_primitives::{Address, TxHash, U256};
use alloy_rpc_types::TransactionRequest;

use crate::balances::Balances;
use crate::chain::NetworkDescriptor;
use crate::contracts::oft::SentEvent;
use crate::error::{BridgeError, Result};
use crate::fees::FeeQuote;
use crate::protocol::DeliveryRecord;
use crate::receipt::SourceReceipt;

/// Everything that can happen to the coordinator: wallet notifications, user
/// input, and completions of effects it asked for.
#[derive(Debug)]
pub enum Event {
    Connected { account: Address, chain_id: u64 },
    Disconnected,
    AccountChanged(Address),
    /// The wallet reports a new active chain.
    ChainChanged(u64),

    SelectSource(u64),
    SelectDestination(u64),
    SwapNetworks,
    SetAmount(String),
    SetPercentage(u8),
    ToggleCustomRecipient(bool),
    SetRecipient(String),
    RequestApproval,
    RequestBridge,
    /// Acknowledge a finished or failed attempt.
    Dismiss,
    Reset,
    /// Re-read balances, allowance and the fee quote without touching the
    /// intent.
    Refresh,

    BalancesLoaded {
        source_chain: u64,
        destination_chain: u64,
        balances: Balances,
    },
    AllowanceLoaded {
        chain_id: u64,
        allowance: Option<U256>,
    },
    QuoteFetched {
        seq: u64,
        quote: FeeQuote,
    },

    ApprovalGasEstimated {
        seq: u64,
        gas_limit: Option<u64>,
    },
    ApprovalSubmitted {
        seq: u64,
        tx_hash: TxHash,
    },
    ApprovalSubmitFailed {
        seq: u64,
        error: BridgeError,
    },
    ApprovalReceipt {
        seq: u64,
        tx_hash: TxHash,
        result: Result<SourceReceipt>,
    },

    /// Fresh quote taken, gas estimated, balance sufficient.
    BridgePrepared {
        quote: FeeQuote,
        request: TransactionRequest,
    },
    BridgePreparationFailed(BridgeError),
    BridgeSubmitted(TxHash),
    BridgeSubmitFailed(BridgeError),
    BridgeReceipt {
        tx_hash: TxHash,
        result: Result<SourceReceipt>,
    },
    SendEventsObserved {
        tx_hash: TxHash,
        events: Vec<SentEvent>,
    },
    DeliveryPolled {
        tx_hash: TxHash,
        attempt: u32,
        result: Result<DeliveryRecord>,
    },
    /// The confirmed state has been shown; the form returns to idle.
    SuccessSurfaced {
        tx_hash: TxHash,
    },
}

impl Event {
    /// Static name used for span and log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::Disconnected => "disconnected",
            Self::AccountChanged(_) => "account_changed",
            Self::ChainChanged(_) => "chain_changed",
            Self::SelectSource(_) => "select_source",
            Self::SelectDestination(_) => "select_destination",
            Self::SwapNetworks => "swap_networks",
            Self::SetAmount(_) => "set_amount",
            Self::SetPercentage(_) => "set_percentage",
            Self::ToggleCustomRecipient(_) => "toggle_custom_recipient",
            Self::SetRecipient(_) => "set_recipient",
            Self::RequestApproval => "request_approval",
            Self::RequestBridge => "request_bridge",
            Self::Dismiss => "dismiss",
            Self::Reset => "reset",
            Self::Refresh => "refresh",
            Self::BalancesLoaded { .. } => "balances_loaded",
            Self::AllowanceLoaded { .. } => "allowance_loaded",
            Self::QuoteFetched { .. } => "quote_fetched",
            Self::ApprovalGasEstimated { .. } => "approval_gas_estimated",
            Self::ApprovalSubmitted { .. } => "approval_submitted",
            Self::ApprovalSubmitFailed { .. } => "approval_submit_failed",
            Self::ApprovalReceipt { .. } => "approval_receipt",
            Self::BridgePrepared { .. } => "bridge_prepared",
            Self::BridgePreparationFailed(_) => "bridge_preparation_failed",
            Self::BridgeSubmitted(_) => "bridge_submitted",
            Self::BridgeSubmitFailed(_) => "bridge_submit_failed",
            Self::BridgeReceipt { .. } => "bridge_receipt",
            Self::SendEventsObserved { .. } => "send_events_observed",
            Self::DeliveryPolled { .. } => "delivery_polled",
            Self::SuccessSurfaced { .. } => "success_surfaced",
        }
    }
}

/// Work the reducer asks the driver to perform. Each completed effect comes
/// back as an [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SwitchChain(u64),
    RefreshBalances {
        account: Address,
        source: NetworkDescriptor,
        destination: NetworkDescriptor,
    },
    RefreshAllowance {
        owner: Address,
        network: NetworkDescriptor,
    },
    FetchQuote {
        seq: u64,
        source: NetworkDescriptor,
        destination: NetworkDescriptor,
        amount: U256,
        recipient: Address,
    },
    EstimateApprovalGas {
        seq: u64,
        owner: Address,
        network: NetworkDescriptor,
        amount: U256,
    },
    SubmitApproval {
        seq: u64,
        owner: Address,
        network: NetworkDescriptor,
        amount: U256,
        gas_limit: Option<u64>,
    },
    WaitForApprovalReceipt {
        seq: u64,
        network: NetworkDescriptor,
        tx_hash: TxHash,
    },
    /// Re-quote, estimate gas and check the balance before any wallet prompt.
    PrepareBridge {
        account: Address,
        source: NetworkDescriptor,
        destination: NetworkDescriptor,
        amount: U256,
        recipient: Address,
    },
    SubmitBridge {
        network: NetworkDescriptor,
        request: TransactionRequest,
    },
    WaitForReceipt {
        network: NetworkDescriptor,
        tx_hash: TxHash,
    },
    WatchSendEvents {
        network: NetworkDescriptor,
        tx_hash: TxHash,
    },
    UnwatchSendEvents {
        tx_hash: TxHash,
    },
    PollDelivery {
        tx_hash: TxHash,
        attempt: u32,
        delay: Duration,
    },
    ReturnToIdle {
        tx_hash: TxHash,
    },
}
