// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Presentation projection of the coordinator state
//!
//! [`BridgeView`] is everything a front end needs to render the bridge form:
//! which action button to show and whether it is enabled, progress and error
//! text, and display-ready balances and fees. It is derived from
//! [`BridgeState`] and holds no state of its own.

use alloy_primitives::{TxHash, U256};

use crate::config::LAYERZERO_SCAN_TX_PAGE_TESTNET;
use crate::contracts::oft::SentEvent;
use crate::coordinator::{ApprovalState, BridgeState, LifecycleState};
use crate::protocol::DeliveryStatus;
use crate::units::{format_fixed, BALANCE_DISPLAY_DECIMALS, FEE_DISPLAY_DECIMALS};

pub const LOADING_PLACEHOLDER: &str = "Loading...";
pub const UNAVAILABLE_PLACEHOLDER: &str = "N/A";
pub const CALCULATING_PLACEHOLDER: &str = "Calculating...";

/// The primary button of the bridge form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionButton {
    Connect,
    SwitchNetwork,
    Approve,
    Approving,
    Bridge,
    Bridging,
    TryAgain,
}

impl ActionButton {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Connect => "Connect Wallet",
            Self::SwitchNetwork => "Switch Network",
            Self::Approve => "Approve",
            Self::Approving => "Approving...",
            Self::Bridge => "Bridge",
            Self::Bridging => "Bridging...",
            Self::TryAgain => "Try Again",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeView {
    pub lifecycle: LifecycleState,
    pub approval: ApprovalState,
    pub action: ActionButton,
    pub action_enabled: bool,

    pub can_approve: bool,
    pub can_bridge: bool,
    /// Network selectors and the swap control are enabled.
    pub can_switch_chain: bool,
    pub wrong_network: bool,

    pub status: Option<String>,
    pub error: Option<String>,
    pub approval_error: Option<String>,
    pub advisory: Option<String>,

    pub source_balance: String,
    pub destination_balance: String,
    pub fee: String,
    pub fee_is_estimate: bool,

    pub tx_hash: Option<TxHash>,
    pub explorer_url: Option<String>,
    pub scan_url: Option<String>,
    pub delivery_status: Option<DeliveryStatus>,
    pub destination_tx_hash: Option<TxHash>,
    pub sent_events: Vec<SentEvent>,
}

impl From<&BridgeState> for BridgeView {
    fn from(state: &BridgeState) -> Self {
        let action = action_for(state);
        let action_enabled = match action {
            ActionButton::Connect | ActionButton::TryAgain => true,
            ActionButton::SwitchNetwork => state.can_switch_chain(),
            ActionButton::Approve => state.can_approve(),
            ActionButton::Bridge => state.can_bridge(),
            ActionButton::Approving | ActionButton::Bridging => false,
        };

        let source = state.source();
        let fee = match &state.quote {
            Some(quote) => format!(
                "{} {}",
                format_fixed(quote.native_fee, FEE_DISPLAY_DECIMALS),
                source.native_symbol
            ),
            None => CALCULATING_PLACEHOLDER.to_string(),
        };

        Self {
            lifecycle: state.lifecycle,
            approval: state.approval,
            action,
            action_enabled,
            can_approve: state.can_approve(),
            can_bridge: state.can_bridge(),
            can_switch_chain: state.can_switch_chain(),
            wrong_network: state.wrong_network(),
            status: state.status.clone(),
            error: state.error.clone(),
            approval_error: state.approval_error.clone(),
            advisory: state.advisory.clone(),
            source_balance: balance_text(state, state.balances.source),
            destination_balance: balance_text(state, state.balances.destination),
            fee,
            fee_is_estimate: state.quote.as_ref().is_some_and(|q| q.is_fallback),
            tx_hash: state.tx_hash,
            explorer_url: state.tx_hash.map(|hash| source.explorer_tx_url(hash)),
            scan_url: state.tx_hash.map(scan_url),
            delivery_status: state.delivery.as_ref().map(|d| d.status),
            destination_tx_hash: state.delivery.as_ref().and_then(|d| d.destination_tx_hash),
            sent_events: state.sent_events.clone(),
        }
    }
}

/// LayerZero scan page for a source transaction.
pub fn scan_url(tx_hash: TxHash) -> String {
    format!("{LAYERZERO_SCAN_TX_PAGE_TESTNET}{tx_hash}")
}

fn action_for(state: &BridgeState) -> ActionButton {
    if state.account.is_none() {
        return ActionButton::Connect;
    }
    if state.wrong_network() {
        return ActionButton::SwitchNetwork;
    }
    if state.approval.in_progress() {
        return ActionButton::Approving;
    }
    if state.is_busy() {
        return ActionButton::Bridging;
    }
    if state.lifecycle == LifecycleState::Error {
        return ActionButton::TryAgain;
    }
    if state.intent.parsed_amount().is_some() && !state.is_approved() {
        return ActionButton::Approve;
    }
    ActionButton::Bridge
}

fn balance_text(state: &BridgeState, balance: Option<U256>) -> String {
    if state.account.is_none() {
        return UNAVAILABLE_PLACEHOLDER.to_string();
    }
    if state.balances_loading {
        return LOADING_PLACEHOLDER.to_string();
    }
    match balance {
        Some(value) => format_fixed(value, BALANCE_DISPLAY_DECIMALS),
        None => UNAVAILABLE_PLACEHOLDER.to_string(),
    }
}
