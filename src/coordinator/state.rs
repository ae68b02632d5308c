// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::{Address, TxHash, U256};

use crate::balances::Balances;
use crate::chain::{NetworkDescriptor, Registry};
use crate::config::PollingConfig;
use crate::contracts::oft::SentEvent;
use crate::error::{BridgeError, Result};
use crate::fees::FeeQuote;
use crate::protocol::DeliveryRecord;
use crate::units::parse_positive_amount;

/// Where the current bridge attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Preparing,
    AwaitingConfirmation,
    Pending,
    TransactionConfirmed,
    /// Delivered. Returns to idle on its own once surfaced.
    Confirmed,
    /// Resting point after a failure; the user retries explicitly.
    Error,
}

impl LifecycleState {
    /// Progress text for the presentation layer.
    pub fn status_message(&self) -> Option<&'static str> {
        match self {
            Self::Idle | Self::Error => None,
            Self::Preparing => Some("Preparing transaction..."),
            Self::AwaitingConfirmation => Some("Confirm the transaction in your wallet"),
            Self::Pending => Some("Transaction submitted, waiting for confirmation"),
            Self::TransactionConfirmed => {
                Some("Transaction confirmed, waiting for cross-chain delivery")
            }
            Self::Confirmed => Some("Bridge complete"),
        }
    }
}

/// Approval sub-machine, independent of [`LifecycleState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApprovalState {
    #[default]
    Idle,
    AwaitingConfirmation,
    Confirming,
    Success,
    Error,
}

impl ApprovalState {
    pub fn in_progress(&self) -> bool {
        matches!(self, Self::AwaitingConfirmation | Self::Confirming)
    }
}

/// What the user asked to bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferIntent {
    pub source: NetworkDescriptor,
    pub destination: NetworkDescriptor,
    /// Raw decimal input.
    pub amount: String,
    /// Percentage-of-balance helper kept in step with `amount`.
    pub percentage: u8,
    pub custom_recipient: bool,
    pub recipient_input: String,
}

impl TransferIntent {
    pub fn new(source: NetworkDescriptor, destination: NetworkDescriptor) -> Self {
        Self {
            source,
            destination,
            amount: String::new(),
            percentage: 0,
            custom_recipient: false,
            recipient_input: String::new(),
        }
    }

    /// The amount in smallest units, if it parses and is non-zero.
    pub fn parsed_amount(&self) -> Option<U256> {
        parse_positive_amount(&self.amount).ok()
    }
}

/// The single state container the reducer transforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeState {
    pub registry: Registry,
    pub polling: PollingConfig,

    pub account: Option<Address>,
    /// Chain the wallet currently reports.
    pub wallet_chain: Option<u64>,

    pub intent: TransferIntent,
    pub lifecycle: LifecycleState,
    pub approval: ApprovalState,

    pub balances: Balances,
    pub balances_loading: bool,
    pub allowance: Option<U256>,

    pub quote: Option<FeeQuote>,
    /// Sequence number of the latest quote request; older replies are dropped.
    pub quote_seq: u64,

    pub status: Option<String>,
    pub error: Option<String>,
    pub approval_error: Option<String>,
    /// Soft notices: gas shortfall, estimation trouble, monitor exhaustion.
    pub advisory: Option<String>,

    pub tx_hash: Option<TxHash>,
    pub approval_tx_hash: Option<TxHash>,
    /// Identifies the current approval flow; completions from an older flow
    /// (another network, another amount) are dropped.
    pub approval_seq: u64,
    pub delivery: Option<DeliveryRecord>,
    /// Hash whose delivery polls are still honoured. `None` cancels polling.
    pub delivery_watch: Option<TxHash>,
    /// Hash whose send-event subscription is open.
    pub event_watch: Option<TxHash>,
    pub sent_events: Vec<SentEvent>,
}

impl BridgeState {
    pub fn new(registry: Registry, polling: PollingConfig) -> Self {
        let (source, destination) = registry.default_pair();
        let intent = TransferIntent::new(source.clone(), destination.clone());
        Self {
            registry,
            polling,
            account: None,
            wallet_chain: None,
            intent,
            lifecycle: LifecycleState::Idle,
            approval: ApprovalState::Idle,
            balances: Balances::default(),
            balances_loading: false,
            allowance: None,
            quote: None,
            quote_seq: 0,
            status: None,
            error: None,
            approval_error: None,
            advisory: None,
            tx_hash: None,
            approval_tx_hash: None,
            approval_seq: 0,
            delivery: None,
            delivery_watch: None,
            event_watch: None,
            sent_events: Vec::new(),
        }
    }

    pub fn source(&self) -> &NetworkDescriptor {
        &self.intent.source
    }

    pub fn destination(&self) -> &NetworkDescriptor {
        &self.intent.destination
    }

    /// An attempt is running and inputs are locked.
    pub fn is_busy(&self) -> bool {
        match self.lifecycle {
            LifecycleState::TransactionConfirmed => self.delivery_watch.is_some(),
            _ => self.is_submitting(),
        }
    }

    /// A transaction is being prepared, signed or mined.
    pub fn is_submitting(&self) -> bool {
        matches!(
            self.lifecycle,
            LifecycleState::Preparing
                | LifecycleState::AwaitingConfirmation
                | LifecycleState::Pending
        )
    }

    /// Approved iff the approval flow succeeded or the allowance already
    /// covers the amount. Equal counts as enough.
    pub fn is_approved(&self) -> bool {
        if self.approval == ApprovalState::Success {
            return true;
        }
        match (self.allowance, self.intent.parsed_amount()) {
            (Some(allowance), Some(amount)) => allowance >= amount,
            _ => false,
        }
    }

    /// Where the tokens go: the custom address if enabled, else the account.
    pub fn recipient(&self) -> Result<Address> {
        if self.intent.custom_recipient {
            return self
                .intent
                .recipient_input
                .trim()
                .parse::<Address>()
                .map_err(|_| BridgeError::InvalidAddress(self.intent.recipient_input.clone()));
        }
        self.account.ok_or(BridgeError::NotConnected)
    }

    /// Checks every precondition for leaving idle, in order: connection,
    /// amount, approval, quote, recipient.
    ///
    /// # Errors
    ///
    /// The first failing guard as a validation error.
    pub fn bridge_guard(&self) -> Result<()> {
        if self.account.is_none() {
            return Err(BridgeError::NotConnected);
        }
        let amount = parse_positive_amount(&self.intent.amount)?;
        if !self.is_approved() {
            return Err(BridgeError::InsufficientAllowance { required: amount });
        }
        if self.quote.is_none() {
            return Err(BridgeError::MissingQuote);
        }
        self.recipient()?;
        Ok(())
    }

    pub fn can_bridge(&self) -> bool {
        !self.is_busy() && self.bridge_guard().is_ok()
    }

    pub fn can_approve(&self) -> bool {
        self.account.is_some()
            && !self.is_busy()
            && !self.approval.in_progress()
            && self.intent.parsed_amount().is_some()
            && !self.is_approved()
    }

    /// Network selectors are enabled.
    pub fn can_switch_chain(&self) -> bool {
        !self.is_busy()
    }

    /// The wallet reports a chain other than the selected source.
    pub fn wrong_network(&self) -> bool {
        self.wallet_chain
            .is_some_and(|chain| chain != self.source().chain_id())
    }
}
