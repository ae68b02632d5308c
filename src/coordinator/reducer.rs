// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Pure transition function.
//!
//! `reduce` never performs I/O. It mutates the state container and returns
//! the effects the driver must run. Completions of effects come back as
//! events and are checked against the current state before they apply, so
//! late replies for an abandoned context are dropped.

use std::time::Duration;

use alloy_primitives::{Address, TxHash};
use tracing::{debug, info, warn};

use super::event::{Effect, Event};
use super::state::{ApprovalState, BridgeState, LifecycleState};
use crate::balances::Balances;
use crate::chain::NetworkDescriptor;
use crate::error::{BridgeError, Result};
use crate::gas::APPROVAL_ESTIMATE_ADVISORY;
use crate::monitor::{delivery_failure, PollDecision, EXHAUSTED_ADVISORY};
use crate::protocol::DeliveryRecord;
use crate::receipt::SourceReceipt;
use crate::units::{
    amount_for_percentage, format_amount, is_valid_amount_input, percentage_of_balance,
};

/// Applies `event` to `state` and returns the effects to run, in order.
pub fn reduce(state: &mut BridgeState, event: Event) -> Vec<Effect> {
    let mut effects = Vec::new();

    match event {
        Event::Connected { account, chain_id } => {
            state.account = Some(account);
            if !on_chain_changed(state, chain_id, &mut effects) && !state.is_busy() {
                refresh_context(state, &mut effects);
                request_quote(state, &mut effects);
            }
        }
        Event::Disconnected => on_disconnected(state, &mut effects),
        Event::AccountChanged(account) => on_account_changed(state, account, &mut effects),
        Event::ChainChanged(chain_id) => {
            on_chain_changed(state, chain_id, &mut effects);
        }

        Event::SelectSource(chain_id) => on_select(state, chain_id, Side::Source, &mut effects),
        Event::SelectDestination(chain_id) => {
            on_select(state, chain_id, Side::Destination, &mut effects)
        }
        Event::SwapNetworks => {
            if inputs_locked(state, "swap_networks") {
                return effects;
            }
            let source = state.destination().clone();
            let destination = state.source().clone();
            change_networks(state, source, destination, &mut effects);
        }

        Event::SetAmount(input) => on_set_amount(state, input, &mut effects),
        Event::SetPercentage(percent) => on_set_percentage(state, percent, &mut effects),
        Event::ToggleCustomRecipient(enabled) => {
            if !inputs_locked(state, "toggle_custom_recipient") {
                state.intent.custom_recipient = enabled;
                clear_validation(state);
                request_quote(state, &mut effects);
            }
        }
        Event::SetRecipient(input) => {
            if !inputs_locked(state, "set_recipient") {
                state.intent.recipient_input = input;
                clear_validation(state);
                request_quote(state, &mut effects);
            }
        }

        Event::RequestApproval => on_request_approval(state, &mut effects),
        Event::RequestBridge => on_request_bridge(state, &mut effects),
        Event::Dismiss => {
            if !state.is_busy() {
                reset_attempt(state, &mut effects);
            }
        }
        Event::Reset => {
            info!(lifecycle = ?state.lifecycle, event = "coordinator_reset");
            reset_attempt(state, &mut effects);
            clear_intent(state);
            reset_approval(state);
            refresh_context(state, &mut effects);
        }

        Event::Refresh => {
            refresh_context(state, &mut effects);
            // A running attempt takes its own fresh quote.
            if !state.is_busy() {
                request_quote(state, &mut effects);
            }
        }

        Event::BalancesLoaded {
            source_chain,
            destination_chain,
            balances,
        } => on_balances_loaded(state, source_chain, destination_chain, balances),
        Event::AllowanceLoaded {
            chain_id,
            allowance,
        } => {
            if chain_id == state.source().chain_id() {
                state.allowance = allowance;
            } else {
                debug!(chain_id = chain_id, event = "stale_allowance_dropped");
            }
        }
        Event::QuoteFetched { seq, quote } => {
            if seq == state.quote_seq {
                state.quote = Some(quote);
            } else {
                debug!(
                    seq = seq,
                    current_seq = state.quote_seq,
                    event = "stale_quote_dropped"
                );
            }
        }

        Event::ApprovalGasEstimated { seq, gas_limit } => {
            if !stale_approval(state, seq, ApprovalState::AwaitingConfirmation) {
                on_approval_gas_estimated(state, gas_limit, &mut effects)
            }
        }
        Event::ApprovalSubmitted { seq, tx_hash } => {
            if !stale_approval(state, seq, ApprovalState::AwaitingConfirmation) {
                state.approval = ApprovalState::Confirming;
                state.approval_tx_hash = Some(tx_hash);
                effects.push(Effect::WaitForApprovalReceipt {
                    seq,
                    network: state.source().clone(),
                    tx_hash,
                });
            }
        }
        Event::ApprovalSubmitFailed { seq, error } => {
            if stale_approval(state, seq, ApprovalState::AwaitingConfirmation) {
                return effects;
            }
            if error.is_user_rejection() {
                debug!(event = "approval_rejected_by_user");
                state.approval = ApprovalState::Idle;
            } else {
                warn!(error = %error, event = "approval_submit_failed");
                state.approval = ApprovalState::Error;
                state.approval_error = Some(error.user_message());
            }
        }
        Event::ApprovalReceipt {
            seq,
            tx_hash,
            result,
        } => {
            if !stale_approval(state, seq, ApprovalState::Confirming) {
                on_approval_receipt(state, tx_hash, result, &mut effects)
            }
        }

        Event::BridgePrepared { quote, request } => {
            if state.lifecycle != LifecycleState::Preparing {
                debug!(lifecycle = ?state.lifecycle, event = "stale_preparation_dropped");
                return effects;
            }
            state.quote = Some(quote);
            enter(state, LifecycleState::AwaitingConfirmation);
            effects.push(Effect::SubmitBridge {
                network: state.source().clone(),
                request,
            });
        }
        Event::BridgePreparationFailed(err) => {
            if state.lifecycle != LifecycleState::Preparing {
                return effects;
            }
            if matches!(err, BridgeError::GasShortfall { .. }) {
                info!(error = %err, event = "bridge_aborted_gas_shortfall");
                enter(state, LifecycleState::Idle);
                state.advisory = Some(err.user_message());
            } else {
                fail(state, &err);
            }
        }
        Event::BridgeSubmitted(tx_hash) => {
            if state.lifecycle != LifecycleState::AwaitingConfirmation {
                return effects;
            }
            info!(tx_hash = %tx_hash, event = "bridge_submitted");
            state.tx_hash = Some(tx_hash);
            enter(state, LifecycleState::Pending);
            effects.push(Effect::WaitForReceipt {
                network: state.source().clone(),
                tx_hash,
            });
        }
        Event::BridgeSubmitFailed(err) => {
            if state.lifecycle != LifecycleState::AwaitingConfirmation {
                return effects;
            }
            if err.is_user_rejection() {
                debug!(event = "bridge_rejected_by_user");
                enter(state, LifecycleState::Idle);
                state.error = None;
            } else {
                fail(state, &err);
            }
        }
        Event::BridgeReceipt { tx_hash, result } => {
            on_bridge_receipt(state, tx_hash, result, &mut effects)
        }
        Event::SendEventsObserved { tx_hash, events } => {
            if state.event_watch != Some(tx_hash) {
                return effects;
            }
            for sent in events {
                if !state.sent_events.contains(&sent) {
                    state.sent_events.push(sent);
                }
            }
        }
        Event::DeliveryPolled {
            tx_hash,
            attempt,
            result,
        } => on_delivery_polled(state, tx_hash, attempt, result, &mut effects),
        Event::SuccessSurfaced { tx_hash } => {
            if state.lifecycle == LifecycleState::Confirmed && state.tx_hash == Some(tx_hash) {
                // The success text and links stay until the next action.
                let status = state.status.take();
                enter(state, LifecycleState::Idle);
                state.status = status;
            }
        }
    }

    effects
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Source,
    Destination,
}

/// Writes the lifecycle and its status text together.
fn enter(state: &mut BridgeState, lifecycle: LifecycleState) {
    debug!(from = ?state.lifecycle, to = ?lifecycle, event = "lifecycle_transition");
    state.lifecycle = lifecycle;
    state.status = lifecycle.status_message().map(str::to_string);
}

fn fail(state: &mut BridgeState, err: &BridgeError) {
    warn!(lifecycle = ?state.lifecycle, error = %err, event = "bridge_failed");
    enter(state, LifecycleState::Error);
    state.error = Some(err.user_message());
}

fn inputs_locked(state: &BridgeState, input: &'static str) -> bool {
    let locked = state.is_busy();
    if locked {
        debug!(input = input, lifecycle = ?state.lifecycle, event = "input_ignored_while_busy");
    }
    locked
}

/// Validation messages only live while idle.
fn clear_validation(state: &mut BridgeState) {
    if state.lifecycle == LifecycleState::Idle {
        state.error = None;
    }
}

/// Drops everything tied to the current attempt, including its scoped
/// subscription and delivery poll.
fn reset_attempt(state: &mut BridgeState, effects: &mut Vec<Effect>) {
    if let Some(tx_hash) = state.event_watch.take() {
        effects.push(Effect::UnwatchSendEvents { tx_hash });
    }
    state.delivery_watch = None;
    state.tx_hash = None;
    state.delivery = None;
    state.sent_events.clear();
    state.error = None;
    state.advisory = None;
    enter(state, LifecycleState::Idle);
}

fn clear_intent(state: &mut BridgeState) {
    state.intent.amount.clear();
    state.intent.percentage = 0;
    invalidate_quote(state);
}

fn invalidate_quote(state: &mut BridgeState) {
    state.quote = None;
    state.quote_seq += 1;
}

fn reset_approval(state: &mut BridgeState) {
    state.approval_seq += 1;
    state.approval = ApprovalState::Idle;
    state.approval_tx_hash = None;
    state.approval_error = None;
}

fn refresh_context(state: &mut BridgeState, effects: &mut Vec<Effect>) {
    let Some(account) = state.account else {
        return;
    };
    state.balances_loading = true;
    effects.push(Effect::RefreshBalances {
        account,
        source: state.source().clone(),
        destination: state.destination().clone(),
    });
    effects.push(Effect::RefreshAllowance {
        owner: account,
        network: state.source().clone(),
    });
}

/// Invalidates any outstanding quote and asks for a new one when the intent
/// is complete enough to quote.
fn request_quote(state: &mut BridgeState, effects: &mut Vec<Effect>) {
    invalidate_quote(state);
    let (Some(amount), Ok(recipient)) = (state.intent.parsed_amount(), state.recipient()) else {
        return;
    };
    effects.push(Effect::FetchQuote {
        seq: state.quote_seq,
        source: state.source().clone(),
        destination: state.destination().clone(),
        amount,
        recipient,
    });
}

/// Installs a new network pair and resets everything derived from the old one.
fn change_networks(
    state: &mut BridgeState,
    source: NetworkDescriptor,
    destination: NetworkDescriptor,
    effects: &mut Vec<Effect>,
) {
    let source_changed = source.chain_id() != state.source().chain_id();
    info!(
        source_chain = source.chain_id(),
        destination_chain = destination.chain_id(),
        event = "networks_changed"
    );

    state.intent.source = source;
    state.intent.destination = destination;

    reset_attempt(state, effects);
    clear_intent(state);
    reset_approval(state);
    state.allowance = None;
    state.balances = Balances::default();
    state.balances_loading = false;

    let source_chain = state.source().chain_id();
    if source_changed && state.wallet_chain != Some(source_chain) {
        effects.push(Effect::SwitchChain(source_chain));
    }
    refresh_context(state, effects);
    request_quote(state, effects);
}

fn on_select(state: &mut BridgeState, chain_id: u64, side: Side, effects: &mut Vec<Effect>) {
    if inputs_locked(state, "select_network") {
        return;
    }
    let Some(selected) = state.registry.lookup_by_chain_id(chain_id).cloned() else {
        warn!(chain_id = chain_id, event = "unknown_network_selected");
        return;
    };

    let (source, destination) = match side {
        Side::Source if chain_id == state.source().chain_id() => return,
        Side::Destination if chain_id == state.destination().chain_id() => return,
        // Picking the other side's network swaps the pair.
        Side::Source if chain_id == state.destination().chain_id() => {
            (selected, state.source().clone())
        }
        Side::Destination if chain_id == state.source().chain_id() => {
            (state.destination().clone(), selected)
        }
        Side::Source => (selected, state.destination().clone()),
        Side::Destination => (state.source().clone(), selected),
    };

    change_networks(state, source, destination, effects);
}

/// Returns whether the network pair changed.
///
/// A wallet switch while delivery is being watched starts a new context and
/// cancels the watch; only an attempt that has not been mined yet holds the
/// pair in place.
fn on_chain_changed(state: &mut BridgeState, chain_id: u64, effects: &mut Vec<Effect>) -> bool {
    state.wallet_chain = Some(chain_id);
    if state.is_submitting() || chain_id == state.source().chain_id() {
        return false;
    }
    let Some(source) = state.registry.lookup_by_chain_id(chain_id).cloned() else {
        warn!(chain_id = chain_id, event = "wallet_on_unsupported_chain");
        return false;
    };

    let destination = if state.destination().chain_id() == chain_id {
        state
            .registry
            .first_other(chain_id)
            .cloned()
            .unwrap_or_else(|| state.source().clone())
    } else {
        state.destination().clone()
    };

    change_networks(state, source, destination, effects);
    true
}

fn on_account_changed(state: &mut BridgeState, account: Address, effects: &mut Vec<Effect>) {
    if state.account == Some(account) {
        return;
    }
    state.account = Some(account);
    if state.is_busy() {
        return;
    }
    reset_attempt(state, effects);
    reset_approval(state);
    state.allowance = None;
    state.balances = Balances::default();
    refresh_context(state, effects);
    request_quote(state, effects);
}

fn on_disconnected(state: &mut BridgeState, effects: &mut Vec<Effect>) {
    state.account = None;
    state.wallet_chain = None;
    state.allowance = None;
    state.balances = Balances::default();
    state.balances_loading = false;
    reset_approval(state);
    if !state.is_busy() {
        reset_attempt(state, effects);
        invalidate_quote(state);
    }
}

/// Amount edits: rejected outright when the text is not a decimal, ignored
/// while an attempt or approval runs.
fn on_set_amount(state: &mut BridgeState, input: String, effects: &mut Vec<Effect>) {
    if inputs_locked(state, "set_amount") || state.approval.in_progress() {
        return;
    }
    if !is_valid_amount_input(&input) {
        debug!(input = %input, event = "amount_input_rejected");
        return;
    }
    leave_confirmed(state, effects);

    state.intent.amount = input;
    state.intent.percentage = match (state.intent.parsed_amount(), state.balances.source) {
        (Some(amount), Some(balance)) => percentage_of_balance(amount, balance),
        _ => 0,
    };
    amount_changed(state, effects);
}

fn on_set_percentage(state: &mut BridgeState, percent: u8, effects: &mut Vec<Effect>) {
    if inputs_locked(state, "set_percentage") || state.approval.in_progress() {
        return;
    }
    let Some(balance) = state.balances.source else {
        debug!(event = "percentage_without_balance_ignored");
        return;
    };
    leave_confirmed(state, effects);

    let percent = percent.min(100);
    state.intent.percentage = percent;
    state.intent.amount = format_amount(amount_for_percentage(balance, percent));
    amount_changed(state, effects);
}

fn amount_changed(state: &mut BridgeState, effects: &mut Vec<Effect>) {
    // A past approval covered the old amount only.
    if state.approval == ApprovalState::Success || state.approval == ApprovalState::Error {
        reset_approval(state);
    }
    clear_validation(state);
    request_quote(state, effects);
}

/// A new action on a completed transfer starts a clean attempt.
fn leave_confirmed(state: &mut BridgeState, effects: &mut Vec<Effect>) {
    let finished = match state.lifecycle {
        LifecycleState::Confirmed => true,
        LifecycleState::Idle => state.delivery.is_some(),
        _ => false,
    };
    if finished {
        reset_attempt(state, effects);
    }
}

fn on_request_approval(state: &mut BridgeState, effects: &mut Vec<Effect>) {
    if state.is_busy() || state.approval.in_progress() || state.is_approved() {
        return;
    }
    let Some(owner) = state.account else {
        state.approval_error = Some(BridgeError::NotConnected.user_message());
        return;
    };
    let Some(amount) = state.intent.parsed_amount() else {
        state.approval_error =
            Some(BridgeError::InvalidAmount(state.intent.amount.clone()).user_message());
        return;
    };

    info!(owner = %owner, amount = %amount, event = "approval_requested");
    state.approval_seq += 1;
    state.approval = ApprovalState::AwaitingConfirmation;
    state.approval_error = None;
    state.advisory = None;
    effects.push(Effect::EstimateApprovalGas {
        seq: state.approval_seq,
        owner,
        network: state.source().clone(),
        amount,
    });
}

/// True when a completion belongs to an older approval flow or arrives in
/// the wrong sub-state.
fn stale_approval(state: &BridgeState, seq: u64, expected: ApprovalState) -> bool {
    let stale = seq != state.approval_seq || state.approval != expected;
    if stale {
        debug!(
            seq = seq,
            current_seq = state.approval_seq,
            approval = ?state.approval,
            event = "stale_approval_completion_dropped"
        );
    }
    stale
}

fn on_approval_gas_estimated(
    state: &mut BridgeState,
    gas_limit: Option<u64>,
    effects: &mut Vec<Effect>,
) {
    let (Some(owner), Some(amount)) = (state.account, state.intent.parsed_amount()) else {
        state.approval = ApprovalState::Idle;
        return;
    };
    if gas_limit.is_none() {
        state.advisory = Some(APPROVAL_ESTIMATE_ADVISORY.to_string());
    }
    effects.push(Effect::SubmitApproval {
        seq: state.approval_seq,
        owner,
        network: state.source().clone(),
        amount,
        gas_limit,
    });
}

fn on_approval_receipt(
    state: &mut BridgeState,
    tx_hash: TxHash,
    result: Result<SourceReceipt>,
    effects: &mut Vec<Effect>,
) {
    if state.approval != ApprovalState::Confirming || state.approval_tx_hash != Some(tx_hash) {
        debug!(tx_hash = %tx_hash, event = "stale_approval_receipt_dropped");
        return;
    }
    match result {
        Ok(receipt) if receipt.success => {
            info!(tx_hash = %tx_hash, event = "approval_confirmed");
            state.approval = ApprovalState::Success;
            if let Some(owner) = state.account {
                effects.push(Effect::RefreshAllowance {
                    owner,
                    network: state.source().clone(),
                });
            }
        }
        Ok(_) => {
            warn!(tx_hash = %tx_hash, event = "approval_reverted");
            state.approval = ApprovalState::Error;
            state.approval_error = Some(
                BridgeError::TransactionFailed {
                    reason: "approval reverted".to_string(),
                }
                .user_message(),
            );
        }
        Err(e) => {
            warn!(tx_hash = %tx_hash, error = %e, event = "approval_confirmation_failed");
            state.approval = ApprovalState::Error;
            state.approval_error = Some(e.user_message());
        }
    }
}

fn on_request_bridge(state: &mut BridgeState, effects: &mut Vec<Effect>) {
    if inputs_locked(state, "request_bridge") {
        return;
    }

    let checked = state.bridge_guard().and_then(|()| {
        let account = state.account.ok_or(BridgeError::NotConnected)?;
        let amount = state
            .intent
            .parsed_amount()
            .ok_or_else(|| BridgeError::InvalidAmount(state.intent.amount.clone()))?;
        Ok((account, amount, state.recipient()?))
    });

    reset_attempt(state, effects);

    let (account, amount, recipient) = match checked {
        Ok(checked) => checked,
        Err(e) => {
            debug!(error = %e, event = "bridge_guard_failed");
            state.error = Some(e.user_message());
            return;
        }
    };

    info!(
        account = %account,
        recipient = %recipient,
        amount = %amount,
        source_chain = state.source().chain_id(),
        destination_chain = state.destination().chain_id(),
        event = "bridge_requested"
    );

    // The send re-quotes; replies to earlier quote requests no longer apply.
    state.quote_seq += 1;
    enter(state, LifecycleState::Preparing);
    effects.push(Effect::PrepareBridge {
        account,
        source: state.source().clone(),
        destination: state.destination().clone(),
        amount,
        recipient,
    });
}

fn on_bridge_receipt(
    state: &mut BridgeState,
    tx_hash: TxHash,
    result: Result<SourceReceipt>,
    effects: &mut Vec<Effect>,
) {
    if state.lifecycle != LifecycleState::Pending || state.tx_hash != Some(tx_hash) {
        debug!(tx_hash = %tx_hash, event = "stale_receipt_dropped");
        return;
    }

    let receipt = match result {
        Ok(receipt) => receipt,
        Err(e) => return fail(state, &e),
    };
    if !receipt.success {
        return fail(
            state,
            &BridgeError::TransactionFailed {
                reason: format!("{tx_hash} reverted"),
            },
        );
    }

    info!(
        tx_hash = %tx_hash,
        block_number = ?receipt.block_number,
        event = "bridge_transaction_confirmed"
    );
    enter(state, LifecycleState::TransactionConfirmed);
    state.delivery = Some(DeliveryRecord::new(tx_hash));
    state.delivery_watch = Some(tx_hash);
    state.event_watch = Some(tx_hash);

    refresh_context(state, effects);
    effects.push(Effect::WatchSendEvents {
        network: state.source().clone(),
        tx_hash,
    });
    effects.push(Effect::PollDelivery {
        tx_hash,
        attempt: 1,
        delay: Duration::ZERO,
    });
}

fn on_delivery_polled(
    state: &mut BridgeState,
    tx_hash: TxHash,
    attempt: u32,
    result: Result<DeliveryRecord>,
    effects: &mut Vec<Effect>,
) {
    if state.delivery_watch != Some(tx_hash) {
        debug!(tx_hash = %tx_hash, attempt = attempt, event = "stale_delivery_poll_dropped");
        return;
    }

    let record = match result {
        Ok(record) => record,
        Err(e) => {
            state.delivery_watch = None;
            return fail(state, &e);
        }
    };
    state.delivery = Some(record.clone());

    match PollDecision::for_record(&record) {
        PollDecision::Delivered => {
            info!(
                tx_hash = %tx_hash,
                destination_tx_hash = ?record.destination_tx_hash,
                attempt = attempt,
                event = "bridge_delivered"
            );
            state.delivery_watch = None;
            enter(state, LifecycleState::Confirmed);
            clear_intent(state);
            reset_approval(state);
            refresh_context(state, effects);
            effects.push(Effect::ReturnToIdle { tx_hash });
        }
        PollDecision::Failed => {
            state.delivery_watch = None;
            fail(state, &delivery_failure(&record));
        }
        PollDecision::Continue if attempt < state.polling.max_attempts => {
            effects.push(Effect::PollDelivery {
                tx_hash,
                attempt: attempt + 1,
                delay: state.polling.poll_interval(),
            });
        }
        PollDecision::Continue => {
            info!(
                tx_hash = %tx_hash,
                max_attempts = state.polling.max_attempts,
                event = "delivery_polling_exhausted"
            );
            state.delivery_watch = None;
            state.advisory = Some(EXHAUSTED_ADVISORY.to_string());
        }
    }
}

fn on_balances_loaded(
    state: &mut BridgeState,
    source_chain: u64,
    destination_chain: u64,
    balances: Balances,
) {
    if source_chain != state.source().chain_id()
        || destination_chain != state.destination().chain_id()
    {
        debug!(
            source_chain = source_chain,
            destination_chain = destination_chain,
            event = "stale_balances_dropped"
        );
        return;
    }
    state.balances = balances;
    state.balances_loading = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Registry;
    use crate::config::PollingConfig;
    use crate::fees::FeeQuote;
    use crate::protocol::DeliveryStatus;
    use alloy_primitives::U256;

    const SEPOLIA: u64 = 11155111;

    fn connected() -> BridgeState {
        let mut state = BridgeState::new(Registry::testnet(), PollingConfig::default());
        reduce(
            &mut state,
            Event::Connected {
                account: Address::repeat_byte(0xaa),
                chain_id: SEPOLIA,
            },
        );
        state
    }

    fn watching(tx_hash: TxHash) -> BridgeState {
        let mut state = connected();
        state.lifecycle = LifecycleState::TransactionConfirmed;
        state.tx_hash = Some(tx_hash);
        state.delivery = Some(DeliveryRecord::new(tx_hash));
        state.delivery_watch = Some(tx_hash);
        state.event_watch = Some(tx_hash);
        state
    }

    #[test]
    fn test_connect_refreshes_balances_and_allowance() {
        let mut state = BridgeState::new(Registry::testnet(), PollingConfig::default());
        let effects = reduce(
            &mut state,
            Event::Connected {
                account: Address::repeat_byte(0xaa),
                chain_id: SEPOLIA,
            },
        );

        assert!(state.balances_loading);
        assert!(matches!(effects[0], Effect::RefreshBalances { .. }));
        assert!(matches!(effects[1], Effect::RefreshAllowance { .. }));
        assert_eq!(effects.len(), 2, "no quote without an amount");
    }

    #[test]
    fn test_stale_quote_is_dropped() {
        let mut state = connected();
        let first = reduce(&mut state, Event::SetAmount("1".into()));
        let second = reduce(&mut state, Event::SetAmount("2".into()));

        let seq_of = |effects: &[Effect]| match effects.last() {
            Some(Effect::FetchQuote { seq, .. }) => *seq,
            other => panic!("expected a quote request, got {other:?}"),
        };
        let (old_seq, new_seq) = (seq_of(&first), seq_of(&second));

        reduce(
            &mut state,
            Event::QuoteFetched {
                seq: new_seq,
                quote: FeeQuote::fallback(U256::from(2)),
            },
        );
        reduce(
            &mut state,
            Event::QuoteFetched {
                seq: old_seq,
                quote: FeeQuote::fallback(U256::from(1)),
            },
        );

        assert_eq!(state.quote.map(|q| q.native_fee), Some(U256::from(2)));
    }

    #[test]
    fn test_amount_edits_ignored_while_busy() {
        let mut state = connected();
        reduce(&mut state, Event::SetAmount("1".into()));
        state.lifecycle = LifecycleState::Pending;

        let effects = reduce(&mut state, Event::SetAmount("5".into()));

        assert!(effects.is_empty());
        assert_eq!(state.intent.amount, "1");
    }

    #[test]
    fn test_invalid_amount_text_is_ignored() {
        let mut state = connected();
        reduce(&mut state, Event::SetAmount("1".into()));
        let effects = reduce(&mut state, Event::SetAmount("1e5".into()));

        assert!(effects.is_empty());
        assert_eq!(state.intent.amount, "1");
    }

    #[test]
    fn test_amount_change_resets_finished_approval() {
        let mut state = connected();
        reduce(&mut state, Event::SetAmount("1".into()));
        state.approval = ApprovalState::Success;

        reduce(&mut state, Event::SetAmount("2".into()));

        assert_eq!(state.approval, ApprovalState::Idle);
    }

    #[test]
    fn test_guard_failure_stays_idle() {
        let mut state = connected();
        reduce(&mut state, Event::SetAmount("1".into()));

        let effects = reduce(&mut state, Event::RequestBridge);

        assert!(effects.is_empty());
        assert_eq!(state.lifecycle, LifecycleState::Idle);
        assert!(state.error.is_some());
    }

    #[test]
    fn test_stale_delivery_poll_is_dropped() {
        let current = TxHash::repeat_byte(2);
        let mut state = watching(current);

        let effects = reduce(
            &mut state,
            Event::DeliveryPolled {
                tx_hash: TxHash::repeat_byte(1),
                attempt: 3,
                result: Err(BridgeError::ScanQuery("gone".into())),
            },
        );

        assert!(effects.is_empty());
        assert_eq!(state.lifecycle, LifecycleState::TransactionConfirmed);
        assert_eq!(state.delivery_watch, Some(current));
    }

    #[test]
    fn test_in_flight_poll_schedules_next_with_interval() {
        let tx_hash = TxHash::repeat_byte(2);
        let mut state = watching(tx_hash);

        let effects = reduce(
            &mut state,
            Event::DeliveryPolled {
                tx_hash,
                attempt: 1,
                result: Ok(DeliveryRecord::new(tx_hash)),
            },
        );

        assert_eq!(
            effects,
            vec![Effect::PollDelivery {
                tx_hash,
                attempt: 2,
                delay: Duration::from_secs(5),
            }]
        );
    }

    #[test]
    fn test_last_attempt_sets_advisory_without_error() {
        let tx_hash = TxHash::repeat_byte(2);
        let mut state = watching(tx_hash);
        let max_attempts = state.polling.max_attempts;

        let effects = reduce(
            &mut state,
            Event::DeliveryPolled {
                tx_hash,
                attempt: max_attempts,
                result: Ok(DeliveryRecord::new(tx_hash)),
            },
        );

        assert!(effects.is_empty());
        assert_eq!(state.advisory.as_deref(), Some(EXHAUSTED_ADVISORY));
        assert!(state.error.is_none());
        assert!(!state.is_busy());
    }

    #[test]
    fn test_dismiss_tears_down_subscription() {
        let tx_hash = TxHash::repeat_byte(2);
        let mut state = watching(tx_hash);
        state.delivery_watch = None;

        let effects = reduce(&mut state, Event::Dismiss);

        assert_eq!(effects, vec![Effect::UnwatchSendEvents { tx_hash }]);
        assert!(state.event_watch.is_none());
        assert_eq!(state.lifecycle, LifecycleState::Idle);
    }

    #[test]
    fn test_approval_completion_from_previous_network_is_dropped() {
        let mut state = connected();
        reduce(&mut state, Event::SetAmount("1".into()));
        reduce(&mut state, Event::RequestApproval);
        let sepolia_seq = state.approval_seq;

        reduce(&mut state, Event::SelectSource(80002));
        reduce(&mut state, Event::SetAmount("1".into()));
        reduce(&mut state, Event::RequestApproval);
        assert_ne!(state.approval_seq, sepolia_seq);

        let effects = reduce(
            &mut state,
            Event::ApprovalSubmitted {
                seq: sepolia_seq,
                tx_hash: TxHash::repeat_byte(9),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(state.approval, ApprovalState::AwaitingConfirmation);
        assert!(state.approval_tx_hash.is_none());

        let seq = state.approval_seq;
        let effects = reduce(
            &mut state,
            Event::ApprovalGasEstimated {
                seq,
                gas_limit: Some(60_000),
            },
        );
        assert!(matches!(
            &effects[..],
            [Effect::SubmitApproval { network, .. }] if network.chain_id() == 80002
        ));
    }

    #[test]
    fn test_stale_approval_receipt_cannot_mark_success() {
        let mut state = connected();
        reduce(&mut state, Event::SetAmount("1".into()));
        reduce(&mut state, Event::RequestApproval);
        let seq = state.approval_seq;
        let tx_hash = TxHash::repeat_byte(9);
        reduce(&mut state, Event::ApprovalSubmitted { seq, tx_hash });

        reduce(&mut state, Event::Reset);
        let effects = reduce(
            &mut state,
            Event::ApprovalReceipt {
                seq,
                tx_hash,
                result: Ok(SourceReceipt::success(tx_hash, 100)),
            },
        );

        assert!(effects.is_empty());
        assert_eq!(state.approval, ApprovalState::Idle);
    }

    #[test]
    fn test_refresh_keeps_intent() {
        let mut state = connected();
        reduce(&mut state, Event::SetAmount("1".into()));

        let effects = reduce(&mut state, Event::Refresh);

        assert_eq!(state.intent.amount, "1");
        assert!(state.balances_loading);
        assert!(matches!(effects[0], Effect::RefreshBalances { .. }));
        assert!(matches!(effects[1], Effect::RefreshAllowance { .. }));
        assert!(matches!(
            effects[2],
            Effect::FetchQuote { seq, .. } if seq == state.quote_seq
        ));
    }

    #[test]
    fn test_refresh_while_watching_skips_quote() {
        let mut state = watching(TxHash::repeat_byte(2));

        let effects = reduce(&mut state, Event::Refresh);

        assert_eq!(effects.len(), 2);
        assert_eq!(state.lifecycle, LifecycleState::TransactionConfirmed);
    }

    #[test]
    fn test_delivered_surfaces_success_then_returns_to_idle() {
        let tx_hash = TxHash::repeat_byte(2);
        let mut state = watching(tx_hash);
        let mut delivered = DeliveryRecord::new(tx_hash);
        delivered.status = DeliveryStatus::Delivered;

        let effects = reduce(
            &mut state,
            Event::DeliveryPolled {
                tx_hash,
                attempt: 2,
                result: Ok(delivered),
            },
        );
        assert_eq!(state.lifecycle, LifecycleState::Confirmed);
        assert_eq!(effects.last(), Some(&Effect::ReturnToIdle { tx_hash }));

        reduce(&mut state, Event::SuccessSurfaced { tx_hash });

        assert_eq!(state.lifecycle, LifecycleState::Idle);
        assert_eq!(state.status.as_deref(), Some("Bridge complete"));
        assert_eq!(state.tx_hash, Some(tx_hash));
        assert!(state.intent.amount.is_empty());

        let effects = reduce(&mut state, Event::SetAmount("2".into()));
        assert_eq!(effects[0], Effect::UnwatchSendEvents { tx_hash });
        assert!(state.status.is_none());
        assert!(state.delivery.is_none());
    }

    #[test]
    fn test_wallet_switch_during_delivery_cancels_watch() {
        let tx_hash = TxHash::repeat_byte(2);
        let mut state = watching(tx_hash);

        let effects = reduce(&mut state, Event::ChainChanged(97));

        assert_eq!(effects[0], Effect::UnwatchSendEvents { tx_hash });
        assert!(state.delivery_watch.is_none());
        assert_eq!(state.lifecycle, LifecycleState::Idle);
        assert_eq!(state.source().chain_id(), 97);
    }

    #[test]
    fn test_wallet_switch_while_pending_keeps_pair() {
        let mut state = connected();
        state.lifecycle = LifecycleState::Pending;

        let effects = reduce(&mut state, Event::ChainChanged(97));

        assert!(effects.is_empty());
        assert_eq!(state.source().chain_id(), SEPOLIA);
        assert_eq!(state.wallet_chain, Some(97));
    }

    #[test]
    fn test_balances_for_previous_pair_are_dropped() {
        let mut state = connected();
        reduce(&mut state, Event::SwapNetworks);

        reduce(
            &mut state,
            Event::BalancesLoaded {
                source_chain: SEPOLIA,
                destination_chain: 97,
                balances: Balances {
                    source: Some(U256::from(1)),
                    destination: None,
                    native: None,
                },
            },
        );

        assert!(state.balances.source.is_none());
        assert!(state.balances_loading);
    }
}
