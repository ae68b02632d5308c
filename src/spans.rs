// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Tracing span helpers for bridge operations
//!
//! Span names are static and attributes are structured, so traces from
//! different transfer attempts aggregate cleanly. The coordinator driver and
//! the delivery monitor enter these spans; they are public for callers who
//! drive effects themselves.
//!
//! # Example
//!
//! ```rust,no_run
//! use treat_bridge::spans;
//! use alloy_primitives::TxHash;
//!
//! let span = spans::watch_delivery(TxHash::ZERO, 60, 5);
//! let _guard = span.enter();
//! // poll the scan service
//! ```

use alloy_primitives::{Address, TxHash, U256};
use tracing::Span;

/// Create span for a fee quote against the source bridge.
///
/// Parent: treat_bridge.dispatch or treat_bridge.prepare_bridge
/// Children: RPC calls
#[inline]
pub fn quote_fee(chain_id: u64, bridge: &Address, destination_eid: u32, amount: &U256) -> Span {
    tracing::info_span!(
        "treat_bridge.quote_fee",
        chain_id = chain_id,
        bridge = %bridge,
        destination_eid = destination_eid,
        amount = %amount,
        fallback = tracing::field::Empty,
    )
}

/// Create span for gas estimation.
///
/// `kind` is `"approve"` or `"send"`.
#[inline]
pub fn estimate_gas(chain_id: u64, kind: &'static str) -> Span {
    tracing::debug_span!(
        "treat_bridge.estimate_gas",
        chain_id = chain_id,
        kind = kind,
        attempts = tracing::field::Empty,
    )
}

/// Create span for the pre-submission phase of a bridge: fresh quote, gas,
/// and the sufficiency check.
#[inline]
pub fn prepare_bridge(
    chain_id: u64,
    from_address: &Address,
    recipient: &Address,
    amount: &U256,
) -> Span {
    tracing::info_span!(
        "treat_bridge.prepare_bridge",
        chain_id = chain_id,
        from_address = %from_address,
        recipient = %recipient,
        amount = %amount,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for handing a transaction to the wallet for signing.
#[inline]
pub fn submit_transaction(chain_id: u64, kind: &'static str) -> Span {
    tracing::info_span!(
        "treat_bridge.submit_transaction",
        chain_id = chain_id,
        kind = kind,
        tx_hash = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for waiting until a source transaction is mined.
///
/// Children: RPC calls (polling)
#[inline]
pub fn wait_for_receipt(tx_hash: TxHash, chain_id: u64, max_attempts: u32) -> Span {
    tracing::debug_span!(
        "treat_bridge.wait_for_receipt",
        tx_hash = %tx_hash,
        chain_id = chain_id,
        max_attempts = max_attempts,
    )
}

/// Create span for the full delivery watch of one source transaction.
///
/// Children: treat_bridge.poll_delivery (one per attempt)
#[inline]
pub fn watch_delivery(tx_hash: TxHash, max_attempts: u32, poll_interval_secs: u64) -> Span {
    tracing::info_span!(
        "treat_bridge.watch_delivery",
        tx_hash = %tx_hash,
        max_attempts = max_attempts,
        poll_interval_secs = poll_interval_secs,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for a single scan service lookup.
///
/// Parent: treat_bridge.watch_delivery, or the driver when polling is
/// scheduled through effects
#[inline]
pub fn poll_delivery(tx_hash: TxHash, attempt: u32, max_attempts: u32) -> Span {
    tracing::debug_span!(
        "treat_bridge.poll_delivery",
        tx_hash = %tx_hash,
        attempt = attempt,
        max_attempts = max_attempts,
    )
}

/// Create span for feeding one event through the coordinator.
#[inline]
pub fn dispatch(event: &'static str) -> Span {
    tracing::debug_span!("treat_bridge.dispatch", event = event)
}

/// Record error attributes on the current span.
///
/// Follows OpenTelemetry semantic conventions: `error.type`,
/// `error.message`, and `error.source` when the error has one.
pub fn record_error<E: std::error::Error>(error: &E) {
    let current_span = tracing::Span::current();
    let message = error.to_string();
    current_span.record(
        "error.type",
        message.split(':').next().unwrap_or("Unknown"),
    );
    current_span.record("error.message", message.as_str());
    current_span.record("otel.status_code", "ERROR");

    if let Some(source) = error.source() {
        current_span.record("error.source", source.to_string());
    }
}

/// Record error attributes with custom context on the current span.
///
/// # Example
///
/// ```rust,no_run
/// use treat_bridge::spans;
///
/// let span = spans::submit_transaction(11155111, "send");
/// let _guard = span.enter();
/// spans::record_error_with_context(
///     "GasShortfall",
///     "native balance does not cover gas plus fee",
///     Some("no wallet prompt shown"),
/// );
/// ```
pub fn record_error_with_context(
    error_type: &str,
    error_message: &str,
    additional_context: Option<&str>,
) {
    let current_span = tracing::Span::current();
    current_span.record("error.type", error_type);
    current_span.record("error.message", error_message);
    current_span.record("otel.status_code", "ERROR");

    if let Some(context) = additional_context {
        current_span.record("error.context", context);
    }
}
