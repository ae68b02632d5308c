// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Cross-chain delivery monitoring
//!
//! [`DeliveryMonitor::poll_once`] performs one scan lookup and folds it into a
//! [`DeliveryRecord`]. The coordinator schedules those lookups itself, keyed by
//! the active source hash. [`DeliveryMonitor::watch`] runs the same lookups in
//! a self-contained loop for callers that drive a transfer without the
//! coordinator.

use alloy_primitives::TxHash;
use tracing::{debug, error, info, trace, Instrument};

use crate::config::PollingConfig;
use crate::error::{BridgeError, Result};
use crate::protocol::{DeliveryRecord, DeliveryStatus};
use crate::spans;
use crate::traits::{Clock, MessageScanProvider};

/// Advisory shown when the attempt budget runs out before delivery.
pub const EXHAUSTED_ADVISORY: &str =
    "Unable to confirm cross-chain delivery. Check the explorer for the latest status.";

/// How a finished [`DeliveryMonitor::watch`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
    Delivered(DeliveryRecord),
    /// The budget ran out. The source transaction still succeeded.
    Exhausted(DeliveryRecord),
}

/// What the caller should do after one lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    Delivered,
    Failed,
    /// Keep polling if the budget allows.
    Continue,
}

impl PollDecision {
    pub fn for_record(record: &DeliveryRecord) -> Self {
        match record.status {
            DeliveryStatus::Delivered => Self::Delivered,
            DeliveryStatus::Failed => Self::Failed,
            DeliveryStatus::InFlight | DeliveryStatus::Confirming => Self::Continue,
        }
    }
}

/// Error for a message the scan service reports as failed.
pub fn delivery_failure(record: &DeliveryRecord) -> BridgeError {
    BridgeError::DeliveryFailed {
        reason: record
            .error
            .clone()
            .unwrap_or_else(|| format!("message from {} failed", record.source_tx_hash)),
    }
}

/// Polls the scan service for the message emitted by a source transaction.
#[derive(Debug)]
pub struct DeliveryMonitor<'a, S: ?Sized, C: ?Sized> {
    scan: &'a S,
    clock: &'a C,
    config: PollingConfig,
}

impl<'a, S, C> DeliveryMonitor<'a, S, C>
where
    S: MessageScanProvider + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(scan: &'a S, clock: &'a C, config: PollingConfig) -> Self {
        Self {
            scan,
            clock,
            config,
        }
    }

    /// One lookup, folded into `record`.
    ///
    /// An empty response leaves the record unchanged.
    ///
    /// # Errors
    ///
    /// Propagates scan query failures.
    pub async fn poll_once(&self, record: &DeliveryRecord) -> Result<DeliveryRecord> {
        let response = self
            .scan
            .get_messages_by_src_tx_hash(record.source_tx_hash)
            .await?;

        let mut updated = record.clone();
        updated.apply(&response.messages);

        trace!(
            tx_hash = %record.source_tx_hash,
            message_count = response.messages.len(),
            status = ?updated.status,
            event = "delivery_polled"
        );

        Ok(updated)
    }

    /// Polls until delivered, failed, or out of attempts.
    ///
    /// The first lookup happens immediately; later ones wait
    /// `poll_interval` in between. `on_update` sees the record after every
    /// lookup.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::DeliveryFailed`] when the message fails and the
    /// scan error when a lookup fails. Exhaustion is not an error.
    pub async fn watch<F>(&self, tx_hash: TxHash, mut on_update: F) -> Result<WatchOutcome>
    where
        F: FnMut(&DeliveryRecord) + Send,
    {
        let max_attempts = self.config.max_attempts;
        let span = spans::watch_delivery(tx_hash, max_attempts, self.config.poll_interval_secs);

        async move {
            info!(
                tx_hash = %tx_hash,
                max_attempts = max_attempts,
                poll_interval_secs = self.config.poll_interval_secs,
                event = "delivery_polling_started"
            );

            let mut record = DeliveryRecord::new(tx_hash);

            for attempt in 1..=max_attempts {
                let poll_span = spans::poll_delivery(tx_hash, attempt, max_attempts);
                record = match self.poll_once(&record).instrument(poll_span).await {
                    Ok(updated) => updated,
                    Err(e) => {
                        spans::record_error(&e);
                        error!(
                            tx_hash = %tx_hash,
                            attempt = attempt,
                            error = %e,
                            event = "delivery_poll_failed"
                        );
                        return Err(e);
                    }
                };
                on_update(&record);

                match PollDecision::for_record(&record) {
                    PollDecision::Delivered => {
                        info!(
                            tx_hash = %tx_hash,
                            destination_tx_hash = ?record.destination_tx_hash,
                            attempt = attempt,
                            event = "delivery_confirmed"
                        );
                        return Ok(WatchOutcome::Delivered(record));
                    }
                    PollDecision::Failed => {
                        let err = delivery_failure(&record);
                        spans::record_error(&err);
                        error!(tx_hash = %tx_hash, error = %err, event = "delivery_failed");
                        return Err(err);
                    }
                    PollDecision::Continue => {
                        debug!(
                            tx_hash = %tx_hash,
                            attempt = attempt,
                            max_attempts = max_attempts,
                            status = ?record.status,
                            event = "delivery_pending"
                        );
                        if attempt < max_attempts {
                            self.clock.sleep(self.config.poll_interval()).await;
                        }
                    }
                }
            }

            info!(
                tx_hash = %tx_hash,
                max_attempts = max_attempts,
                total_duration_secs = self.config.total_timeout_secs(),
                event = "delivery_polling_exhausted"
            );
            Ok(WatchOutcome::Exhausted(record))
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{MessageStatus, ScanMessage, ScanResponse};
    use crate::testing::{FakeClock, FakeScanProvider};
    use std::time::Duration;

    fn response(status: MessageStatus) -> ScanResponse {
        ScanResponse {
            messages: vec![ScanMessage {
                status,
                src_tx_hash: Some(TxHash::repeat_byte(1)),
                dst_tx_hash: (status == MessageStatus::Delivered)
                    .then(|| TxHash::repeat_byte(2)),
                src_chain_id: None,
                dst_chain_id: None,
                dst_tx_error: None,
            }],
        }
    }

    fn config() -> PollingConfig {
        PollingConfig::fast()
    }

    #[tokio::test]
    async fn test_watch_stops_after_delivery() {
        let scan = FakeScanProvider::with_responses(vec![
            Ok(ScanResponse::default()),
            Ok(response(MessageStatus::Inflight)),
            Ok(response(MessageStatus::Confirming)),
            Ok(response(MessageStatus::Delivered)),
        ]);
        let clock = FakeClock::new();
        let monitor = DeliveryMonitor::new(&scan, &clock, config());

        let mut seen = Vec::new();
        let outcome = monitor
            .watch(TxHash::repeat_byte(1), |r| seen.push(r.status))
            .await
            .unwrap();

        let WatchOutcome::Delivered(record) = outcome else {
            panic!("expected delivery, got {outcome:?}");
        };
        assert_eq!(record.destination_tx_hash, Some(TxHash::repeat_byte(2)));
        assert_eq!(scan.call_count(), 4);
        assert_eq!(clock.sleep_log(), vec![Duration::from_secs(5); 3]);
        assert_eq!(
            seen,
            vec![
                DeliveryStatus::InFlight,
                DeliveryStatus::InFlight,
                DeliveryStatus::Confirming,
                DeliveryStatus::Delivered
            ]
        );
    }

    #[tokio::test]
    async fn test_watch_exhausts_budget_without_error() {
        let scan = FakeScanProvider::repeating(Ok(response(MessageStatus::Inflight)));
        let clock = FakeClock::new();
        let monitor = DeliveryMonitor::new(&scan, &clock, config());

        let outcome = monitor.watch(TxHash::repeat_byte(1), |_| {}).await.unwrap();

        assert!(matches!(outcome, WatchOutcome::Exhausted(_)));
        assert_eq!(scan.call_count(), 30);
        assert_eq!(clock.sleep_log().len(), 29);
    }

    #[tokio::test]
    async fn test_watch_failed_message_is_error() {
        let scan = FakeScanProvider::with_responses(vec![Ok(response(MessageStatus::Failed))]);
        let clock = FakeClock::new();
        let monitor = DeliveryMonitor::new(&scan, &clock, config());

        let result = monitor.watch(TxHash::repeat_byte(1), |_| {}).await;

        assert!(matches!(result, Err(BridgeError::DeliveryFailed { .. })));
        assert_eq!(scan.call_count(), 1);
    }

    #[tokio::test]
    async fn test_watch_query_error_is_hard_failure() {
        let scan = FakeScanProvider::with_responses(vec![
            Ok(response(MessageStatus::Inflight)),
            Err(BridgeError::ScanQuery("scan API returned 500".to_string())),
        ]);
        let clock = FakeClock::new();
        let monitor = DeliveryMonitor::new(&scan, &clock, config());

        let result = monitor.watch(TxHash::repeat_byte(1), |_| {}).await;

        assert!(matches!(result, Err(BridgeError::ScanQuery(_))));
        assert_eq!(scan.call_count(), 2);
    }

    #[test]
    fn test_poll_decision() {
        let mut record = DeliveryRecord::new(TxHash::ZERO);
        assert_eq!(PollDecision::for_record(&record), PollDecision::Continue);
        record.status = DeliveryStatus::Delivered;
        assert_eq!(PollDecision::for_record(&record), PollDecision::Delivered);
        record.status = DeliveryStatus::Failed;
        assert_eq!(PollDecision::for_record(&record), PollDecision::Failed);
    }
}
