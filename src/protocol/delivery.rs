// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::TxHash;

use super::message::{MessageStatus, ScanMessage};

/// Where a cross-chain message stands from the coordinator's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    InFlight,
    Confirming,
    Delivered,
    Failed,
}

impl DeliveryStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Failed)
    }
}

impl From<MessageStatus> for DeliveryStatus {
    fn from(status: MessageStatus) -> Self {
        match status {
            MessageStatus::Delivered => Self::Delivered,
            MessageStatus::Confirming => Self::Confirming,
            // Stored payloads and blocked pathways need manual intervention.
            MessageStatus::Failed | MessageStatus::PayloadStored | MessageStatus::Blocked => {
                Self::Failed
            }
            MessageStatus::Inflight | MessageStatus::Unknown => Self::InFlight,
        }
    }
}

/// The message associated with one submitted source transaction.
///
/// Only ever created from an existing source hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRecord {
    pub source_tx_hash: TxHash,
    pub status: DeliveryStatus,
    pub destination_tx_hash: Option<TxHash>,
    /// Destination-side error text reported for a failed message.
    pub error: Option<String>,
}

impl DeliveryRecord {
    pub fn new(source_tx_hash: TxHash) -> Self {
        Self {
            source_tx_hash,
            status: DeliveryStatus::InFlight,
            destination_tx_hash: None,
            error: None,
        }
    }

    /// Folds the scan service's messages for this hash into the record.
    ///
    /// When several messages exist the least advanced one decides, so a record
    /// is only delivered once every message is. Terminal records never change.
    pub fn apply(&mut self, messages: &[ScanMessage]) {
        if self.status.is_terminal() || messages.is_empty() {
            return;
        }

        let statuses: Vec<DeliveryStatus> =
            messages.iter().map(|m| DeliveryStatus::from(m.status)).collect();

        self.status = if statuses.contains(&DeliveryStatus::Failed) {
            DeliveryStatus::Failed
        } else if statuses.contains(&DeliveryStatus::InFlight) {
            DeliveryStatus::InFlight
        } else if statuses.contains(&DeliveryStatus::Confirming) {
            DeliveryStatus::Confirming
        } else {
            DeliveryStatus::Delivered
        };

        if let Some(dst) = messages.iter().find_map(|m| m.dst_tx_hash) {
            self.destination_tx_hash = Some(dst);
        }
        if self.status == DeliveryStatus::Failed {
            self.error = messages.iter().find_map(|m| m.dst_tx_error.clone());
        }
    }
}
