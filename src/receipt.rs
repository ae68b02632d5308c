// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Network-agnostic view of a mined source transaction.

use alloy_primitives::{Log, TxHash};
use alloy_rpc_types::TransactionReceipt;

use crate::contracts::oft::{decode_sent_events, SentEvent};

/// The parts of a receipt the coordinator needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    /// `false` when the transaction reverted.
    pub success: bool,
    pub logs: Vec<Log>,
}

impl SourceReceipt {
    /// A successful receipt with no logs.
    pub fn success(tx_hash: TxHash, block_number: u64) -> Self {
        Self {
            tx_hash,
            block_number: Some(block_number),
            success: true,
            logs: Vec::new(),
        }
    }

    /// A reverted receipt.
    pub fn reverted(tx_hash: TxHash, block_number: u64) -> Self {
        Self {
            success: false,
            ..Self::success(tx_hash, block_number)
        }
    }

    pub fn with_logs(mut self, logs: Vec<Log>) -> Self {
        self.logs = logs;
        self
    }

    /// `OFTSent` events emitted by this transaction.
    pub fn sent_events(&self) -> Vec<SentEvent> {
        decode_sent_events(&self.logs)
    }
}

impl From<&TransactionReceipt> for SourceReceipt {
    fn from(receipt: &TransactionReceipt) -> Self {
        // Every envelope variant carries the same log shape.
        let logs = receipt
            .inner
            .logs()
            .iter()
            .map(|log| log.inner.clone())
            .collect();

        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            success: receipt.status(),
            logs,
        }
    }
}
