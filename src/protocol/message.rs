// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::TxHash;
use serde::{Deserialize, Deserializer};

/// Response of the scan service's message lookup by source transaction hash
///
/// A single source transaction may emit several messages; the list is empty
/// until the indexer has seen the transaction.
///
/// # Example Response
///
/// ```json
/// {
///   "messages": [
///     {
///       "srcChainId": 10161,
///       "dstChainId": 10102,
///       "status": "DELIVERED",
///       "srcTxHash": "0x...",
///       "dstTxHash": "0x..."
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanResponse {
    #[serde(default)]
    pub messages: Vec<ScanMessage>,
}

/// One cross-chain message as reported by the scan service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanMessage {
    pub status: MessageStatus,

    #[serde(default, deserialize_with = "deserialize_optional_hash")]
    pub src_tx_hash: Option<TxHash>,

    /// Empty until the destination transaction exists.
    #[serde(default, deserialize_with = "deserialize_optional_hash")]
    pub dst_tx_hash: Option<TxHash>,

    #[serde(default)]
    pub src_chain_id: Option<u32>,

    #[serde(default)]
    pub dst_chain_id: Option<u32>,

    #[serde(default)]
    pub dst_tx_error: Option<String>,
}

/// Status values the scan service reports for a message.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageStatus {
    Inflight,
    Confirming,
    Delivered,
    Failed,
    PayloadStored,
    Blocked,
    #[serde(other)]
    Unknown,
}

/// Handles the scan service returning `""` or `null` for hashes that do not exist yet
///
/// - Valid 32-byte hex string (with or without "0x") → `Some(TxHash)`
/// - null, missing or empty string → `None`
/// - Anything else → error
fn deserialize_optional_hash<'de, D>(deserializer: D) -> Result<Option<TxHash>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;

    match opt {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse::<TxHash>().map(Some).map_err(serde::de::Error::custom),
    }
}
