// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! LayerZero scan API message provider implementation.

use alloy_primitives::TxHash;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, trace};

use crate::config::{BridgeConfig, LAYERZERO_SCAN_API_TESTNET, MESSAGES_BY_TX_PATH};
use crate::error::{BridgeError, Result};
use crate::protocol::ScanResponse;
use crate::traits::MessageScanProvider;

/// Production message provider using the LayerZero scan API.
///
/// # Examples
///
/// ```rust,no_run
/// use treat_bridge::providers::LayerZeroScanProvider;
/// use treat_bridge::traits::MessageScanProvider;
/// use alloy_primitives::TxHash;
///
/// # async fn example() -> Result<(), treat_bridge::BridgeError> {
/// let provider = LayerZeroScanProvider::testnet();
/// let response = provider.get_messages_by_src_tx_hash(TxHash::ZERO).await?;
/// println!("{} messages", response.messages.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LayerZeroScanProvider {
    base_url: String,
    client: Client,
}

impl LayerZeroScanProvider {
    /// Creates a new scan provider.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the scan API, without trailing slash
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn testnet() -> Self {
        Self::new(LAYERZERO_SCAN_API_TESTNET)
    }

    /// Uses the configured `scan_api_url`, which `TREAT_SCAN_API_URL`
    /// overrides in [`BridgeConfig::from_env`].
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(config.scan_api_url.as_str())
    }

    fn messages_url(&self, tx_hash: TxHash) -> String {
        format!("{}{MESSAGES_BY_TX_PATH}{tx_hash}", self.base_url)
    }
}

#[async_trait]
impl MessageScanProvider for LayerZeroScanProvider {
    #[instrument(skip(self), fields(tx_hash = %tx_hash))]
    async fn get_messages_by_src_tx_hash(&self, tx_hash: TxHash) -> Result<ScanResponse> {
        let url = self.messages_url(tx_hash);
        trace!(url = %url, "Requesting messages from scan API");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(BridgeError::Network)?;

        let status_code = response.status();
        trace!(status_code = %status_code, "Received response from scan API");

        // The indexer answers 404 until it has seen the source transaction.
        if status_code == reqwest::StatusCode::NOT_FOUND {
            debug!("Source transaction not indexed yet");
            return Ok(ScanResponse::default());
        }

        if !status_code.is_success() {
            return Err(BridgeError::ScanQuery(format!(
                "scan API returned {status_code}"
            )));
        }

        let body = response.text().await.map_err(BridgeError::Network)?;
        if body.trim().is_empty() {
            return Ok(ScanResponse::default());
        }

        let parsed: ScanResponse = serde_json::from_str(&body)?;
        debug!(message_count = parsed.messages.len(), "Scan response parsed");

        Ok(parsed)
    }
}
