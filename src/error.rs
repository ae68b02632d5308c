// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_json_rpc::RpcError;
use alloy_primitives::U256;
use alloy_transport::TransportErrorKind;
use thiserror::Error;

/// EIP-1193 error code a wallet returns when the user declines a prompt.
pub const USER_REJECTED_CODE: i64 = 4001;

/// Message shown for submission failures whose provider text is not user-safe.
pub const GENERIC_FAILURE_MESSAGE: &str = "Transaction failed. Please try again.";

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Chain not supported: {chain_id}")]
    UnsupportedChain { chain_id: u64 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Contract call failed: {0}")]
    ContractCall(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid recipient address: {0}")]
    InvalidAddress(String),

    #[error("Source and destination network must differ")]
    SameNetwork,

    #[error("Wallet not connected")]
    NotConnected,

    #[error("Insufficient allowance: approve the bridge to spend {required} first")]
    InsufficientAllowance { required: U256 },

    #[error("Fee quote not available")]
    MissingQuote,

    #[error("Insufficient funds for gas: need {required} wei, have {available} wei")]
    GasShortfall { required: U256, available: U256 },

    #[error("User rejected the request")]
    UserRejected,

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Cross-chain delivery failed: {reason}")]
    DeliveryFailed { reason: String },

    #[error("Message scan query failed: {0}")]
    ScanQuery(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError<TransportErrorKind>),

    #[error("ABI encoding/decoding error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Hex conversion error: {0}")]
    Hex(#[from] alloy_primitives::hex::FromHexError),
}

impl BridgeError {
    /// Whether the wallet reported that the user declined the prompt.
    ///
    /// Rejections are silent cancels: the coordinator returns to idle without
    /// an error banner.
    pub fn is_user_rejection(&self) -> bool {
        match self {
            Self::UserRejected => true,
            Self::Rpc(RpcError::ErrorResp(payload)) => {
                payload.code == USER_REJECTED_CODE || classify_wallet_error(&payload.message)
            }
            Self::Provider(msg) | Self::ContractCall(msg) => classify_wallet_error(msg),
            _ => false,
        }
    }

    /// Text safe to render in the presentation layer.
    ///
    /// Validation and gas advisories keep their own wording; anything that came
    /// out of a provider collapses to [`GENERIC_FAILURE_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidAmount(_)
            | Self::InvalidAddress(_)
            | Self::SameNetwork
            | Self::NotConnected
            | Self::InsufficientAllowance { .. }
            | Self::MissingQuote
            | Self::GasShortfall { .. }
            | Self::UnsupportedChain { .. }
            | Self::DeliveryFailed { .. } => self.to_string(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Maps a raw RPC failure from a wallet write into the crate taxonomy.
    pub fn from_wallet_rpc(err: RpcError<TransportErrorKind>) -> Self {
        let rejected = match &err {
            RpcError::ErrorResp(payload) => {
                payload.code == USER_REJECTED_CODE || classify_wallet_error(&payload.message)
            }
            other => classify_wallet_error(&other.to_string()),
        };
        if rejected {
            Self::UserRejected
        } else {
            Self::Rpc(err)
        }
    }
}

/// Recognises the phrasing wallets use when the user declines a request.
pub fn classify_wallet_error(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("user rejected")
        || lower.contains("user denied")
        || lower.contains("rejected the request")
        || lower.contains("request rejected")
        || lower.contains("code 4001")
}

pub type Result<T> = std::result::Result<T, BridgeError>;
