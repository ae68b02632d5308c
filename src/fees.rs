// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Cross-chain fee quoting with a fixed fallback
//!
//! A quote never fails. When `quoteSend` errors or reports a zero native fee,
//! the configured fallback fee is returned instead and flagged as such.

use alloy_primitives::{Address, U256};
use tracing::{debug, warn, Instrument};

use crate::chain::NetworkDescriptor;
use crate::contracts::oft::build_send_param;
use crate::contracts::oft::Oft::MessagingFee;
use crate::spans;
use crate::traits::WalletProvider;

/// Fee required to relay one transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    pub native_fee: U256,
    pub lz_token_fee: U256,
    /// `true` when the value is the fixed estimate, not an on-chain quote.
    pub is_fallback: bool,
}

impl FeeQuote {
    pub fn fallback(native_fee: U256) -> Self {
        Self {
            native_fee,
            lz_token_fee: U256::ZERO,
            is_fallback: true,
        }
    }

    /// The fee struct passed to `send`.
    pub fn messaging_fee(&self) -> MessagingFee {
        MessagingFee {
            nativeFee: self.native_fee,
            lzTokenFee: self.lz_token_fee,
        }
    }
}

impl From<MessagingFee> for FeeQuote {
    fn from(fee: MessagingFee) -> Self {
        Self {
            native_fee: fee.nativeFee,
            lz_token_fee: fee.lzTokenFee,
            is_fallback: false,
        }
    }
}

/// Quotes transfer fees against the source network's bridge contract.
#[derive(Debug)]
pub struct FeeQuoter<'a, W: ?Sized> {
    wallet: &'a W,
    fallback_native_fee: U256,
}

impl<'a, W> FeeQuoter<'a, W>
where
    W: WalletProvider + ?Sized,
{
    pub fn new(wallet: &'a W, fallback_native_fee: U256) -> Self {
        Self {
            wallet,
            fallback_native_fee,
        }
    }

    /// Quotes sending `amount` from `source` to `recipient` on `destination`.
    pub async fn quote(
        &self,
        source: &NetworkDescriptor,
        destination: &NetworkDescriptor,
        amount: U256,
        recipient: Address,
    ) -> FeeQuote {
        let span = spans::quote_fee(
            source.chain_id(),
            &source.bridge_address,
            destination.endpoint_id,
            &amount,
        );

        async {
            let send_param = build_send_param(destination.endpoint_id, recipient, amount);
            let result = self
                .wallet
                .quote_send(source.chain_id(), source.bridge_address, send_param)
                .await;

            match result {
                Ok(fee) if !fee.nativeFee.is_zero() => {
                    tracing::Span::current().record("fallback", false);
                    debug!(
                        native_fee = %fee.nativeFee,
                        lz_token_fee = %fee.lzTokenFee,
                        event = "fee_quoted"
                    );
                    FeeQuote::from(fee)
                }
                Ok(_) => {
                    tracing::Span::current().record("fallback", true);
                    warn!(
                        fallback_native_fee = %self.fallback_native_fee,
                        event = "fee_quote_zero_using_fallback"
                    );
                    FeeQuote::fallback(self.fallback_native_fee)
                }
                Err(e) => {
                    tracing::Span::current().record("fallback", true);
                    warn!(
                        error = %e,
                        fallback_native_fee = %self.fallback_native_fee,
                        event = "fee_quote_failed_using_fallback"
                    );
                    FeeQuote::fallback(self.fallback_native_fee)
                }
            }
        }
        .instrument(span)
        .await
    }
}
