// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Gas estimation and native-balance sufficiency checks.
//!
//! Every simulated estimate gets the configured safety buffer (50% by
//! default). Approval estimation is advisory and may come back empty; bridge
//! estimation retries and then falls back to a fixed limit.

use alloy_primitives::{Address, U256};
use alloy_rpc_types::TransactionRequest;
use tracing::{debug, warn, Instrument};

use crate::chain::NetworkDescriptor;
use crate::config::GasConfig;
use crate::contracts::erc20::approve_request;
use crate::error::{BridgeError, Result};
use crate::spans;
use crate::traits::{Clock, WalletProvider};

/// Advisory shown when an approval cannot be simulated.
pub const APPROVAL_ESTIMATE_ADVISORY: &str = "Insufficient funds or gas estimation failed";

/// Outcome of bridge gas estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeGas {
    /// Buffered estimate, or the fixed fallback limit.
    pub gas_limit: u64,
    pub is_fallback: bool,
}

/// Estimates gas for approval and send calls.
#[derive(Debug)]
pub struct GasEstimator<'a, W: ?Sized, C: ?Sized> {
    wallet: &'a W,
    clock: &'a C,
    config: &'a GasConfig,
}

impl<'a, W, C> GasEstimator<'a, W, C>
where
    W: WalletProvider + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(wallet: &'a W, clock: &'a C, config: &'a GasConfig) -> Self {
        Self {
            wallet,
            clock,
            config,
        }
    }

    /// Simulates `approve(spender, amount)` and returns a buffered limit.
    ///
    /// Returns `None` when simulation fails; the wallet then estimates at
    /// submission time.
    pub async fn estimate_approval_gas(
        &self,
        owner: Address,
        network: &NetworkDescriptor,
        amount: U256,
    ) -> Option<u64> {
        let span = spans::estimate_gas(network.chain_id(), "approve");
        async {
            let request = approve_request(network.token(), owner, network.spender(), amount);
            match self.wallet.estimate_gas(network.chain_id(), request).await {
                Ok(raw) => {
                    let gas_limit = self.config.apply_buffer(raw);
                    debug!(
                        raw_gas = raw,
                        gas_limit = gas_limit,
                        event = "approval_gas_estimated"
                    );
                    Some(gas_limit)
                }
                Err(e) => {
                    warn!(error = %e, event = "approval_gas_estimation_failed");
                    None
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Simulates the bridge `send` request (fee attached as value).
    ///
    /// Makes `1 + max_retries` attempts, sleeping `retry_delay` between them,
    /// then falls back to the configured fixed limit.
    pub async fn estimate_bridge_gas(
        &self,
        chain_id: u64,
        request: &TransactionRequest,
    ) -> BridgeGas {
        let span = spans::estimate_gas(chain_id, "send");
        async {
            let attempts = self.config.max_retries + 1;
            for attempt in 1..=attempts {
                match self.wallet.estimate_gas(chain_id, request.clone()).await {
                    Ok(raw) => {
                        let gas_limit = self.config.apply_buffer(raw);
                        tracing::Span::current().record("attempts", attempt);
                        debug!(
                            raw_gas = raw,
                            gas_limit = gas_limit,
                            attempt = attempt,
                            event = "bridge_gas_estimated"
                        );
                        return BridgeGas {
                            gas_limit,
                            is_fallback: false,
                        };
                    }
                    Err(e) => {
                        warn!(
                            error = %e,
                            attempt = attempt,
                            max_attempts = attempts,
                            event = "bridge_gas_estimation_failed"
                        );
                        if attempt < attempts {
                            self.clock.sleep(self.config.retry_delay).await;
                        }
                    }
                }
            }

            tracing::Span::current().record("attempts", attempts);
            warn!(
                fallback_gas_limit = self.config.fallback_gas_limit,
                event = "bridge_gas_using_fallback"
            );
            BridgeGas {
                gas_limit: self.config.fallback_gas_limit,
                is_fallback: true,
            }
        }
        .instrument(span)
        .await
    }

    /// Verifies `account` can pay `gas_limit × maxFeePerGas + native_fee`.
    ///
    /// When the balance or the fee market cannot be read the check passes and
    /// the wallet has the final say.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::GasShortfall`] when the balance is short.
    pub async fn check_sufficiency(
        &self,
        chain_id: u64,
        account: Address,
        gas_limit: u64,
        native_fee: U256,
    ) -> Result<()> {
        let max_fee_per_gas = match self.wallet.max_fee_per_gas(chain_id).await {
            Ok(fee) => fee,
            Err(e) => {
                warn!(error = %e, event = "max_fee_per_gas_unavailable");
                return Ok(());
            }
        };
        let balance = match self.wallet.native_balance(chain_id, account).await {
            Ok(balance) => balance,
            Err(e) => {
                warn!(error = %e, event = "native_balance_unavailable");
                return Ok(());
            }
        };

        let required = required_native(gas_limit, max_fee_per_gas, native_fee);
        ensure_sufficient(required, balance)
    }
}

/// `gas_limit × max_fee_per_gas + native_fee`
pub fn required_native(gas_limit: u64, max_fee_per_gas: u128, native_fee: U256) -> U256 {
    U256::from(gas_limit)
        .saturating_mul(U256::from(max_fee_per_gas))
        .saturating_add(native_fee)
}

/// Fails with [`BridgeError::GasShortfall`] when `available < required`.
pub fn ensure_sufficient(required: U256, available: U256) -> Result<()> {
    if available < required {
        debug!(
            required = %required,
            available = %available,
            event = "gas_shortfall_detected"
        );
        return Err(BridgeError::GasShortfall {
            required,
            available,
        });
    }
    Ok(())
}
