// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Token balance and allowance reads
//!
//! Reads never fail from the caller's point of view: a failed call is logged
//! and reported as `None`, which the view renders as a placeholder.

use alloy_primitives::{Address, U256};
use tracing::{debug, warn};

use crate::chain::NetworkDescriptor;
use crate::traits::WalletProvider;

/// Token balances for both sides of a transfer plus the native balance on the
/// source network. `None` means the read is unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Balances {
    pub source: Option<U256>,
    pub destination: Option<U256>,
    pub native: Option<U256>,
}

/// Reads balances and allowances through a [`WalletProvider`].
#[derive(Debug)]
pub struct BalanceReader<'a, W: ?Sized> {
    wallet: &'a W,
}

impl<'a, W> BalanceReader<'a, W>
where
    W: WalletProvider + ?Sized,
{
    pub fn new(wallet: &'a W) -> Self {
        Self { wallet }
    }

    /// Token balance of `account` on `network`.
    pub async fn get_balance(&self, account: Address, network: &NetworkDescriptor) -> Option<U256> {
        match self
            .wallet
            .token_balance(network.chain_id(), network.token(), account)
            .await
        {
            Ok(balance) => Some(balance),
            Err(e) => {
                warn!(
                    chain_id = network.chain_id(),
                    account = %account,
                    error = %e,
                    event = "token_balance_unavailable"
                );
                None
            }
        }
    }

    pub async fn get_native_balance(
        &self,
        account: Address,
        network: &NetworkDescriptor,
    ) -> Option<U256> {
        match self.wallet.native_balance(network.chain_id(), account).await {
            Ok(balance) => Some(balance),
            Err(e) => {
                warn!(
                    chain_id = network.chain_id(),
                    account = %account,
                    error = %e,
                    event = "native_balance_unavailable"
                );
                None
            }
        }
    }

    /// Allowance `owner` granted to the network's bridge spender.
    pub async fn get_allowance(&self, owner: Address, network: &NetworkDescriptor) -> Option<U256> {
        match self
            .wallet
            .allowance(
                network.chain_id(),
                network.token(),
                owner,
                network.spender(),
            )
            .await
        {
            Ok(allowance) => Some(allowance),
            Err(e) => {
                warn!(
                    chain_id = network.chain_id(),
                    owner = %owner,
                    error = %e,
                    event = "allowance_unavailable"
                );
                None
            }
        }
    }

    /// Refreshes both token balances and the source native balance.
    pub async fn refresh(
        &self,
        account: Address,
        source: &NetworkDescriptor,
        destination: &NetworkDescriptor,
    ) -> Balances {
        let balances = Balances {
            source: self.get_balance(account, source).await,
            destination: self.get_balance(account, destination).await,
            native: self.get_native_balance(account, source).await,
        };

        debug!(
            account = %account,
            source_chain = source.chain_id(),
            destination_chain = destination.chain_id(),
            source_balance = ?balances.source,
            destination_balance = ?balances.destination,
            event = "balances_refreshed"
        );

        balances
    }
}
