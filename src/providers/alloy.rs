// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Alloy-based wallet implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use tracing::{debug, info, instrument, trace};

use crate::contracts::erc20::Erc20Contract;
use crate::contracts::oft::Oft::{MessagingFee, SendParam};
use crate::contracts::oft::OftContract;
use crate::error::{BridgeError, Result};
use crate::receipt::SourceReceipt;
use crate::traits::WalletProvider;

/// Production wallet backed by one signing Alloy [`Provider`] per chain.
///
/// Each provider is expected to carry the account's signer (for example built
/// with `ProviderBuilder::new().wallet(signer).connect_http(url)`), so reads
/// and writes on a chain go through the same connection. The active chain is
/// bookkeeping: writes to any other chain are refused until
/// [`WalletProvider::switch_chain`] selects it.
///
/// # Examples
///
/// ```rust,no_run
/// use treat_bridge::providers::AlloyWallet;
/// use alloy_provider::ProviderBuilder;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sepolia = ProviderBuilder::new().connect("https://rpc.sepolia.org").await?;
/// let bsc = ProviderBuilder::new()
///     .connect("https://data-seed-prebsc-1-s1.binance.org:8545")
///     .await?;
///
/// let wallet = AlloyWallet::new(11155111)
///     .with_chain(11155111, sepolia)
///     .with_chain(97, bsc);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AlloyWallet<P>
where
    P: Provider + Clone,
{
    providers: HashMap<u64, P>,
    active_chain: AtomicU64,
}

impl<P> AlloyWallet<P>
where
    P: Provider + Clone,
{
    pub fn new(active_chain: u64) -> Self {
        Self {
            providers: HashMap::new(),
            active_chain: AtomicU64::new(active_chain),
        }
    }

    /// Registers the provider used for `chain_id`.
    pub fn with_chain(mut self, chain_id: u64, provider: P) -> Self {
        self.providers.insert(chain_id, provider);
        self
    }

    pub fn active_chain(&self) -> u64 {
        self.active_chain.load(Ordering::SeqCst)
    }

    fn provider(&self, chain_id: u64) -> Result<&P> {
        self.providers
            .get(&chain_id)
            .ok_or(BridgeError::UnsupportedChain { chain_id })
    }
}

#[async_trait]
impl<P> WalletProvider for AlloyWallet<P>
where
    P: Provider + Clone + Send + Sync,
{
    #[instrument(skip(self))]
    async fn switch_chain(&self, chain_id: u64) -> Result<()> {
        self.provider(chain_id)?;
        let previous = self.active_chain.swap(chain_id, Ordering::SeqCst);
        debug!(
            previous_chain = previous,
            active_chain = chain_id,
            event = "wallet_chain_switched"
        );
        Ok(())
    }

    #[instrument(skip(self), fields(account = %account))]
    async fn native_balance(&self, chain_id: u64, account: Address) -> Result<U256> {
        trace!("Fetching native balance");
        let balance = self
            .provider(chain_id)?
            .get_balance(account)
            .await
            .map_err(|e| BridgeError::Provider(e.to_string()))?;
        debug!(balance = %balance, "Native balance retrieved");
        Ok(balance)
    }

    #[instrument(skip(self), fields(token = %token, account = %account))]
    async fn token_balance(&self, chain_id: u64, token: Address, account: Address) -> Result<U256> {
        let provider = self.provider(chain_id)?.clone();
        Erc20Contract::new(token, provider)
            .balance_of(account)
            .await
            .map_err(|e| BridgeError::ContractCall(e.to_string()))
    }

    #[instrument(skip(self), fields(token = %token, owner = %owner, spender = %spender))]
    async fn allowance(
        &self,
        chain_id: u64,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256> {
        let provider = self.provider(chain_id)?.clone();
        Erc20Contract::new(token, provider)
            .allowance(owner, spender)
            .await
            .map_err(|e| BridgeError::ContractCall(e.to_string()))
    }

    #[instrument(skip(self, send_param), fields(bridge = %bridge, dst_eid = send_param.dstEid))]
    async fn quote_send(
        &self,
        chain_id: u64,
        bridge: Address,
        send_param: SendParam,
    ) -> Result<MessagingFee> {
        let provider = self.provider(chain_id)?.clone();
        OftContract::new(bridge, provider)
            .quote_send(send_param)
            .await
            .map_err(|e| BridgeError::ContractCall(e.to_string()))
    }

    #[instrument(skip(self, request))]
    async fn estimate_gas(&self, chain_id: u64, request: TransactionRequest) -> Result<u64> {
        let gas = self
            .provider(chain_id)?
            .estimate_gas(request)
            .await
            .map_err(|e| BridgeError::Provider(e.to_string()))?;
        debug!(gas = gas, "Gas estimated");
        Ok(gas)
    }

    #[instrument(skip(self))]
    async fn max_fee_per_gas(&self, chain_id: u64) -> Result<u128> {
        let fees = self
            .provider(chain_id)?
            .estimate_eip1559_fees()
            .await
            .map_err(|e| BridgeError::Provider(e.to_string()))?;
        Ok(fees.max_fee_per_gas)
    }

    #[instrument(skip(self, request), fields(to = ?request.to))]
    async fn send_transaction(&self, chain_id: u64, request: TransactionRequest) -> Result<TxHash> {
        let active = self.active_chain();
        if active != chain_id {
            return Err(BridgeError::Provider(format!(
                "wallet is on chain {active}, transaction targets chain {chain_id}"
            )));
        }

        let pending = self
            .provider(chain_id)?
            .send_transaction(request)
            .await
            .map_err(BridgeError::from_wallet_rpc)?;

        let tx_hash = *pending.tx_hash();
        info!(tx_hash = %tx_hash, event = "transaction_broadcast");
        Ok(tx_hash)
    }

    #[instrument(skip(self), fields(tx_hash = %tx_hash))]
    async fn get_transaction_receipt(
        &self,
        chain_id: u64,
        tx_hash: TxHash,
    ) -> Result<Option<SourceReceipt>> {
        trace!("Fetching transaction receipt");
        let receipt = self
            .provider(chain_id)?
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| BridgeError::Provider(e.to_string()))?;

        match &receipt {
            Some(r) => debug!(block_number = ?r.block_number, "Transaction receipt found"),
            None => debug!("Transaction receipt not found"),
        }

        Ok(receipt.as_ref().map(SourceReceipt::from))
    }
}
