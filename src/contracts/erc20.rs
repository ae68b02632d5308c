// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! ERC20 contract bindings for approval and allowance operations
//!
//! Bridging pulls TREAT through the bridge contract, so the owner must first
//! grant that contract an allowance at least as large as the amount sent.

use alloy_network::{Ethereum, TransactionBuilder};
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use tracing::{debug, info};

use Erc20::Erc20Instance;

/// ERC20 contract wrapper for balance and allowance reads
pub struct Erc20Contract<P: Provider<Ethereum>> {
    instance: Erc20Instance<P>,
}

impl<P: Provider<Ethereum>> Erc20Contract<P> {
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "erc20_contract_initialized"
        );
        Self {
            instance: Erc20Instance::new(address, provider),
        }
    }

    /// Amount of tokens `spender` may pull from `owner`.
    pub async fn allowance(
        &self,
        owner: Address,
        spender: Address,
    ) -> Result<U256, alloy_contract::Error> {
        let result = self.instance.allowance(owner, spender).call().await?;

        debug!(
            owner = %owner,
            spender = %spender,
            allowance = %result,
            contract_address = %self.instance.address(),
            event = "allowance_retrieved"
        );

        Ok(result)
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256, alloy_contract::Error> {
        let result = self.instance.balanceOf(account).call().await?;

        debug!(
            account = %account,
            balance = %result,
            contract_address = %self.instance.address(),
            event = "balance_retrieved"
        );

        Ok(result)
    }

    pub fn address(&self) -> Address {
        *self.instance.address()
    }
}

/// Builds an unsigned `approve(spender, amount)` request against `token`.
///
/// No gas limit is set; callers attach one when an estimate is available and
/// otherwise leave estimation to the wallet.
pub fn approve_request(
    token: Address,
    from: Address,
    spender: Address,
    amount: U256,
) -> TransactionRequest {
    info!(
        from = %from,
        spender = %spender,
        amount = %amount,
        contract_address = %token,
        event = "approve_transaction_created"
    );

    TransactionRequest::default()
        .with_from(from)
        .with_to(token)
        .with_input(Erc20::approveCall { spender, amount }.abi_encode())
}

/// Whether `request` carries an `approve` call.
pub fn is_approve_request(request: &TransactionRequest) -> bool {
    request
        .input
        .input()
        .is_some_and(|data| data.starts_with(&Erc20::approveCall::SELECTOR))
}

// Minimal ERC20 interface for approval operations
sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract Erc20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }
);
