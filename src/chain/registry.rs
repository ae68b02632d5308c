// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;

use alloy_chains::NamedChain;
use alloy_primitives::{Address, TxHash};

use super::addresses::{
    BSC_TESTNET_ENDPOINT_ID, BSC_TESTNET_TREAT_OFT, POLYGON_AMOY_ENDPOINT_ID,
    POLYGON_AMOY_TREAT_OFT, SEPOLIA_ENDPOINT_ID, SEPOLIA_TREAT_OFT,
};
use crate::error::{BridgeError, Result};

/// Which contract interface the bridge address on a network speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractVariant {
    /// The bridge contract is the token itself (plain OFT).
    Oft,
    /// The bridge contract wraps an external ERC-20 (OFT adapter).
    Adapter,
}

/// One supported network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDescriptor {
    pub chain: NamedChain,
    pub name: &'static str,
    pub bridge_address: Address,
    /// Wrapped ERC-20 of an adapter. Equals `bridge_address` for a plain OFT.
    pub token_address: Address,
    pub native_symbol: &'static str,
    /// Transaction URL with a `{hash}` placeholder.
    pub explorer_tx_template: &'static str,
    /// LayerZero endpoint identifier.
    pub endpoint_id: u32,
    pub variant: ContractVariant,
}

impl NetworkDescriptor {
    pub fn chain_id(&self) -> u64 {
        self.chain as u64
    }

    /// The ERC-20 the user holds, approves and sends.
    pub fn token(&self) -> Address {
        match self.variant {
            ContractVariant::Oft => self.bridge_address,
            ContractVariant::Adapter => self.token_address,
        }
    }

    /// The address that must hold an allowance before `send` can pull tokens.
    pub fn spender(&self) -> Address {
        self.bridge_address
    }

    pub fn explorer_tx_url(&self, tx_hash: TxHash) -> String {
        self.explorer_tx_template
            .replace("{hash}", &tx_hash.to_string())
    }
}

/// Ordered, immutable table of supported networks.
///
/// Lookups are keyed by chain identifier or display name; descriptors are
/// never compared by identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    networks: Vec<NetworkDescriptor>,
}

impl Registry {
    /// Builds a registry from a custom table.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidConfig`] when fewer than two networks are
    /// given, when chain ids, endpoint ids or names repeat, or when a token
    /// address does not fit the network's contract variant.
    pub fn new(networks: Vec<NetworkDescriptor>) -> Result<Self> {
        if networks.len() < 2 {
            return Err(BridgeError::InvalidConfig(
                "at least two networks are required to bridge".to_string(),
            ));
        }

        let mut chain_ids = HashSet::new();
        let mut endpoint_ids = HashSet::new();
        let mut names = HashSet::new();
        for network in &networks {
            if !chain_ids.insert(network.chain_id()) {
                return Err(BridgeError::InvalidConfig(format!(
                    "duplicate chain id {}",
                    network.chain_id()
                )));
            }
            if !endpoint_ids.insert(network.endpoint_id) {
                return Err(BridgeError::InvalidConfig(format!(
                    "duplicate endpoint id {}",
                    network.endpoint_id
                )));
            }
            if !names.insert(network.name.to_ascii_lowercase()) {
                return Err(BridgeError::InvalidConfig(format!(
                    "duplicate network name {}",
                    network.name
                )));
            }
            let wraps_token = network.token_address != network.bridge_address;
            match network.variant {
                ContractVariant::Oft if wraps_token => {
                    return Err(BridgeError::InvalidConfig(format!(
                        "{}: a plain OFT is its own token",
                        network.name
                    )));
                }
                ContractVariant::Adapter if !wraps_token => {
                    return Err(BridgeError::InvalidConfig(format!(
                        "{}: an adapter must wrap a separate token",
                        network.name
                    )));
                }
                _ => {}
            }
        }

        Ok(Self { networks })
    }

    /// The three TREAT testnet deployments.
    pub fn testnet() -> Self {
        Self {
            networks: vec![
                NetworkDescriptor {
                    chain: NamedChain::Sepolia,
                    name: "Sepolia",
                    bridge_address: SEPOLIA_TREAT_OFT,
                    token_address: SEPOLIA_TREAT_OFT,
                    native_symbol: "ETH",
                    explorer_tx_template: "https://sepolia.etherscan.io/tx/{hash}",
                    endpoint_id: SEPOLIA_ENDPOINT_ID,
                    variant: ContractVariant::Oft,
                },
                NetworkDescriptor {
                    chain: NamedChain::BinanceSmartChainTestnet,
                    name: "BSC Testnet",
                    bridge_address: BSC_TESTNET_TREAT_OFT,
                    token_address: BSC_TESTNET_TREAT_OFT,
                    native_symbol: "tBNB",
                    explorer_tx_template: "https://testnet.bscscan.com/tx/{hash}",
                    endpoint_id: BSC_TESTNET_ENDPOINT_ID,
                    variant: ContractVariant::Oft,
                },
                NetworkDescriptor {
                    chain: NamedChain::PolygonAmoy,
                    name: "Polygon Amoy",
                    bridge_address: POLYGON_AMOY_TREAT_OFT,
                    token_address: POLYGON_AMOY_TREAT_OFT,
                    native_symbol: "POL",
                    explorer_tx_template: "https://amoy.polygonscan.com/tx/{hash}",
                    endpoint_id: POLYGON_AMOY_ENDPOINT_ID,
                    variant: ContractVariant::Oft,
                },
            ],
        }
    }

    pub fn lookup_by_chain_id(&self, chain_id: u64) -> Option<&NetworkDescriptor> {
        self.networks.iter().find(|n| n.chain_id() == chain_id)
    }

    /// Case-insensitive lookup by display name.
    pub fn lookup_by_name(&self, name: &str) -> Option<&NetworkDescriptor> {
        self.networks
            .iter()
            .find(|n| n.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn all(&self) -> &[NetworkDescriptor] {
        &self.networks
    }

    /// Initial source and destination: the first two registered networks.
    pub fn default_pair(&self) -> (&NetworkDescriptor, &NetworkDescriptor) {
        // At least two entries by construction.
        (&self.networks[0], &self.networks[1])
    }

    /// First registered network whose chain id differs from `chain_id`.
    pub fn first_other(&self, chain_id: u64) -> Option<&NetworkDescriptor> {
        self.networks.iter().find(|n| n.chain_id() != chain_id)
    }

    /// Like [`Registry::lookup_by_chain_id`], but as an error.
    pub fn require(&self, chain_id: u64) -> Result<&NetworkDescriptor> {
        self.lookup_by_chain_id(chain_id)
            .ok_or(BridgeError::UnsupportedChain { chain_id })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::testnet()
    }
}
