// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Contract addresses and LayerZero endpoint identifiers for TREAT deployments
//!
//! Endpoint identifiers are LayerZero V2 testnet EIDs:
//! <https://docs.layerzero.network/v2/deployments/deployed-contracts>

use alloy_primitives::{address, Address};

/// <https://sepolia.etherscan.io/address/0x845f1be42fdbf9f285bf1278256b6627543f51dd>
pub const SEPOLIA_TREAT_OFT: Address = address!("845f1be42fdbf9f285bf1278256b6627543f51dd");

/// <https://testnet.bscscan.com/address/0xdE637209AC5E70fA2F2B6C86684E860fd474A33E>
pub const BSC_TESTNET_TREAT_OFT: Address = address!("dE637209AC5E70fA2F2B6C86684E860fd474A33E");

/// <https://amoy.polygonscan.com/address/0x845f1be42fdbf9f285bf1278256b6627543f51dd>
pub const POLYGON_AMOY_TREAT_OFT: Address = address!("845f1be42fdbf9f285bf1278256b6627543f51dd");

pub const SEPOLIA_ENDPOINT_ID: u32 = 40161;

pub const BSC_TESTNET_ENDPOINT_ID: u32 = 40102;

pub const POLYGON_AMOY_ENDPOINT_ID: u32 = 40267;
