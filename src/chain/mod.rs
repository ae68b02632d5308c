// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Supported networks and per-network bridge metadata
//!
//! This module contains the static chain table the bridge operates on: chain
//! identifiers, LayerZero endpoint identifiers, bridge and token contract
//! addresses, and explorer URL templates.

mod addresses;
mod registry;

pub use addresses::{
    BSC_TESTNET_ENDPOINT_ID, BSC_TESTNET_TREAT_OFT, POLYGON_AMOY_ENDPOINT_ID,
    POLYGON_AMOY_TREAT_OFT, SEPOLIA_ENDPOINT_ID, SEPOLIA_TREAT_OFT,
};
pub use registry::{ContractVariant, NetworkDescriptor, Registry};
