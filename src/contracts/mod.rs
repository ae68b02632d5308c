// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Contract bindings for the TREAT bridge
//!
//! This module contains Alloy-generated bindings and thin wrappers for the two
//! contract shapes the bridge talks to:
//!
//! - [`Erc20Contract`](erc20::Erc20Contract): `allowance` / `approve` / `balanceOf`
//! - [`OftContract`](oft::OftContract): LayerZero OFT and OFT adapter (`quoteSend`, `send`)
//!
//! Every write is also exposed as a provider-free `TransactionRequest` builder so
//! the coordinator can hand requests to any wallet implementation.

pub mod erc20;
pub mod oft;
