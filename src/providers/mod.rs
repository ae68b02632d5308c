// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Production implementations of the bridge trait abstractions.
//!
//! This module provides the "real" implementations of the traits defined in
//! [`crate::traits`]: chain access through Alloy providers, the LayerZero scan
//! HTTP API, and the system clock.

mod alloy;
mod layerzero_scan;
mod tokio_clock;

pub use self::alloy::AlloyWallet;
pub use self::layerzero_scan::LayerZeroScanProvider;
pub use self::tokio_clock::TokioClock;
