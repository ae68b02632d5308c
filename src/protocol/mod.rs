// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Cross-chain message types
//!
//! Wire types returned by the LayerZero scan service and the delivery record the
//! coordinator derives from them.

mod delivery;
mod message;

pub use delivery::{DeliveryRecord, DeliveryStatus};
pub use message::{MessageStatus, ScanMessage, ScanResponse};
