// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Transaction lifecycle coordinator
//!
//! The coordinator is split into a pure part and an async part:
//!
//! - [`BridgeState`] is the single state container: the transfer intent, the
//!   lifecycle and approval sub-machines, quotes, balances and the scoped
//!   delivery watch.
//! - [`reduce`] applies one [`Event`] to the state and returns the
//!   [`Effect`]s to run. It performs no I/O and is tested without a chain.
//! - [`Coordinator`] runs those effects against a wallet, a scan service and
//!   a clock, feeding every completion back through the reducer.
//!
//! Delivery polling is an effect keyed by the source transaction hash. Starting
//! a new context drops the key and any poll still queued for the old hash is
//! discarded.

mod driver;
mod event;
mod reducer;
mod state;

pub use driver::Coordinator;
pub use event::{Effect, Event};
pub use reducer::reduce;
pub use state::{ApprovalState, BridgeState, LifecycleState, TransferIntent};
