// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Tokio-based clock implementation.

use async_trait::async_trait;
use std::time::{Duration, Instant};

use crate::traits::Clock;

/// Wall clock for production use.
///
/// Receipt polling, gas-estimate retries and delivery polling all wait through
/// this clock, so a real [`Coordinator`](crate::Coordinator) spends its
/// polling budget in real time. Tests use
/// [`FakeClock`](crate::testing::FakeClock) instead.
///
/// # Examples
///
/// ```rust
/// use treat_bridge::providers::TokioClock;
///
/// let clock = TokioClock::new();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl TokioClock {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn now(&self) -> Instant {
        Instant::now()
    }
}
