// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Runtime configuration for fee, gas and delivery-polling behaviour

use std::time::Duration;

use alloy_primitives::U256;

use crate::error::{BridgeError, Result};

/// LayerZero scan API (testnet)
///
/// See <https://layerzeroscan.com>
pub const LAYERZERO_SCAN_API_TESTNET: &str = "https://api-testnet.layerzero-scan.com";

/// Message lookup path, followed by the source transaction hash
pub const MESSAGES_BY_TX_PATH: &str = "/tx/";

/// Human-facing scan page for a source transaction
pub const LAYERZERO_SCAN_TX_PAGE_TESTNET: &str = "https://testnet.layerzeroscan.com/tx/";

/// Bounds for the delivery-poll attempt budget.
pub const MIN_POLL_ATTEMPTS: u32 = 30;
pub const MAX_POLL_ATTEMPTS: u32 = 60;

/// Receipt lookups for a submitted source transaction before giving up.
pub const RECEIPT_POLL_ATTEMPTS: u32 = 150;

/// Seconds between receipt lookups.
pub const RECEIPT_POLL_INTERVAL_SECS: u64 = 2;

/// Default safety margin applied over simulated gas (50%)
pub const DEFAULT_GAS_BUFFER_PERCENT: u64 = 50;

/// Additional bridge gas estimation attempts after the first failure
pub const DEFAULT_GAS_RETRIES: u32 = 2;

/// Delay between bridge gas estimation attempts
pub const DEFAULT_GAS_RETRY_DELAY_MS: u64 = 1_000;

/// Gas limit used when every bridge estimate failed
pub const FALLBACK_BRIDGE_GAS_LIMIT: u64 = 500_000;

/// Native fee used when `quoteSend` fails: 60,000 gwei
pub const FALLBACK_NATIVE_FEE_WEI: u64 = 60_000_000_000_000;

/// Configuration for delivery polling.
///
/// # Examples
///
/// ```rust
/// use treat_bridge::PollingConfig;
///
/// let config = PollingConfig::default().with_max_attempts(40);
/// assert_eq!(config.max_attempts, 40);
/// assert_eq!(config.total_timeout_secs(), 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Maximum number of status lookups before giving up.
    pub max_attempts: u32,
    /// Seconds to wait between lookups.
    pub poll_interval_secs: u64,
}

impl Default for PollingConfig {
    /// 60 attempts, 5 seconds apart: five minutes of polling.
    fn default() -> Self {
        Self {
            max_attempts: MAX_POLL_ATTEMPTS,
            poll_interval_secs: 5,
        }
    }
}

impl PollingConfig {
    /// Budget used while waiting for a source transaction to be mined.
    pub fn receipt() -> Self {
        Self {
            max_attempts: RECEIPT_POLL_ATTEMPTS,
            poll_interval_secs: RECEIPT_POLL_INTERVAL_SECS,
        }
    }

    /// 30 attempts, 5 seconds apart.
    pub fn fast() -> Self {
        Self {
            max_attempts: MIN_POLL_ATTEMPTS,
            poll_interval_secs: 5,
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn total_timeout_secs(&self) -> u64 {
        self.max_attempts as u64 * self.poll_interval_secs
    }
}

/// Gas estimation and fee fallback settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasConfig {
    /// Percentage added on top of simulated gas.
    pub buffer_percent: u64,
    /// Extra bridge estimation attempts after the first.
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub fallback_gas_limit: u64,
    pub fallback_native_fee: U256,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            buffer_percent: DEFAULT_GAS_BUFFER_PERCENT,
            max_retries: DEFAULT_GAS_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_GAS_RETRY_DELAY_MS),
            fallback_gas_limit: FALLBACK_BRIDGE_GAS_LIMIT,
            fallback_native_fee: U256::from(FALLBACK_NATIVE_FEE_WEI),
        }
    }
}

impl GasConfig {
    pub fn builder() -> GasConfigBuilder {
        GasConfigBuilder::default()
    }

    /// `gas * (100 + buffer_percent) / 100`, saturating at `u64::MAX`.
    pub fn apply_buffer(&self, gas: u64) -> u64 {
        let buffered = u128::from(gas) * (100 + u128::from(self.buffer_percent)) / 100;
        u64::try_from(buffered).unwrap_or(u64::MAX)
    }
}

/// Builder for [`GasConfig`]
#[derive(Debug, Clone, Default)]
pub struct GasConfigBuilder {
    buffer_percent: Option<u64>,
    max_retries: Option<u32>,
    retry_delay: Option<Duration>,
    fallback_gas_limit: Option<u64>,
    fallback_native_fee: Option<U256>,
}

impl GasConfigBuilder {
    pub fn buffer_percent(mut self, percent: u64) -> Self {
        self.buffer_percent = Some(percent);
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    pub fn fallback_gas_limit(mut self, limit: u64) -> Self {
        self.fallback_gas_limit = Some(limit);
        self
    }

    pub fn fallback_native_fee(mut self, fee: U256) -> Self {
        self.fallback_native_fee = Some(fee);
        self
    }

    pub fn build(self) -> GasConfig {
        let defaults = GasConfig::default();
        GasConfig {
            buffer_percent: self.buffer_percent.unwrap_or(defaults.buffer_percent),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_delay: self.retry_delay.unwrap_or(defaults.retry_delay),
            fallback_gas_limit: self
                .fallback_gas_limit
                .unwrap_or(defaults.fallback_gas_limit),
            fallback_native_fee: self
                .fallback_native_fee
                .unwrap_or(defaults.fallback_native_fee),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Delivery polling against the scan service.
    pub polling: PollingConfig,
    /// Receipt polling against the source chain.
    pub receipt_polling: PollingConfig,
    pub gas: GasConfig,
    pub scan_api_url: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::testnet()
    }
}

impl BridgeConfig {
    pub fn testnet() -> Self {
        Self {
            polling: PollingConfig::default(),
            receipt_polling: PollingConfig::receipt(),
            gas: GasConfig::default(),
            scan_api_url: LAYERZERO_SCAN_API_TESTNET.to_string(),
        }
    }

    /// Loads overrides from the environment (and `.env`, if present).
    ///
    /// Recognised variables: `TREAT_SCAN_API_URL`, `TREAT_POLL_MAX_ATTEMPTS`,
    /// `TREAT_POLL_INTERVAL_SECS`, `TREAT_GAS_BUFFER_PERCENT`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidConfig`] when a variable does not parse or
    /// the result fails [`BridgeConfig::validate`].
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine; the process environment still applies.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`BridgeConfig::from_env`], reading through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::testnet();

        if let Some(url) = lookup("TREAT_SCAN_API_URL") {
            config.scan_api_url = url;
        }
        if let Some(raw) = lookup("TREAT_POLL_MAX_ATTEMPTS") {
            config.polling.max_attempts = parse_var("TREAT_POLL_MAX_ATTEMPTS", &raw)?;
        }
        if let Some(raw) = lookup("TREAT_POLL_INTERVAL_SECS") {
            config.polling.poll_interval_secs = parse_var("TREAT_POLL_INTERVAL_SECS", &raw)?;
        }
        if let Some(raw) = lookup("TREAT_GAS_BUFFER_PERCENT") {
            config.gas.buffer_percent = parse_var("TREAT_GAS_BUFFER_PERCENT", &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_POLL_ATTEMPTS..=MAX_POLL_ATTEMPTS).contains(&self.polling.max_attempts) {
            return Err(BridgeError::InvalidConfig(format!(
                "poll attempts must be within {MIN_POLL_ATTEMPTS}..={MAX_POLL_ATTEMPTS}, got {}",
                self.polling.max_attempts
            )));
        }
        if self.polling.poll_interval_secs == 0 || self.receipt_polling.poll_interval_secs == 0 {
            return Err(BridgeError::InvalidConfig(
                "poll interval must be non-zero".to_string(),
            ));
        }
        url::Url::parse(&self.scan_api_url)
            .map_err(|e| BridgeError::InvalidConfig(format!("scan api url: {e}")))?;
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| BridgeError::InvalidConfig(format!("{key}={raw} does not parse")))
}
