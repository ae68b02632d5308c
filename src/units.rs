// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Amount parsing and display
//!
//! TREAT and every supported native currency use 18 decimals. Amounts enter as
//! user-typed decimal strings and are converted to smallest units exactly once,
//! here.

use alloy_primitives::utils::parse_units;
use alloy_primitives::U256;

use crate::error::{BridgeError, Result};

pub const TOKEN_DECIMALS: u8 = 18;

/// Decimals shown for token balances.
pub const BALANCE_DISPLAY_DECIMALS: u8 = 4;

/// Decimals shown for native fees.
pub const FEE_DISPLAY_DECIMALS: u8 = 6;

/// Whether a raw edit of the amount field is accepted at all.
///
/// Accepts digits with at most one decimal point, including the empty string
/// and partial input such as `"1."` or `"."`.
pub fn is_valid_amount_input(input: &str) -> bool {
    let mut seen_dot = false;
    input.chars().all(|c| match c {
        '0'..='9' => true,
        '.' if !seen_dot => {
            seen_dot = true;
            true
        }
        _ => false,
    })
}

/// Parses a decimal string into the token's smallest unit.
///
/// # Errors
///
/// Returns [`BridgeError::InvalidAmount`] for empty input, non-numeric input,
/// or more than 18 fractional digits.
pub fn parse_amount(input: &str) -> Result<U256> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "." || !is_valid_amount_input(trimmed) {
        return Err(BridgeError::InvalidAmount(input.to_string()));
    }

    if let Some((_, frac)) = trimmed.split_once('.') {
        if frac.len() > TOKEN_DECIMALS as usize {
            return Err(BridgeError::InvalidAmount(format!(
                "{input}: more than {TOKEN_DECIMALS} decimal places"
            )));
        }
    }

    let normalized = match (trimmed.strip_prefix('.'), trimmed.strip_suffix('.')) {
        (Some(rest), _) => format!("0.{rest}"),
        (None, Some(rest)) => rest.to_string(),
        (None, None) => trimmed.to_string(),
    };

    parse_units(&normalized, TOKEN_DECIMALS)
        .map(|units| units.get_absolute())
        .map_err(|e| BridgeError::InvalidAmount(format!("{input}: {e}")))
}

/// Parses an amount and rejects zero.
pub fn parse_positive_amount(input: &str) -> Result<U256> {
    let amount = parse_amount(input)?;
    if amount.is_zero() {
        return Err(BridgeError::InvalidAmount(format!("{input}: must be greater than zero")));
    }
    Ok(amount)
}

/// Exact decimal representation with trailing zeros removed.
pub fn format_amount(value: U256) -> String {
    let unit = U256::from(10u64).pow(U256::from(TOKEN_DECIMALS));
    let whole = value / unit;
    let frac = value % unit;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", frac.to::<u64>(), width = TOKEN_DECIMALS as usize);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

/// Rounds half-up to `decimals` places and always prints exactly that many.
pub fn format_fixed(value: U256, decimals: u8) -> String {
    let decimals = decimals.min(TOKEN_DECIMALS);
    let drop = U256::from(10u64).pow(U256::from(TOKEN_DECIMALS - decimals));
    let scaled = (value + drop / U256::from(2)) / drop;
    if decimals == 0 {
        return scaled.to_string();
    }
    let keep = U256::from(10u64).pow(U256::from(decimals));
    let whole = scaled / keep;
    let frac = (scaled % keep).to::<u64>();
    format!("{whole}.{frac:0width$}", width = decimals as usize)
}

/// `percent` of `balance`, truncating.
pub fn amount_for_percentage(balance: U256, percent: u8) -> U256 {
    balance * U256::from(percent.min(100)) / U256::from(100)
}

/// Share of `balance` that `amount` represents, clamped to 100.
///
/// Returns 0 when the balance is zero.
pub fn percentage_of_balance(amount: U256, balance: U256) -> u8 {
    if balance.is_zero() {
        return 0;
    }
    let pct = amount * U256::from(100) / balance;
    if pct >= U256::from(100) {
        100
    } else {
        pct.to::<u8>()
    }
}
