// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Exact wei ⇄ ether conversion.
//!
//! Amounts are scaled by powers of ten on `U256`; nothing passes through a
//! binary float, so every wei value survives a format/parse round trip.

use alloy::primitives::U256;

/// Decimals of the native currency.
pub const ETHER_DECIMALS: u8 = 18;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Invalid amount format: {0}")]
    Format(String),

    #[error("Too many decimal places (max {0})")]
    TooPrecise(u8),

    #[error("Amount overflow")]
    Overflow,
}

/// Format wei as an ether decimal string, without truncation.
pub fn format_ether(wei: U256) -> String {
    format_units(wei, ETHER_DECIMALS)
}

/// Parse an ether decimal string back to wei.
pub fn parse_ether(amount: &str) -> Result<U256, AmountError> {
    parse_units(amount, ETHER_DECIMALS)
}

/// Format an integer amount with the given number of decimals.
///
/// Trailing fractional zeros are trimmed; whole values have no point.
pub fn format_units(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        return whole.to_string();
    }

    let decimal_str = format!("{:0>width$}", remainder.to_string(), width = decimals as usize);
    format!("{}.{}", whole, decimal_str.trim_end_matches('0'))
}

/// Parse a decimal amount into its integer representation.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, AmountError> {
    let amount = amount.trim();
    let (whole_str, frac_str) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };

    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if whole_str.is_empty() || !is_digits(whole_str) || !is_digits(frac_str) {
        return Err(AmountError::Format(amount.to_string()));
    }
    if frac_str.len() > decimals as usize {
        return Err(AmountError::TooPrecise(decimals));
    }

    let whole = U256::from_str_radix(whole_str, 10).map_err(|_| AmountError::Overflow)?;
    let padded = format!("{:0<width$}", frac_str, width = decimals as usize);
    let fraction = if padded.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(&padded, 10).map_err(|_| AmountError::Overflow)?
    };

    let multiplier = U256::from(10u64).pow(U256::from(decimals));
    whole
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(fraction))
        .ok_or(AmountError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_ether_is_exact() {
        assert_eq!(format_ether(U256::ZERO), "0");
        assert_eq!(format_ether(U256::from(1u64)), "0.000000000000000001");
        assert_eq!(format_ether(U256::from(1_000_000_000_000_000_000u64)), "1");
        assert_eq!(format_ether(U256::from(2_500_000_000_000_000_000u64)), "2.5");
        assert_eq!(
            format_ether(U256::from(123_456_789_012_345_678u64)),
            "0.123456789012345678"
        );
    }

    #[test]
    fn wei_ether_round_trip() {
        for wei in [
            U256::ZERO,
            U256::from(1u64),
            U256::from(1_000_000_000_000_000_000u64),
            U256::from(123_456_789_012_345_678u64),
            U256::MAX,
        ] {
            assert_eq!(parse_ether(&format_ether(wei)).unwrap(), wei, "round trip of {wei}");
        }
    }

    #[test]
    fn parse_units_rejects_garbage() {
        assert!(matches!(parse_ether("1.2.3"), Err(AmountError::Format(_))));
        assert!(matches!(parse_ether("-1"), Err(AmountError::Format(_))));
        assert!(matches!(parse_ether(".5"), Err(AmountError::Format(_))));
        assert!(matches!(
            parse_ether("0.0000000000000000001"),
            Err(AmountError::TooPrecise(18))
        ));
    }

    #[test]
    fn format_units_other_decimals() {
        assert_eq!(format_units(U256::from(1_500_000u64), 6), "1.5");
        assert_eq!(parse_units("1.5", 6).unwrap(), U256::from(1_500_000u64));
    }
}
