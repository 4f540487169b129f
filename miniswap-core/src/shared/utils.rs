//! Utility functions for the swap core
//!
//! Amount conversions here are decimal-exact: a human amount is turned into
//! smallest units digit by digit, never through floating point.

use crate::shared::error::SwapError;
use crate::shared::types::{Address, U256};

/// Validate Ethereum address format
pub fn validate_ethereum_address(address: &str) -> Result<(), SwapError> {
    if !address.starts_with("0x") {
        return Err(SwapError::validation("Address must start with 0x"));
    }

    if address.len() != 42 {
        return Err(SwapError::validation("Address must be 42 characters long"));
    }

    if !address[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SwapError::validation("Address contains invalid hex characters"));
    }

    Ok(())
}

/// Parse a validated Ethereum address
pub fn parse_address(address: &str) -> Result<Address, SwapError> {
    validate_ethereum_address(address)?;
    address
        .parse::<Address>()
        .map_err(|e| SwapError::validation(format!("Invalid address {}: {}", address, e)))
}

/// Convert a decimal amount ("1.5") into smallest units for `decimals`.
///
/// Rejects signs, exponents, separators and any fractional digits beyond
/// `decimals`; nothing is truncated.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, SwapError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(SwapError::validation("Amount cannot be empty"));
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(SwapError::validation("Invalid amount format"));
    }

    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(SwapError::validation("Invalid amount format"));
    }

    let decimals = decimals as usize;
    if fraction.len() > decimals {
        return Err(SwapError::validation(format!(
            "Amount has more than {} decimal places",
            decimals
        )));
    }

    let mut digits = String::with_capacity(whole.len() + decimals);
    digits.push_str(whole);
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(decimals - fraction.len()));

    U256::from_dec_str(&digits).map_err(|_| SwapError::validation("Amount is too large"))
}

/// Render smallest units as a decimal amount, trimming trailing zeros.
pub fn format_units(value: U256, decimals: u8) -> String {
    let decimals = decimals as usize;
    let raw = value.to_string();
    if decimals == 0 {
        return raw;
    }

    let padded = if raw.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - raw.len() + 1), raw)
    } else {
        raw
    };

    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}
