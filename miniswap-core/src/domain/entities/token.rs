//! Token entity for the swap core

use serde::{Deserialize, Serialize};
use crate::shared::constants::TokenConfig;
use crate::shared::error::SwapError;
use crate::shared::types::{Address, U256};
use crate::shared::utils::{format_units, parse_address, parse_units};

/// A token registered on one chain. The zero address stands for the native coin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Token {
    pub symbol: String,
    pub name: String,
    pub address: Address,
    pub decimals: u8,
}

impl Token {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, address: Address, decimals: u8) -> Result<Self, SwapError> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return Err(SwapError::validation("Token symbol cannot be empty"));
        }
        Ok(Self {
            symbol,
            name: name.into(),
            address,
            decimals,
        })
    }

    pub fn from_config(config: &TokenConfig) -> Result<Self, SwapError> {
        Self::new(config.symbol, config.name, parse_address(config.address)?, config.decimals)
    }

    /// Native coins move without an ERC-20 allowance.
    pub fn is_native(&self) -> bool {
        self.address.is_zero()
    }

    pub fn to_smallest_units(&self, amount: &str) -> Result<U256, SwapError> {
        parse_units(amount, self.decimals)
    }

    pub fn format_amount(&self, value: U256) -> String {
        format_units(value, self.decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::BASE_TOKENS;

    #[test]
    fn test_token_from_config() {
        let eth = Token::from_config(&BASE_TOKENS[0]).expect("Failed to build ETH");
        let usdc = Token::from_config(&BASE_TOKENS[1]).expect("Failed to build USDC");

        assert!(eth.is_native());
        assert!(!usdc.is_native());
        assert_eq!(usdc.decimals, 6);
        assert_eq!(usdc.name, "USD Coin");
    }

    #[test]
    fn test_token_amounts() {
        let usdc = Token::from_config(&BASE_TOKENS[1]).expect("Failed to build USDC");
        let raw = usdc.to_smallest_units("12.34").expect("Failed to parse amount");

        assert_eq!(raw, U256::from(12_340_000u64));
        assert_eq!(usdc.format_amount(raw), "12.34");
    }

    #[test]
    fn test_empty_symbol_rejected() {
        assert!(Token::new("", "Nameless", Address::zero(), 18).is_err());
    }
}
