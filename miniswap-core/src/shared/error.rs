//! Error handling for the swap core
//!
//! This module defines the error types used throughout the swap core.

use thiserror::Error;

/// Swap error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported chain: {0}")]
    UnsupportedChain(String),

    #[error("Unsupported token: {0}")]
    UnsupportedToken(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Quote unavailable: {0}")]
    QuoteUnavailable(String),

    #[error("Allowance error: {0}")]
    Allowance(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("User rejected: {0}")]
    UserRejected(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SwapError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unsupported_chain(message: impl Into<String>) -> Self {
        Self::UnsupportedChain(message.into())
    }

    pub fn unsupported_token(message: impl Into<String>) -> Self {
        Self::UnsupportedToken(message.into())
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited(message.into())
    }

    pub fn quote_unavailable(message: impl Into<String>) -> Self {
        Self::QuoteUnavailable(message.into())
    }

    pub fn allowance(message: impl Into<String>) -> Self {
        Self::Allowance(message.into())
    }

    /// Create a wallet session error
    pub fn wallet(message: impl Into<String>) -> Self {
        Self::Wallet(message.into())
    }

    pub fn user_rejected(message: impl Into<String>) -> Self {
        Self::UserRejected(message.into())
    }

    /// Create a transaction error
    pub fn transaction(message: impl Into<String>) -> Self {
        Self::Transaction(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Collaborator failures that clear up on the next input change or retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::RateLimited(_) | Self::QuoteUnavailable(_) | Self::Allowance(_)
        )
    }

    /// Input errors only ever disable the action; they are never shown as alerts.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::UnsupportedToken(_) | Self::UnsupportedChain(_)
        )
    }
}

// Standard library error conversions
impl From<std::io::Error> for SwapError {
    fn from(err: std::io::Error) -> Self {
        Self::config(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        Self::validation(format!("JSON error: {}", err))
    }
}

impl From<tokio::task::JoinError> for SwapError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("Task join error: {}", err))
    }
}

impl From<config::ConfigError> for SwapError {
    fn from(err: config::ConfigError) -> Self {
        Self::config(err.to_string())
    }
}

// Collaborator error conversions
impl From<reqwest::Error> for SwapError {
    fn from(err: reqwest::Error) -> Self {
        if err.status().map(|s| s.as_u16()) == Some(429) {
            Self::rate_limited(err.to_string())
        } else {
            Self::network(format!("HTTP error: {}", err))
        }
    }
}

impl From<ethers::providers::ProviderError> for SwapError {
    fn from(err: ethers::providers::ProviderError) -> Self {
        Self::network(format!("RPC error: {}", err))
    }
}

impl From<reqwest::header::InvalidHeaderValue> for SwapError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::config(format!("Invalid header value: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_error_creation() {
        let config_error = SwapError::config("Invalid configuration");
        let validation_error = SwapError::validation("Invalid input");
        let rejected = SwapError::user_rejected("User denied transaction signature");

        assert!(matches!(config_error, SwapError::Config(_)));
        assert!(matches!(validation_error, SwapError::Validation(_)));
        assert!(matches!(rejected, SwapError::UserRejected(_)));
    }

    #[test]
    fn test_error_taxonomy() {
        assert!(SwapError::rate_limited("429").is_transient());
        assert!(SwapError::allowance("eth_call failed").is_transient());
        assert!(!SwapError::transaction("reverted").is_transient());
        assert!(!SwapError::user_rejected("denied").is_transient());
        assert!(SwapError::unsupported_token("WBTC").is_input_error());
        assert!(!SwapError::network("timeout").is_input_error());
    }

    #[test]
    fn test_error_conversions() {
        let json_error = serde_json::from_str::<u64>("not json").unwrap_err();
        let swap_error: SwapError = json_error.into();

        assert!(matches!(swap_error, SwapError::Validation(_)));
    }

    #[test]
    fn test_error_display() {
        let error = SwapError::quote_unavailable("no liquidity");
        let display = format!("{}", error);

        assert!(display.contains("Quote unavailable"));
        assert!(display.contains("no liquidity"));
    }
}
