//! Runtime configuration
//!
//! Layered as defaults, then an optional `miniswap.toml`, then `MINISWAP_*`
//! environment variables. A `.env` file is honoured when present.

use std::collections::HashMap;
use std::time::Duration;
use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use crate::domain::entities::Chain;
use crate::shared::constants::{
    CONFIG_FILE, DEFAULT_CHAIN_ID, DEFAULT_HANDOFF_URL, DEFAULT_QUOTE_API_URL, DEFAULT_QUOTE_DEBOUNCE_MS, ENV_PREFIX,
    RPC_URL_ENV_PREFIX,
};
use crate::shared::error::SwapError;
use crate::shared::types::{ApprovalMode, ChainId, SwapResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SwapConfig {
    /// Chain shown when the wallet is on an unsupported one
    pub default_chain_id: ChainId,
    pub quote_debounce_ms: u64,
    pub approval_mode: ApprovalMode,
    pub quote_api_url: String,
    pub quote_api_key: Option<String>,
    pub handoff_url: String,
    #[serde(default, skip)]
    pub rpc_urls: HashMap<ChainId, String>,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            default_chain_id: DEFAULT_CHAIN_ID,
            quote_debounce_ms: DEFAULT_QUOTE_DEBOUNCE_MS,
            approval_mode: ApprovalMode::default(),
            quote_api_url: DEFAULT_QUOTE_API_URL.to_string(),
            quote_api_key: None,
            handoff_url: DEFAULT_HANDOFF_URL.to_string(),
            rpc_urls: HashMap::new(),
        }
    }
}

impl SwapConfig {
    /// Load from `.env`, `miniswap.toml` and the process environment
    pub fn load() -> SwapResult<Self> {
        dotenv().ok();
        let mut config = Self::load_from(Some(CONFIG_FILE), ENV_PREFIX)?;
        config.rpc_urls = rpc_overrides(std::env::vars());
        config.validate()?;
        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    pub fn load_from(file: Option<&str>, env_prefix: &str) -> SwapResult<Self> {
        let mut builder = config::Config::builder().add_source(config::Config::try_from(&SwapConfig::default())?);

        if let Some(file) = file {
            builder = builder.add_source(config::File::with_name(file).required(false));
        }

        builder = builder.add_source(config::Environment::with_prefix(env_prefix).try_parsing(true));

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<(), SwapError> {
        if self.quote_api_url.trim().is_empty() {
            return Err(SwapError::config("quote_api_url cannot be empty"));
        }
        if self.handoff_url.trim().is_empty() {
            return Err(SwapError::config("handoff_url cannot be empty"));
        }
        Ok(())
    }

    pub fn quote_debounce(&self) -> Duration {
        Duration::from_millis(self.quote_debounce_ms)
    }

    /// RPC endpoint for `chain`, honouring `MINISWAP_RPC_URL_<chainId>`
    pub fn rpc_url_for(&self, chain: &Chain) -> String {
        self.rpc_urls
            .get(&chain.id)
            .cloned()
            .unwrap_or_else(|| chain.rpc_url.clone())
    }
}

fn rpc_overrides(vars: impl Iterator<Item = (String, String)>) -> HashMap<ChainId, String> {
    vars.filter_map(|(key, value)| {
        let chain_id = key.strip_prefix(RPC_URL_ENV_PREFIX)?.parse::<ChainId>().ok()?;
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some((chain_id, value.to_string()))
        }
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::BASE_CONFIG;

    #[test]
    fn test_defaults() {
        let config = SwapConfig::load_from(None, "MINISWAP_TEST_DEFAULTS").expect("Failed to load config");
        assert_eq!(config.default_chain_id, 8453);
        assert_eq!(config.quote_debounce(), Duration::from_millis(500));
        assert_eq!(config.approval_mode, ApprovalMode::Unlimited);
        assert_eq!(config.quote_api_key, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides() {
        std::env::set_var("MINISWAP_TEST_ENV_APPROVAL_MODE", "exact");
        std::env::set_var("MINISWAP_TEST_ENV_QUOTE_DEBOUNCE_MS", "250");

        let config = SwapConfig::load_from(None, "MINISWAP_TEST_ENV").expect("Failed to load config");
        assert_eq!(config.approval_mode, ApprovalMode::Exact);
        assert_eq!(config.quote_debounce_ms, 250);
    }

    #[test]
    fn test_rpc_overrides() {
        let vars = vec![
            ("MINISWAP_RPC_URL_8453".to_string(), "https://base.example".to_string()),
            ("MINISWAP_RPC_URL_abc".to_string(), "https://ignored.example".to_string()),
            ("MINISWAP_RPC_URL_10".to_string(), "  ".to_string()),
            ("PATH".to_string(), "/usr/bin".to_string()),
        ];
        let config = SwapConfig {
            rpc_urls: rpc_overrides(vars.into_iter()),
            ..SwapConfig::default()
        };
        assert_eq!(config.rpc_urls.len(), 1);

        let base = Chain::from_config(&BASE_CONFIG).expect("Failed to build chain");
        assert_eq!(config.rpc_url_for(&base), "https://base.example");

        let config = SwapConfig::default();
        assert_eq!(config.rpc_url_for(&base), "https://mainnet.base.org");
    }

    #[test]
    fn test_empty_urls_rejected() {
        let config = SwapConfig {
            quote_api_url: " ".to_string(),
            ..SwapConfig::default()
        };
        assert!(matches!(config.validate(), Err(SwapError::Config(_))));
    }
}
