//! MiniSwap Core
//!
//! Swap orchestration core for the MiniSwap wallet mini-app.
//! Decides which single action the swap form offers (connect, switch chain,
//! approve, swap) and keeps the quoted estimate in step with what the user
//! typed.
//!
//! ## Architecture
//!
//! - **Core**: token registry, debounced quote engine, allowance tracker,
//!   action state machine and the swap session
//! - **Domain**: entities and the collaborator traits (wallet, allowance
//!   oracle, quote source, swap executor)
//! - **Infrastructure**: configuration, JSON-RPC reads, 0x price API, exchange
//!   handoff link
//! - **Shared**: common types, constants, errors and amount utilities
//!
//! ## Usage
//!
//! ```rust,ignore
//! use miniswap_core::init_swap_core;
//!
//! let core = init_swap_core()?;
//! let mut session = core.new_session(wallet, executor, quotes, allowances);
//!
//! session.select_from_token("USDC")?;
//! session.set_amount("25");
//! session.settled().await;
//!
//! let action = session.action();
//! println!("{} (enabled: {})", action.label, action.enabled);
//! ```

use std::sync::Arc;
use reqwest::Url;

pub mod core;
pub mod domain;
pub mod shared;
pub mod infrastructure;

use crate::shared::error::SwapError;

// Re-export main components
pub use crate::core::{
    evaluate, ActionState, AllowanceTracker, OrchestrationState, OrchestratorInputs, PrimaryAction, QuoteEngine,
    QuoteState, SwapSession, TokenRegistry,
};
pub use crate::domain::entities::{Chain, Quote, QuoteRequest, SwapParams, SwapRequest, Token};
pub use crate::domain::repositories::{AllowanceOracle, QuoteSource, SwapExecutor, WalletSession};
pub use crate::infrastructure::{handoff_url, RpcChainReader, SwapConfig, ZeroExQuoteSource};
pub use crate::shared::types::{Address, ChainId, TransactionHash, TransactionStatus, WalletSnapshot, U256};

/// Initialize logging; safe to call more than once
pub fn init() {
    let _ = env_logger::try_init();
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

// Feature flags
#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "ffi")]
pub use ffi::*;

/// Initialize the swap core with configuration from .env or defaults
pub fn init_swap_core() -> Result<SwapCore, SwapError> {
    let config = SwapConfig::load()?;
    SwapCore::new(config)
}

/// Loaded configuration plus the token registry it selects
pub struct SwapCore {
    pub config: SwapConfig,
    pub registry: Arc<TokenRegistry>,
}

impl SwapCore {
    pub fn new(config: SwapConfig) -> Result<Self, SwapError> {
        let registry = TokenRegistry::builtin()?.with_default_chain(config.default_chain_id)?;
        log::info!(
            "Swap core {} ready with {} chains, default chain {}",
            VERSION,
            registry.chains().count(),
            registry.default_chain_id()
        );
        Ok(Self {
            config,
            registry: Arc::new(registry),
        })
    }

    /// Start a session against the given collaborators.
    pub fn new_session(
        &self,
        wallet: Arc<dyn WalletSession>,
        executor: Arc<dyn SwapExecutor>,
        quote_source: Arc<dyn QuoteSource>,
        allowance_oracle: Arc<dyn AllowanceOracle>,
    ) -> SwapSession {
        SwapSession::new(
            &self.config,
            Arc::clone(&self.registry),
            wallet,
            executor,
            quote_source,
            allowance_oracle,
        )
    }

    /// 0x price API quote source using the configured endpoint and key
    pub fn quote_source(&self) -> Result<ZeroExQuoteSource, SwapError> {
        ZeroExQuoteSource::from_config(&self.config)
    }

    /// Exchange link for the session's selection on the configured exchange
    pub fn handoff_url(&self, session: &SwapSession) -> Result<Url, SwapError> {
        session.handoff_url(&self.config.handoff_url)
    }

    /// JSON-RPC reader for every registered chain
    pub fn chain_reader(&self) -> Result<RpcChainReader, SwapError> {
        RpcChainReader::from_registry(&self.registry, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockAllowanceOracle, MockQuoteSource, MockSwapExecutor, MockWalletSession};

    #[test]
    fn test_swap_core_initialization() {
        init();
        init();
        let core = SwapCore::new(SwapConfig::default()).expect("Failed to initialize swap core");
        assert_eq!(core.registry.default_chain_id(), 8453);
        assert!(core.quote_source().is_ok());
        assert!(core.chain_reader().is_ok());
    }

    #[tokio::test]
    async fn test_handoff_uses_configured_exchange() {
        std::env::set_var("MINISWAP_TEST_HANDOFF_HANDOFF_URL", "https://swap.example.org/trade");
        let config = SwapConfig::load_from(None, "MINISWAP_TEST_HANDOFF").expect("Failed to load config");
        let core = SwapCore::new(config).expect("Failed to initialize swap core");

        let mut wallet = MockWalletSession::new();
        wallet.expect_snapshot().returning(WalletSnapshot::disconnected);
        let session = core.new_session(
            Arc::new(wallet),
            Arc::new(MockSwapExecutor::new()),
            Arc::new(MockQuoteSource::new()),
            Arc::new(MockAllowanceOracle::new()),
        );

        let url = core.handoff_url(&session).expect("Failed to build handoff url");
        assert_eq!(url.host_str(), Some("swap.example.org"));
        assert_eq!(url.path(), "/trade");
        assert!(url.query().unwrap_or_default().starts_with("chain=base&"));
    }

    #[test]
    fn test_unknown_default_chain_rejected() {
        let config = SwapConfig {
            default_chain_id: 5,
            ..SwapConfig::default()
        };
        assert!(matches!(SwapCore::new(config), Err(SwapError::UnsupportedChain(_))));
    }
}
