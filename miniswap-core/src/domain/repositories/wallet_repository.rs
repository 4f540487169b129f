//! Wallet session contract
//!
//! The connected wallet is owned by the front end (injected provider, wallet
//! SDK, ...). The core only reads its state and asks it to act.

use async_trait::async_trait;
use crate::shared::error::SwapError;
use crate::shared::types::{ChainId, WalletSnapshot};

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait WalletSession: Send + Sync {
    /// Current status, account and chain id
    fn snapshot(&self) -> WalletSnapshot;

    async fn connect(&self) -> Result<(), SwapError>;

    async fn disconnect(&self) -> Result<(), SwapError>;

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), SwapError>;
}
