//! Allowance oracle contract

use async_trait::async_trait;
use crate::shared::error::SwapError;
use crate::shared::types::{Address, ChainId, U256};

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait AllowanceOracle: Send + Sync {
    /// Amount `owner` has approved `spender` to move, in smallest units
    async fn get_allowance(
        &self,
        owner: Address,
        token: Address,
        spender: Address,
        chain_id: ChainId,
    ) -> Result<U256, SwapError>;
}
