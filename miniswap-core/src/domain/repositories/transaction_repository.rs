//! Approval and swap execution contract
//!
//! Signing and broadcasting happen in the wallet; implementations return the
//! transaction reference once the wallet has accepted the request.

use async_trait::async_trait;
use crate::domain::entities::{SwapParams, Token};
use crate::shared::error::SwapError;
use crate::shared::types::{Address, ChainId, TransactionHash, TransactionStatus, U256};

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait SwapExecutor: Send + Sync {
    /// Approve `spender` to move `amount` of `token`
    async fn approve(
        &self,
        token: &Token,
        spender: Address,
        amount: U256,
        chain_id: ChainId,
    ) -> Result<TransactionHash, SwapError>;

    /// Submit the swap itself
    async fn submit_swap(&self, params: &SwapParams) -> Result<TransactionHash, SwapError>;

    async fn get_transaction_status(
        &self,
        tx_ref: &TransactionHash,
        chain_id: ChainId,
    ) -> Result<TransactionStatus, SwapError>;
}
