//! Quote source contract

use async_trait::async_trait;
use crate::domain::entities::QuoteRequest;
use crate::shared::error::SwapError;
use crate::shared::types::U256;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait QuoteSource: Send + Sync {
    /// Estimated output in `to_token` smallest units.
    ///
    /// May be slow; callers never block on it.
    async fn get_quote(&self, request: &QuoteRequest) -> Result<U256, SwapError>;
}
