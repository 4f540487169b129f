//! Chain entity for the swap core

use serde::{Deserialize, Serialize};
use crate::shared::constants::ChainConfig;
use crate::shared::error::SwapError;
use crate::shared::types::{Address, ChainId};
use crate::shared::utils::parse_address;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chain {
    pub id: ChainId,
    pub display_name: String,
    pub routing_slug: String,
    pub rpc_url: String,
    /// Contract that needs an allowance before it can pull ERC-20 tokens
    pub spender: Address,
}

impl Chain {
    pub fn from_config(config: &ChainConfig) -> Result<Self, SwapError> {
        Ok(Self {
            id: config.chain_id,
            display_name: config.name.to_string(),
            routing_slug: config.routing_slug.to_string(),
            rpc_url: config.rpc_url.to_string(),
            spender: parse_address(config.swap_router)?,
        })
    }
}
