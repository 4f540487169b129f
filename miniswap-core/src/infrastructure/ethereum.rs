//! Read-only chain access over JSON-RPC
//!
//! Provides the on-chain allowance lookup and transaction receipt status.
//! Signing and broadcasting stay with the wallet.

use std::collections::HashMap;
use async_trait::async_trait;
use ethers::abi::{self, Token as AbiToken};
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Bytes, TransactionReceipt, TransactionRequest, H256};
use crate::core::registry::TokenRegistry;
use crate::domain::repositories::AllowanceOracle;
use crate::infrastructure::config::SwapConfig;
use crate::shared::error::SwapError;
use crate::shared::types::{Address, ChainId, TransactionStatus, U256};

/// `allowance(address,address)`
const ALLOWANCE_SELECTOR: [u8; 4] = [0xdd, 0x62, 0xed, 0x3e];

pub struct RpcChainReader {
    providers: HashMap<ChainId, Provider<Http>>,
}

impl RpcChainReader {
    pub fn new(endpoints: impl IntoIterator<Item = (ChainId, String)>) -> Result<Self, SwapError> {
        let mut providers = HashMap::new();
        for (chain_id, url) in endpoints {
            let provider = Provider::<Http>::try_from(url.as_str())
                .map_err(|e| SwapError::config(format!("Invalid RPC url for chain {}: {}", chain_id, e)))?;
            providers.insert(chain_id, provider);
        }
        Ok(Self { providers })
    }

    /// One provider per registered chain, honouring RPC overrides
    pub fn from_registry(registry: &TokenRegistry, config: &SwapConfig) -> Result<Self, SwapError> {
        Self::new(registry.chains().map(|chain| (chain.id, config.rpc_url_for(chain))))
    }

    fn provider(&self, chain_id: ChainId) -> Result<&Provider<Http>, SwapError> {
        self.providers
            .get(&chain_id)
            .ok_or_else(|| SwapError::unsupported_chain(format!("No RPC endpoint for chain {}", chain_id)))
    }

    pub async fn transaction_status(&self, tx_ref: &str, chain_id: ChainId) -> Result<TransactionStatus, SwapError> {
        let hash = tx_ref
            .parse::<H256>()
            .map_err(|_| SwapError::validation(format!("Invalid transaction hash: {}", tx_ref)))?;
        let receipt = self.provider(chain_id)?.get_transaction_receipt(hash).await?;
        Ok(receipt_status(receipt.as_ref()))
    }
}

#[async_trait]
impl AllowanceOracle for RpcChainReader {
    async fn get_allowance(
        &self,
        owner: Address,
        token: Address,
        spender: Address,
        chain_id: ChainId,
    ) -> Result<U256, SwapError> {
        let tx = TransactionRequest::new().to(token).data(allowance_calldata(owner, spender));
        let output = self
            .provider(chain_id)?
            .call(&tx.into(), None)
            .await
            .map_err(|e| SwapError::allowance(format!("allowance() call failed: {}", e)))?;
        decode_uint(&output)
    }
}

fn allowance_calldata(owner: Address, spender: Address) -> Bytes {
    let mut data = ALLOWANCE_SELECTOR.to_vec();
    data.extend(abi::encode(&[AbiToken::Address(owner), AbiToken::Address(spender)]));
    data.into()
}

fn decode_uint(output: &[u8]) -> Result<U256, SwapError> {
    if output.len() < 32 {
        return Err(SwapError::allowance(format!(
            "Expected a 32-byte word, got {} bytes",
            output.len()
        )));
    }
    Ok(U256::from_big_endian(&output[..32]))
}

fn receipt_status(receipt: Option<&TransactionReceipt>) -> TransactionStatus {
    let receipt = match receipt {
        Some(receipt) => receipt,
        None => return TransactionStatus::Pending,
    };
    match receipt.status {
        Some(status) if status.as_u64() == 1 => TransactionStatus::Confirmed,
        // Pre-byzantium receipts carry no status; inclusion means success
        None => TransactionStatus::Confirmed,
        Some(_) => TransactionStatus::Failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::U64;

    #[test]
    fn test_allowance_calldata_layout() {
        let owner = Address::repeat_byte(0x11);
        let spender = Address::repeat_byte(0x22);
        let data = allowance_calldata(owner, spender);

        assert_eq!(data.len(), 4 + 64);
        assert_eq!(&data[..4], &[0xdd, 0x62, 0xed, 0x3e]);
        assert_eq!(&data[4..16], &[0u8; 12]);
        assert_eq!(&data[16..36], owner.as_bytes());
        assert_eq!(&data[48..68], spender.as_bytes());
    }

    #[test]
    fn test_decode_uint() {
        let mut word = [0u8; 32];
        word[31] = 100;
        assert_eq!(decode_uint(&word).unwrap(), U256::from(100u64));
        assert!(matches!(decode_uint(&[0u8; 4]), Err(SwapError::Allowance(_))));
    }

    #[test]
    fn test_receipt_status() {
        assert_eq!(receipt_status(None), TransactionStatus::Pending);

        let mut receipt = TransactionReceipt {
            status: Some(U64::from(1)),
            ..Default::default()
        };
        assert_eq!(receipt_status(Some(&receipt)), TransactionStatus::Confirmed);

        receipt.status = Some(U64::zero());
        assert_eq!(receipt_status(Some(&receipt)), TransactionStatus::Failed);
    }

    #[test]
    fn test_unknown_chain_has_no_provider() {
        let reader = RpcChainReader::new(vec![(8453, "https://mainnet.base.org".to_string())]).unwrap();
        assert!(reader.provider(8453).is_ok());
        assert!(matches!(reader.provider(1), Err(SwapError::UnsupportedChain(_))));
    }

    #[test]
    fn test_invalid_hash_rejected() {
        let reader = RpcChainReader::new(vec![(8453, "https://mainnet.base.org".to_string())]).unwrap();
        let result = tokio_test::block_on(reader.transaction_status("0x1234", 8453));
        assert!(matches!(result, Err(SwapError::Validation(_))));
    }
}
