use serde::{Deserialize, Serialize};

pub use ethers::types::{Address, U256};

// Basic types for swap operations
pub type ChainId = u64;
pub type TransactionHash = String;
/// Human-entered decimal amount, e.g. "0.25"
pub type Amount = String;

/// Connection status reported by the wallet session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum WalletStatus {
    #[default]
    Disconnected,
    Connected,
}

/// Point-in-time view of the wallet session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct WalletSnapshot {
    pub status: WalletStatus,
    pub account: Option<Address>,
    pub chain_id: Option<ChainId>,
}

impl WalletSnapshot {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connected(account: Address, chain_id: ChainId) -> Self {
        Self {
            status: WalletStatus::Connected,
            account: Some(account),
            chain_id: Some(chain_id),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == WalletStatus::Connected
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Approval,
    Swap,
}

/// How much to approve when the spender lacks allowance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalMode {
    #[default]
    Unlimited,
    Exact,
}

impl ApprovalMode {
    pub fn amount_for(&self, required: U256) -> U256 {
        match self {
            ApprovalMode::Unlimited => U256::MAX,
            ApprovalMode::Exact => required,
        }
    }
}

// Result types for better error handling
pub type SwapResult<T> = Result<T, crate::shared::error::SwapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_snapshot() {
        let disconnected = WalletSnapshot::disconnected();
        assert!(!disconnected.is_connected());
        assert_eq!(disconnected.chain_id, None);

        let connected = WalletSnapshot::connected(Address::repeat_byte(0x11), 8453);
        assert!(connected.is_connected());
        assert_eq!(connected.chain_id, Some(8453));
    }

    #[test]
    fn test_approval_amounts() {
        let required = U256::from(1_000u64);
        assert_eq!(ApprovalMode::Exact.amount_for(required), required);
        assert_eq!(ApprovalMode::Unlimited.amount_for(required), U256::MAX);
    }

    #[test]
    fn test_approval_mode_serde() {
        let mode: ApprovalMode = serde_json::from_str("\"exact\"").expect("Failed to parse approval mode");
        assert_eq!(mode, ApprovalMode::Exact);
    }
}
