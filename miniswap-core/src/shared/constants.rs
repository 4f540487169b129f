//! Constants for the swap core
//!
//! This module contains all constants used throughout the swap core,
//! including the built-in chain and token tables.

// Quote engine constants
pub const DEFAULT_QUOTE_DEBOUNCE_MS: u64 = 500;

// Registry constants
pub const DEFAULT_CHAIN_ID: u64 = 8453;
pub const NATIVE_TOKEN_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

// External endpoints
pub const DEFAULT_QUOTE_API_URL: &str = "https://api.0x.org";
pub const DEFAULT_HANDOFF_URL: &str = "https://app.uniswap.org/swap";
/// Placeholder the 0x API uses for a chain's native coin
pub const ZEROEX_NATIVE_TOKEN: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

// Configuration keys
pub const ENV_PREFIX: &str = "MINISWAP";
pub const RPC_URL_ENV_PREFIX: &str = "MINISWAP_RPC_URL_";
pub const CONFIG_FILE: &str = "miniswap";

// Action labels
pub const LABEL_CONNECT: &str = "Connect Wallet";
pub const LABEL_ENTER_AMOUNT: &str = "Enter an amount";
pub const LABEL_INVALID_PAIR: &str = "Select different tokens";
pub const LABEL_LOADING: &str = "Loading…";
pub const LABEL_QUOTE_UNAVAILABLE: &str = "Quote unavailable";
pub const LABEL_APPROVING: &str = "Approving…";
pub const LABEL_SWAP: &str = "Swap";
pub const LABEL_PROCESSING: &str = "Processing…";
pub const LABEL_CONFIRMED: &str = "Swap confirmed";

// Token configurations
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub symbol: &'static str,
    pub name: &'static str,
    pub decimals: u8,
    pub address: &'static str,
}

// Chain configurations
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: &'static str,
    /// Chain identifier understood by the external exchange
    pub routing_slug: &'static str,
    pub rpc_url: &'static str,
    /// Swap router that receives ERC-20 approvals
    pub swap_router: &'static str,
    pub tokens: &'static [TokenConfig],
}

pub static BASE_TOKENS: &[TokenConfig] = &[
    TokenConfig {
        symbol: "ETH",
        name: "Ethereum",
        decimals: 18,
        address: NATIVE_TOKEN_ADDRESS,
    },
    TokenConfig {
        symbol: "USDC",
        name: "USD Coin",
        decimals: 6,
        address: "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
    },
    TokenConfig {
        symbol: "DAI",
        name: "Dai Stablecoin",
        decimals: 18,
        address: "0x50c5725949A6F0c72E6C4a641F24049A917E0C6A",
    },
];

pub static ETHEREUM_TOKENS: &[TokenConfig] = &[
    TokenConfig {
        symbol: "ETH",
        name: "Ethereum",
        decimals: 18,
        address: NATIVE_TOKEN_ADDRESS,
    },
    TokenConfig {
        symbol: "USDC",
        name: "USD Coin",
        decimals: 6,
        address: "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
    },
    TokenConfig {
        symbol: "DAI",
        name: "Dai Stablecoin",
        decimals: 18,
        address: "0x6B175474E89094C44Da98b954EedeAC495271d0F",
    },
    TokenConfig {
        symbol: "USDT",
        name: "Tether USD",
        decimals: 6,
        address: "0xdAC17F958D2ee523a2206206994597C13D831ec7",
    },
];

pub static OPTIMISM_TOKENS: &[TokenConfig] = &[
    TokenConfig {
        symbol: "ETH",
        name: "Ethereum",
        decimals: 18,
        address: NATIVE_TOKEN_ADDRESS,
    },
    TokenConfig {
        symbol: "USDC",
        name: "USD Coin",
        decimals: 6,
        address: "0x0b2C639c533813f4Aa9D7837CAf62653d097Ff85",
    },
    TokenConfig {
        symbol: "DAI",
        name: "Dai Stablecoin",
        decimals: 18,
        address: "0xDA10009cBd5D07dd0CeCc66161FC93D7c9000da1",
    },
];

pub static ARBITRUM_TOKENS: &[TokenConfig] = &[
    TokenConfig {
        symbol: "ETH",
        name: "Ethereum",
        decimals: 18,
        address: NATIVE_TOKEN_ADDRESS,
    },
    TokenConfig {
        symbol: "USDC",
        name: "USD Coin",
        decimals: 6,
        address: "0xaf88d065e77c8cC2239327C5EDb3A432268e5831",
    },
    TokenConfig {
        symbol: "DAI",
        name: "Dai Stablecoin",
        decimals: 18,
        address: "0xDA10009cBd5D07dd0CeCc66161FC93D7c9000da1",
    },
];

pub static BASE_CONFIG: ChainConfig = ChainConfig {
    chain_id: 8453,
    name: "Base",
    routing_slug: "base",
    rpc_url: "https://mainnet.base.org",
    swap_router: "0x2626664c2603336E57B271c5C0b26F421741e481",
    tokens: BASE_TOKENS,
};

pub static ETHEREUM_CONFIG: ChainConfig = ChainConfig {
    chain_id: 1,
    name: "Ethereum",
    routing_slug: "mainnet",
    rpc_url: "https://cloudflare-eth.com",
    swap_router: "0x68b3465833fb72A70ecDF485E0e4C7bD8665Fc45",
    tokens: ETHEREUM_TOKENS,
};

pub static OPTIMISM_CONFIG: ChainConfig = ChainConfig {
    chain_id: 10,
    name: "Optimism",
    routing_slug: "optimism",
    rpc_url: "https://mainnet.optimism.io",
    swap_router: "0x68b3465833fb72A70ecDF485E0e4C7bD8665Fc45",
    tokens: OPTIMISM_TOKENS,
};

pub static ARBITRUM_CONFIG: ChainConfig = ChainConfig {
    chain_id: 42161,
    name: "Arbitrum",
    routing_slug: "arbitrum",
    rpc_url: "https://arb1.arbitrum.io/rpc",
    swap_router: "0x68b3465833fb72A70ecDF485E0e4C7bD8665Fc45",
    tokens: ARBITRUM_TOKENS,
};

// Supported chains, default first
pub static SUPPORTED_CHAINS: &[&ChainConfig] = &[
    &BASE_CONFIG,
    &ETHEREUM_CONFIG,
    &OPTIMISM_CONFIG,
    &ARBITRUM_CONFIG,
];
