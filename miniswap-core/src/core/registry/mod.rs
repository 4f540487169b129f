//! Chain and token registry
//!
//! Static mapping from chain id to the tokens the swap form offers. Built once
//! and never mutated. Lookups for an unknown chain resolve to the default
//! chain so the orchestrator always has something to evaluate.

use std::collections::HashSet;
use crate::domain::entities::{Chain, Token};
use crate::shared::constants::{ChainConfig, DEFAULT_CHAIN_ID, SUPPORTED_CHAINS};
use crate::shared::error::SwapError;
use crate::shared::types::ChainId;

#[derive(Debug, Clone)]
pub struct ChainEntry {
    pub chain: Chain,
    pub tokens: Vec<Token>,
}

impl ChainEntry {
    pub fn from_config(config: &ChainConfig) -> Result<Self, SwapError> {
        let chain = Chain::from_config(config)?;
        let tokens = config
            .tokens
            .iter()
            .map(Token::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { chain, tokens })
    }
}

#[derive(Debug, Clone)]
pub struct TokenRegistry {
    entries: Vec<ChainEntry>,
    default_chain_id: ChainId,
}

impl TokenRegistry {
    pub fn new(entries: Vec<ChainEntry>, default_chain_id: ChainId) -> Result<Self, SwapError> {
        let mut chain_ids = HashSet::new();
        for entry in &entries {
            if !chain_ids.insert(entry.chain.id) {
                return Err(SwapError::config(format!("Chain {} registered twice", entry.chain.id)));
            }
            if entry.tokens.len() < 2 {
                return Err(SwapError::config(format!(
                    "Chain {} needs at least two tokens",
                    entry.chain.id
                )));
            }
            let mut symbols = HashSet::new();
            for token in &entry.tokens {
                if !symbols.insert(token.symbol.as_str()) {
                    return Err(SwapError::config(format!(
                        "Token {} registered twice on chain {}",
                        token.symbol, entry.chain.id
                    )));
                }
            }
        }

        if !chain_ids.contains(&default_chain_id) {
            return Err(SwapError::unsupported_chain(format!(
                "Default chain {} is not registered",
                default_chain_id
            )));
        }

        Ok(Self {
            entries,
            default_chain_id,
        })
    }

    /// Registry of the built-in chains with Base as the fallback chain
    pub fn builtin() -> Result<Self, SwapError> {
        let entries = SUPPORTED_CHAINS
            .iter()
            .map(|config| ChainEntry::from_config(config))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries, DEFAULT_CHAIN_ID)
    }

    pub fn with_default_chain(self, chain_id: ChainId) -> Result<Self, SwapError> {
        Self::new(self.entries, chain_id)
    }

    pub fn default_chain_id(&self) -> ChainId {
        self.default_chain_id
    }

    pub fn is_supported(&self, chain_id: ChainId) -> bool {
        self.entries.iter().any(|e| e.chain.id == chain_id)
    }

    pub fn chains(&self) -> impl Iterator<Item = &Chain> {
        self.entries.iter().map(|e| &e.chain)
    }

    fn entry(&self, chain_id: ChainId) -> &ChainEntry {
        self.entries
            .iter()
            .find(|e| e.chain.id == chain_id)
            .or_else(|| self.entries.iter().find(|e| e.chain.id == self.default_chain_id))
            .unwrap_or(&self.entries[0])
    }

    /// Chain for `chain_id`, or the default chain when unsupported
    pub fn resolve_chain(&self, chain_id: ChainId) -> &Chain {
        let entry = self.entry(chain_id);
        if entry.chain.id != chain_id {
            log::debug!(
                "Chain {} is not supported, falling back to {}",
                chain_id,
                entry.chain.display_name
            );
        }
        &entry.chain
    }

    /// Ordered tokens for `chain_id`, falling back to the default chain
    pub fn tokens_for(&self, chain_id: ChainId) -> &[Token] {
        &self.entry(chain_id).tokens
    }

    /// Case-sensitive exact symbol lookup on the resolved chain
    pub fn token(&self, chain_id: ChainId, symbol: &str) -> Option<&Token> {
        self.tokens_for(chain_id).iter().find(|t| t.symbol == symbol)
    }

    pub fn require_token(&self, chain_id: ChainId, symbol: &str) -> Result<&Token, SwapError> {
        self.token(chain_id, symbol).ok_or_else(|| {
            SwapError::unsupported_token(format!(
                "{} is not available on {}",
                symbol,
                self.resolve_chain(chain_id).display_name
            ))
        })
    }

    /// First token on the chain that is a different asset from `token`
    pub fn counterpart(&self, chain_id: ChainId, token: &Token) -> Option<&Token> {
        self.tokens_for(chain_id).iter().find(|t| t.address != token.address)
    }

    /// First two tokens of the chain, e.g. ETH -> USDC on Base
    pub fn default_pair(&self, chain_id: ChainId) -> (Token, Token) {
        let tokens = self.tokens_for(chain_id);
        (tokens[0].clone(), tokens[1].clone())
    }
}
