//! Swap request, quote and allowance value objects
//!
//! Everything here is ephemeral: a new `SwapRequest` is built for every user
//! edit and quotes/allowances are only meaningful for the request or key they
//! were produced for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::entities::token::Token;
use crate::shared::types::{Address, Amount, ChainId, TransactionHash, TransactionKind, TransactionStatus, U256};

/// Classification of the user-entered amount against the from-token precision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountInput {
    Empty,
    /// Zero or negative
    NonPositive,
    Invalid(String),
    Positive(U256),
}

impl AmountInput {
    pub fn parse(raw: &str, token: &Token) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return AmountInput::Empty;
        }

        if let Some(magnitude) = trimmed.strip_prefix('-') {
            return match token.to_smallest_units(magnitude) {
                Ok(_) => AmountInput::NonPositive,
                Err(e) => AmountInput::Invalid(e.to_string()),
            };
        }

        match token.to_smallest_units(trimmed) {
            Ok(value) if value.is_zero() => AmountInput::NonPositive,
            Ok(value) => AmountInput::Positive(value),
            Err(e) => AmountInput::Invalid(e.to_string()),
        }
    }

    pub fn positive(&self) -> Option<U256> {
        match self {
            AmountInput::Positive(value) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SwapRequest {
    pub chain_id: ChainId,
    pub from_token: Token,
    pub to_token: Token,
    pub amount_in: Amount,
}

impl SwapRequest {
    pub fn new(chain_id: ChainId, from_token: Token, to_token: Token, amount_in: impl Into<Amount>) -> Self {
        Self {
            chain_id,
            from_token,
            to_token,
            amount_in: amount_in.into(),
        }
    }

    pub fn amount(&self) -> AmountInput {
        AmountInput::parse(&self.amount_in, &self.from_token)
    }

    pub fn is_same_asset(&self) -> bool {
        self.from_token.address == self.to_token.address
    }

    /// Identity of what the user is currently asking for, used to match
    /// tracked transactions against the live input.
    pub fn intent(&self) -> Option<SwapIntent> {
        self.amount().positive().map(|amount_in| SwapIntent {
            chain_id: self.chain_id,
            from_token: self.from_token.address,
            to_token: self.to_token.address,
            amount_in,
        })
    }

    /// Reverse direction; the previous estimate becomes the new input amount.
    pub fn flipped(&self, estimate: Option<&str>) -> Self {
        Self {
            chain_id: self.chain_id,
            from_token: self.to_token.clone(),
            to_token: self.from_token.clone(),
            amount_in: estimate.unwrap_or_default().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SwapIntent {
    pub chain_id: ChainId,
    pub from_token: Address,
    pub to_token: Address,
    pub amount_in: U256,
}

/// Parameters handed to the execution collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SwapParams {
    pub chain_id: ChainId,
    pub from_token: Token,
    pub to_token: Token,
    pub amount_in: Amount,
    pub amount_in_raw: U256,
    pub expected_amount_out: Option<Amount>,
}

/// Input to the quote collaborator, amounts in smallest units
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuoteRequest {
    pub chain_id: ChainId,
    pub from_token: Token,
    pub to_token: Token,
    pub amount_in: U256,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    pub amount_out: Amount,
    pub amount_out_raw: U256,
    /// Sequence number of the request this quote answers
    pub as_of: u64,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AllowanceKey {
    pub owner: Address,
    pub token: Address,
    pub spender: Address,
    pub chain_id: ChainId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllowanceSnapshot {
    pub key: AllowanceKey,
    pub amount: U256,
}

impl AllowanceSnapshot {
    /// True only when the snapshot belongs to `key` and covers `required`.
    pub fn covers(&self, key: &AllowanceKey, required: U256) -> bool {
        &self.key == key && self.amount >= required
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackedTransaction {
    pub kind: TransactionKind,
    pub tx_ref: TransactionHash,
    pub status: TransactionStatus,
    pub intent: SwapIntent,
    pub submitted_at: DateTime<Utc>,
}

impl TrackedTransaction {
    pub fn submitted(kind: TransactionKind, tx_ref: TransactionHash, intent: SwapIntent) -> Self {
        Self {
            kind,
            tx_ref,
            status: TransactionStatus::Pending,
            intent,
            submitted_at: Utc::now(),
        }
    }
}
