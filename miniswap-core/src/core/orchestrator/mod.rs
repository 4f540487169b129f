//! Swap action state machine
//!
//! [`evaluate`] is a pure function of the current inputs. It decides which
//! single primary action the swap form offers and whether it is enabled.
//! Nothing is stored between evaluations; callers re-run it after every
//! change and get the answer for the latest inputs.

use serde::{Deserialize, Serialize};
use crate::core::quote::QuoteState;
use crate::domain::entities::{
    AllowanceKey, AllowanceSnapshot, Chain, SwapIntent, SwapParams, SwapRequest, Token, TrackedTransaction,
};
use crate::shared::constants::{
    LABEL_APPROVING, LABEL_CONFIRMED, LABEL_CONNECT, LABEL_ENTER_AMOUNT, LABEL_INVALID_PAIR, LABEL_LOADING,
    LABEL_PROCESSING, LABEL_QUOTE_UNAVAILABLE, LABEL_SWAP,
};
use crate::shared::types::{
    Address, ApprovalMode, ChainId, TransactionHash, TransactionKind, TransactionStatus, WalletSnapshot, U256,
};

/// Action-readiness states, listed in evaluation priority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrchestrationState {
    Disconnected,
    WrongChain { chain_id: ChainId },
    NoAmount,
    InvalidPair,
    QuotePending,
    SwapPending,
    Confirmed { tx_ref: TransactionHash },
    NeedsApproval,
    ApprovalPending,
    QuoteUnavailable,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimaryAction {
    Connect,
    SwitchChain { chain_id: ChainId },
    Approve {
        token: Token,
        spender: Address,
        amount: U256,
        chain_id: ChainId,
    },
    ExecuteSwap(SwapParams),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionState {
    pub state: OrchestrationState,
    pub label: String,
    pub enabled: bool,
    pub action: Option<PrimaryAction>,
}

impl ActionState {
    fn enabled(state: OrchestrationState, label: impl Into<String>, action: PrimaryAction) -> Self {
        Self {
            state,
            label: label.into(),
            enabled: true,
            action: Some(action),
        }
    }

    fn disabled(state: OrchestrationState, label: impl Into<String>) -> Self {
        Self {
            state,
            label: label.into(),
            enabled: false,
            action: None,
        }
    }
}

/// Everything the state machine looks at
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorInputs<'a> {
    pub wallet: &'a WalletSnapshot,
    /// Chain selected in the form
    pub chain: &'a Chain,
    pub request: &'a SwapRequest,
    pub quote: &'a QuoteState,
    /// Sequence number of the most recently issued quote request
    pub latest_quote_seq: u64,
    pub allowance: Option<&'a AllowanceSnapshot>,
    /// The last allowance lookup for the current key failed
    pub allowance_unavailable: bool,
    pub approval: Option<&'a TrackedTransaction>,
    pub swap: Option<&'a TrackedTransaction>,
    pub approval_mode: ApprovalMode,
}

impl<'a> OrchestratorInputs<'a> {
    /// Allowance key the approval decision must be made against
    pub fn allowance_key(&self) -> Option<AllowanceKey> {
        self.wallet.account.map(|owner| AllowanceKey {
            owner,
            token: self.request.from_token.address,
            spender: self.chain.spender,
            chain_id: self.chain.id,
        })
    }

    fn tracked(&self, tx: Option<&'a TrackedTransaction>, kind: TransactionKind, intent: &SwapIntent) -> Option<&'a TrackedTransaction> {
        tx.filter(|tx| tx.kind == kind && &tx.intent == intent)
    }
}

pub fn evaluate(inputs: &OrchestratorInputs<'_>) -> ActionState {
    let chain = inputs.chain;
    let request = inputs.request;

    if !inputs.wallet.is_connected() {
        return ActionState::enabled(OrchestrationState::Disconnected, LABEL_CONNECT, PrimaryAction::Connect);
    }

    if inputs.wallet.chain_id != Some(chain.id) {
        return ActionState::enabled(
            OrchestrationState::WrongChain { chain_id: chain.id },
            format!("Switch to {}", chain.display_name),
            PrimaryAction::SwitchChain { chain_id: chain.id },
        );
    }

    let amount_in = match request.amount().positive() {
        Some(amount) => amount,
        None => return ActionState::disabled(OrchestrationState::NoAmount, LABEL_ENTER_AMOUNT),
    };

    if request.is_same_asset() {
        return ActionState::disabled(OrchestrationState::InvalidPair, LABEL_INVALID_PAIR);
    }

    // A quote for an older input is never shown; treat it as still loading
    if inputs.quote.is_pending()
        || *inputs.quote == QuoteState::Idle
        || inputs.quote.seq() != Some(inputs.latest_quote_seq)
    {
        return ActionState::disabled(OrchestrationState::QuotePending, LABEL_LOADING);
    }

    let intent = SwapIntent {
        chain_id: chain.id,
        from_token: request.from_token.address,
        to_token: request.to_token.address,
        amount_in,
    };

    if let Some(swap) = inputs.tracked(inputs.swap, TransactionKind::Swap, &intent) {
        match swap.status {
            TransactionStatus::Pending => {
                return ActionState::disabled(OrchestrationState::SwapPending, LABEL_PROCESSING);
            }
            TransactionStatus::Confirmed => {
                return ActionState::disabled(
                    OrchestrationState::Confirmed {
                        tx_ref: swap.tx_ref.clone(),
                    },
                    LABEL_CONFIRMED,
                );
            }
            TransactionStatus::Failed => {}
        }
    }

    if !request.from_token.is_native() {
        let key = inputs.allowance_key();
        let covered = match (key.as_ref(), inputs.allowance) {
            (Some(key), Some(snapshot)) => snapshot.covers(key, amount_in),
            _ => false,
        };

        if !covered {
            let approval = inputs.tracked(inputs.approval, TransactionKind::Approval, &intent);
            let awaiting_allowance = inputs.allowance.is_none() && !inputs.allowance_unavailable;
            match approval.map(|tx| tx.status) {
                Some(TransactionStatus::Pending) => {
                    return ActionState::disabled(OrchestrationState::ApprovalPending, LABEL_APPROVING);
                }
                Some(TransactionStatus::Confirmed) if awaiting_allowance => {
                    return ActionState::disabled(OrchestrationState::ApprovalPending, LABEL_APPROVING);
                }
                _ => {
                    return ActionState::enabled(
                        OrchestrationState::NeedsApproval,
                        format!("Approve {}", request.from_token.symbol),
                        PrimaryAction::Approve {
                            token: request.from_token.clone(),
                            spender: chain.spender,
                            amount: inputs.approval_mode.amount_for(amount_in),
                            chain_id: chain.id,
                        },
                    );
                }
            }
        }
    }

    let quote = match inputs.quote {
        QuoteState::Ready(quote) => quote,
        _ => return ActionState::disabled(OrchestrationState::QuoteUnavailable, LABEL_QUOTE_UNAVAILABLE),
    };

    ActionState::enabled(
        OrchestrationState::Ready,
        LABEL_SWAP,
        PrimaryAction::ExecuteSwap(SwapParams {
            chain_id: chain.id,
            from_token: request.from_token.clone(),
            to_token: request.to_token.clone(),
            amount_in: request.amount_in.trim().to_string(),
            amount_in_raw: amount_in,
            expected_amount_out: Some(quote.amount_out.clone()),
        }),
    )
}
