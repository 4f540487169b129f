//! Swap session
//!
//! Holds everything the swap form knows: the selected chain and request, the
//! last wallet snapshot, the quote engine, the allowance tracker and the
//! transactions submitted from this form. Every edit goes through here so the
//! quote and allowance are re-keyed together, and [`SwapSession::action`]
//! re-derives the button from scratch each time.

use std::sync::Arc;
use futures::future::join_all;
use reqwest::Url;
use crate::core::allowance::{AllowanceStatus, AllowanceTracker};
use crate::core::orchestrator::{evaluate, ActionState, OrchestratorInputs, PrimaryAction};
use crate::core::quote::{QuoteEngine, QuoteState};
use crate::core::registry::TokenRegistry;
use crate::domain::entities::{AllowanceKey, Chain, SwapIntent, SwapRequest, TrackedTransaction};
use crate::domain::repositories::{AllowanceOracle, QuoteSource, SwapExecutor, WalletSession};
use crate::infrastructure::config::SwapConfig;
use crate::infrastructure::handoff::handoff_url;
use crate::shared::error::SwapError;
use crate::shared::types::{
    ApprovalMode, ChainId, TransactionHash, TransactionKind, TransactionStatus, WalletSnapshot,
};

pub struct SwapSession {
    id: String,
    registry: Arc<TokenRegistry>,
    wallet: Arc<dyn WalletSession>,
    executor: Arc<dyn SwapExecutor>,
    quotes: QuoteEngine,
    allowances: AllowanceTracker,
    approval_mode: ApprovalMode,
    chain: Chain,
    request: SwapRequest,
    wallet_snapshot: WalletSnapshot,
    approval: Option<TrackedTransaction>,
    swap: Option<TrackedTransaction>,
    error: Option<String>,
    notice: Option<String>,
}

impl SwapSession {
    /// Start on the default chain with its default pair and no amount.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        config: &SwapConfig,
        registry: Arc<TokenRegistry>,
        wallet: Arc<dyn WalletSession>,
        executor: Arc<dyn SwapExecutor>,
        quote_source: Arc<dyn QuoteSource>,
        allowance_oracle: Arc<dyn AllowanceOracle>,
    ) -> Self {
        let chain = registry.resolve_chain(registry.default_chain_id()).clone();
        let (from_token, to_token) = registry.default_pair(chain.id);
        let request = SwapRequest::new(chain.id, from_token, to_token, "");
        let wallet_snapshot = wallet.snapshot();

        let session = Self {
            id: uuid::Uuid::new_v4().to_string(),
            registry,
            wallet,
            executor,
            quotes: QuoteEngine::new(quote_source, config.quote_debounce()),
            allowances: AllowanceTracker::new(allowance_oracle),
            approval_mode: config.approval_mode,
            chain,
            request,
            wallet_snapshot,
            approval: None,
            swap: None,
            error: None,
            notice: None,
        };
        session.sync_allowance();
        log::info!("Swap session {} started on {}", session.id, session.chain.display_name);
        session
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn request(&self) -> &SwapRequest {
        &self.request
    }

    pub fn wallet_snapshot(&self) -> &WalletSnapshot {
        &self.wallet_snapshot
    }

    pub fn quotes(&self) -> &QuoteEngine {
        &self.quotes
    }

    pub fn allowances(&self) -> &AllowanceTracker {
        &self.allowances
    }

    pub fn tracked_approval(&self) -> Option<&TrackedTransaction> {
        self.approval.as_ref()
    }

    pub fn tracked_swap(&self) -> Option<&TrackedTransaction> {
        self.swap.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.request.amount_in = amount.into();
        self.input_changed();
    }

    /// Select the from-token by exact symbol. Unknown symbols leave the
    /// selection untouched.
    pub fn select_from_token(&mut self, symbol: &str) -> Result<(), SwapError> {
        let token = self.registry.require_token(self.chain.id, symbol)?.clone();
        self.request.from_token = token;
        self.input_changed();
        Ok(())
    }

    pub fn select_to_token(&mut self, symbol: &str) -> Result<(), SwapError> {
        let token = self.registry.require_token(self.chain.id, symbol)?.clone();
        self.request.to_token = token;
        self.input_changed();
        Ok(())
    }

    /// Select a chain, falling back to the default chain when unsupported.
    /// Token symbols are kept where the new chain lists them; a side that
    /// cannot be kept is replaced by a token different from the other side.
    pub fn select_chain(&mut self, chain_id: ChainId) -> ChainId {
        let chain = self.registry.resolve_chain(chain_id).clone();
        let kept_from = self.registry.token(chain.id, &self.request.from_token.symbol).cloned();
        let kept_to = self.registry.token(chain.id, &self.request.to_token.symbol).cloned();

        let pair = match (kept_from, kept_to) {
            (Some(from), Some(to)) if from.address != to.address => Some((from, to)),
            (Some(from), None) => self
                .registry
                .counterpart(chain.id, &from)
                .cloned()
                .map(|to| (from, to)),
            (None, Some(to)) => self
                .registry
                .counterpart(chain.id, &to)
                .cloned()
                .map(|from| (from, to)),
            _ => None,
        };
        let (from_token, to_token) = pair.unwrap_or_else(|| self.registry.default_pair(chain.id));

        log::info!("Selected chain {} ({})", chain.display_name, chain.id);
        self.request = SwapRequest::new(chain.id, from_token, to_token, self.request.amount_in.clone());
        self.chain = chain;
        self.input_changed();
        self.chain.id
    }

    /// Swap direction; the shown estimate becomes the new input amount.
    pub fn flip_tokens(&mut self) {
        let estimate = self.displayed_amount_out();
        self.request = self.request.flipped(estimate.as_deref());
        self.input_changed();
    }

    pub fn update_wallet(&mut self, snapshot: WalletSnapshot) {
        if snapshot == self.wallet_snapshot {
            return;
        }
        log::debug!(
            "Wallet changed: {:?} account {:?} on chain {:?}",
            snapshot.status,
            snapshot.account,
            snapshot.chain_id
        );
        self.wallet_snapshot = snapshot;
        self.sync_allowance();
    }

    pub fn refresh_wallet(&mut self) {
        let snapshot = self.wallet.snapshot();
        self.update_wallet(snapshot);
    }

    pub fn action(&self) -> ActionState {
        let quote = self.quotes.current();
        let allowance = self.allowances.snapshot();
        let allowance_unavailable = self.allowance_unavailable().is_some();
        evaluate(&OrchestratorInputs {
            wallet: &self.wallet_snapshot,
            chain: &self.chain,
            request: &self.request,
            quote: &quote,
            latest_quote_seq: self.quotes.latest_seq(),
            allowance: allowance.as_ref(),
            allowance_unavailable,
            approval: self.approval.as_ref(),
            swap: self.swap.as_ref(),
            approval_mode: self.approval_mode,
        })
    }

    /// Run the primary action for the current state.
    ///
    /// Transient collaborator failures become an inline notice, wallet and
    /// transaction failures a dismissible error. Either way the error is
    /// returned and the entered amount and selection are left as they were.
    pub async fn dispatch(&mut self) -> Result<ActionState, SwapError> {
        let action = self.action();
        let primary = match action.action.clone() {
            Some(primary) if action.enabled => primary,
            _ => return Ok(action),
        };

        log::info!("Dispatching {:?} in state {:?}", primary, action.state);
        match self.run(primary).await {
            Ok(()) => {
                self.error = None;
                self.notice = None;
                Ok(self.action())
            }
            Err(e) => {
                log::warn!("Action failed: {}", e);
                if e.is_transient() {
                    self.notice = Some(e.to_string());
                } else if !e.is_input_error() {
                    self.error = Some(e.to_string());
                }
                Err(e)
            }
        }
    }

    async fn run(&mut self, action: PrimaryAction) -> Result<(), SwapError> {
        match action {
            PrimaryAction::Connect => {
                self.wallet.connect().await?;
                self.refresh_wallet();
                if !self.wallet_snapshot.is_connected() {
                    return Err(SwapError::wallet("Wallet did not connect"));
                }
            }
            PrimaryAction::SwitchChain { chain_id } => {
                self.wallet.switch_chain(chain_id).await?;
                self.refresh_wallet();
                if self.wallet_snapshot.chain_id != Some(chain_id) {
                    return Err(SwapError::wallet(format!("Wallet is still not on chain {}", chain_id)));
                }
            }
            PrimaryAction::Approve {
                token,
                spender,
                amount,
                chain_id,
            } => {
                let intent = self.current_intent()?;
                let executor = Arc::clone(&self.executor);
                let tx_ref = executor.approve(&token, spender, amount, chain_id).await?;
                log::info!("Approval {} submitted for {}", tx_ref, token.symbol);
                self.approval = Some(TrackedTransaction::submitted(TransactionKind::Approval, tx_ref, intent));
            }
            PrimaryAction::ExecuteSwap(params) => {
                let intent = self.current_intent()?;
                let executor = Arc::clone(&self.executor);
                let tx_ref = executor.submit_swap(&params).await?;
                log::info!(
                    "Swap {} submitted: {} {} -> {}",
                    tx_ref,
                    params.amount_in,
                    params.from_token.symbol,
                    params.to_token.symbol
                );
                self.swap = Some(TrackedTransaction::submitted(TransactionKind::Swap, tx_ref, intent));
            }
        }
        Ok(())
    }

    /// Record a status reported for a transaction submitted from this form.
    /// Returns false for references this session is not tracking.
    pub fn apply_transaction_status(&mut self, tx_ref: &str, status: TransactionStatus) -> bool {
        let tracked = [self.approval.as_mut(), self.swap.as_mut()]
            .into_iter()
            .flatten()
            .find(|tx| tx.tx_ref == tx_ref);
        let tx = match tracked {
            Some(tx) => tx,
            None => return false,
        };
        if tx.status == status {
            return true;
        }

        log::info!("{:?} {} is now {:?}", tx.kind, tx.tx_ref, status);
        tx.status = status;
        let kind = tx.kind;

        match (kind, status) {
            (TransactionKind::Approval, TransactionStatus::Confirmed) => self.allowances.refresh(),
            (TransactionKind::Approval, TransactionStatus::Failed) => {
                self.approval = None;
                self.error = Some(SwapError::transaction(format!("Approval {} failed", tx_ref)).to_string());
            }
            (TransactionKind::Swap, TransactionStatus::Failed) => {
                self.swap = None;
                self.error = Some(SwapError::transaction(format!("Swap {} failed", tx_ref)).to_string());
            }
            (TransactionKind::Swap, TransactionStatus::Confirmed) => self.allowances.refresh(),
            (_, TransactionStatus::Pending) => {}
        }
        true
    }

    /// Ask the executor about every tracked transaction still pending.
    pub async fn poll_transactions(&mut self) -> Result<(), SwapError> {
        let pending: Vec<(TransactionHash, ChainId)> = [self.approval.as_ref(), self.swap.as_ref()]
            .into_iter()
            .flatten()
            .filter(|tx| tx.status == TransactionStatus::Pending)
            .map(|tx| (tx.tx_ref.clone(), tx.intent.chain_id))
            .collect();

        let executor = Arc::clone(&self.executor);
        let lookups = pending
            .iter()
            .map(|(tx_ref, chain_id)| executor.get_transaction_status(tx_ref, *chain_id));
        let statuses = join_all(lookups).await;

        let mut first_error = None;
        for ((tx_ref, _), status) in pending.iter().zip(statuses) {
            match status {
                Ok(status) => {
                    self.apply_transaction_status(tx_ref, status);
                }
                Err(e) => {
                    log::warn!("Status lookup for {} failed: {}", tx_ref, e);
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Re-issue the quote for the current input, e.g. after it was unavailable.
    pub fn retry_quote(&self) -> u64 {
        self.quotes.request_quote(&self.request)
    }

    pub fn refresh_allowance(&self) {
        self.allowances.refresh();
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Exchange link for the current selection
    pub fn handoff_url(&self, base: &str) -> Result<Url, SwapError> {
        handoff_url(base, &self.chain, &self.request)
    }

    /// Estimate for the latest input, never one computed for an older edit
    pub fn displayed_amount_out(&self) -> Option<String> {
        match self.quotes.current() {
            QuoteState::Ready(quote) if quote.as_of == self.quotes.latest_seq() => Some(quote.amount_out),
            _ => None,
        }
    }

    /// Non-blocking notice for lookups or wallet calls that failed transiently
    pub fn inline_notice(&self) -> Option<String> {
        if let QuoteState::Unavailable { seq, reason } = self.quotes.current() {
            if seq == self.quotes.latest_seq() {
                return Some(format!("Quote unavailable: {}", reason));
            }
        }
        if let Some(reason) = self.allowance_unavailable() {
            return Some(format!("Could not load allowance: {}", reason));
        }
        self.notice.clone()
    }

    /// Wait for the outstanding quote and allowance lookups to resolve.
    pub async fn settled(&self) {
        self.quotes.settled().await;
        self.allowances.settled().await;
    }

    fn current_intent(&self) -> Result<SwapIntent, SwapError> {
        self.request
            .intent()
            .ok_or_else(|| SwapError::validation("Enter an amount"))
    }

    fn allowance_key(&self) -> Option<AllowanceKey> {
        if self.request.from_token.is_native() {
            return None;
        }
        self.wallet_snapshot.account.map(|owner| AllowanceKey {
            owner,
            token: self.request.from_token.address,
            spender: self.chain.spender,
            chain_id: self.chain.id,
        })
    }

    /// Failure reason of the last allowance lookup, if it was for the current key
    fn allowance_unavailable(&self) -> Option<String> {
        match self.allowances.current() {
            AllowanceStatus::Unavailable { key, reason } if Some(&key) == self.allowance_key().as_ref() => Some(reason),
            _ => None,
        }
    }

    fn sync_allowance(&self) {
        self.allowances.track(self.allowance_key());
    }

    /// Any edit drops transaction tracking and re-keys quote and allowance.
    fn input_changed(&mut self) {
        let approval = self.approval.take();
        let swap = self.swap.take();
        if approval.is_some() || swap.is_some() {
            log::debug!("Input changed, no longer tracking submitted transactions");
        }
        self.notice = None;
        self.quotes.request_quote(&self.request);
        self.sync_allowance();
    }
}
