//! Debounced quote engine
//!
//! Every call to [`QuoteEngine::request_quote`] issues a new sequence number
//! and cancels whatever was pending before it. The collaborator is only asked
//! once the input has been quiet for the debounce window, and a result is
//! published only if its sequence number is still the latest one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use crate::domain::entities::{Quote, QuoteRequest, SwapRequest};
use crate::domain::repositories::QuoteSource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteState {
    /// No quote: empty, non-positive or unquotable input
    Idle,
    Pending { seq: u64 },
    Ready(Quote),
    Unavailable { seq: u64, reason: String },
}

impl QuoteState {
    pub fn seq(&self) -> Option<u64> {
        match self {
            QuoteState::Idle => None,
            QuoteState::Pending { seq } => Some(*seq),
            QuoteState::Ready(quote) => Some(quote.as_of),
            QuoteState::Unavailable { seq, .. } => Some(*seq),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, QuoteState::Pending { .. })
    }
}

pub struct QuoteEngine {
    source: Arc<dyn QuoteSource>,
    debounce: Duration,
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<QuoteState>>,
    inflight: Mutex<Option<JoinHandle<()>>>,
}

impl QuoteEngine {
    pub fn new(source: Arc<dyn QuoteSource>, debounce: Duration) -> Self {
        let (state, _) = watch::channel(QuoteState::Idle);
        Self {
            source,
            debounce,
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
            inflight: Mutex::new(None),
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Sequence number of the most recent request
    pub fn latest_seq(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> QuoteState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QuoteState> {
        self.state.subscribe()
    }

    /// Issue a quote for `request`, superseding any earlier one.
    ///
    /// Must be called from within a tokio runtime. Returns the sequence
    /// number assigned to this request.
    pub fn request_quote(&self, request: &SwapRequest) -> u64 {
        let seq = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.abort_inflight();

        let amount_in = match request.amount().positive() {
            Some(amount) if !request.is_same_asset() => amount,
            _ => {
                log::debug!("Quote #{} has no quotable input, clearing estimate", seq);
                self.state.send_replace(QuoteState::Idle);
                return seq;
            }
        };

        self.state.send_replace(QuoteState::Pending { seq });

        let quote_request = QuoteRequest {
            chain_id: request.chain_id,
            from_token: request.from_token.clone(),
            to_token: request.to_token.clone(),
            amount_in,
        };
        let source = Arc::clone(&self.source);
        let generation = Arc::clone(&self.generation);
        let state = Arc::clone(&self.state);
        let debounce = self.debounce;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if generation.load(Ordering::SeqCst) != seq {
                log::debug!("Quote #{} superseded before it was sent", seq);
                return;
            }

            log::debug!(
                "Requesting quote #{}: {} {} -> {} on chain {}",
                seq,
                quote_request.from_token.format_amount(quote_request.amount_in),
                quote_request.from_token.symbol,
                quote_request.to_token.symbol,
                quote_request.chain_id
            );

            let next = match source.get_quote(&quote_request).await {
                Ok(amount_out_raw) => QuoteState::Ready(Quote {
                    amount_out: quote_request.to_token.format_amount(amount_out_raw),
                    amount_out_raw,
                    as_of: seq,
                    received_at: Utc::now(),
                }),
                Err(e) => {
                    log::warn!("Quote #{} unavailable: {}", seq, e);
                    QuoteState::Unavailable {
                        seq,
                        reason: e.to_string(),
                    }
                }
            };

            if !publish_if_current(&state, &generation, seq, next) {
                log::debug!("Discarding stale quote #{}", seq);
            }
        });

        *self.inflight_guard() = Some(handle);
        seq
    }

    /// Drop interest in any outstanding quote and clear the estimate.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.abort_inflight();
        self.state.send_replace(QuoteState::Idle);
    }

    /// Wait until the latest request has either produced a result or failed.
    ///
    /// A collaborator that never answers keeps this pending forever.
    pub async fn settled(&self) -> QuoteState {
        let mut receiver = self.state.subscribe();
        loop {
            let current = receiver.borrow_and_update().clone();
            if !current.is_pending() {
                return current;
            }
            if receiver.changed().await.is_err() {
                return current;
            }
        }
    }

    fn inflight_guard(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        match self.inflight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn abort_inflight(&self) {
        if let Some(handle) = self.inflight_guard().take() {
            handle.abort();
        }
    }
}

impl Drop for QuoteEngine {
    fn drop(&mut self) {
        self.abort_inflight();
    }
}

/// Publish `next` only while `seq` is still the live request.
///
/// The check runs under the channel lock, so a newer request that bumps the
/// generation either lands before (result discarded) or after (result
/// overwritten by its `Pending`).
fn publish_if_current(
    state: &watch::Sender<QuoteState>,
    generation: &AtomicU64,
    seq: u64,
    next: QuoteState,
) -> bool {
    state.send_if_modified(|current| {
        let live = generation.load(Ordering::SeqCst) == seq
            && matches!(current, QuoteState::Pending { seq: pending } if *pending == seq);
        if live {
            *current = next;
        }
        live
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use async_trait::async_trait;
    use crate::domain::entities::Token;
    use crate::domain::repositories::MockQuoteSource;
    use crate::shared::error::SwapError;
    use crate::shared::types::{Address, U256};

    /// USDC (6 decimals) -> DAI (18 decimals) at parity, with per-amount latency
    #[derive(Default)]
    struct ScriptedSource {
        calls: Mutex<Vec<U256>>,
        delays: Mutex<HashMap<U256, Duration>>,
    }

    impl ScriptedSource {
        fn delay(&self, amount: U256, delay: Duration) {
            self.delays.lock().unwrap().insert(amount, delay);
        }

        fn calls(&self) -> Vec<U256> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QuoteSource for ScriptedSource {
        async fn get_quote(&self, request: &QuoteRequest) -> Result<U256, SwapError> {
            let delay = {
                self.calls.lock().unwrap().push(request.amount_in);
                self.delays.lock().unwrap().get(&request.amount_in).copied().unwrap_or_default()
            };
            tokio::time::sleep(delay).await;
            Ok(request.amount_in * U256::exp10(12))
        }
    }

    fn request(amount: &str) -> SwapRequest {
        let usdc = Token::new("USDC", "USD Coin", Address::repeat_byte(0x83), 6).unwrap();
        let dai = Token::new("DAI", "Dai Stablecoin", Address::repeat_byte(0x50), 18).unwrap();
        SwapRequest::new(8453, usdc, dai, amount)
    }

    fn engine(source: Arc<dyn QuoteSource>) -> QuoteEngine {
        QuoteEngine::new(source, Duration::from_millis(500))
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_issue_a_single_quote() {
        let source = Arc::new(ScriptedSource::default());
        let engine = engine(source.clone());

        for amount in ["1", "1.", "1.2", "1.25"] {
            engine.request_quote(&request(amount));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(source.calls().is_empty());

        match engine.settled().await {
            QuoteState::Ready(quote) => {
                assert_eq!(quote.amount_out, "1.25");
                assert_eq!(quote.as_of, engine.latest_seq());
            }
            other => panic!("Expected a quote, got {:?}", other),
        }
        assert_eq!(source.calls(), vec![U256::from(1_250_000u64)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_order_results_keep_latest() {
        let source = Arc::new(ScriptedSource::default());
        let first = U256::from(1_000_000u64);
        let second = U256::from(2_000_000u64);
        source.delay(first, Duration::from_millis(1_000));
        source.delay(second, Duration::from_millis(100));
        let engine = engine(source.clone());

        engine.request_quote(&request("1"));
        // Past the debounce window: the first quote is now in flight
        tokio::time::sleep(Duration::from_millis(600)).await;
        let latest = engine.request_quote(&request("2"));

        let settled = engine.settled().await;
        tokio::time::sleep(Duration::from_millis(2_000)).await;

        assert_eq!(source.calls(), vec![first, second]);
        for state in [settled, engine.current()] {
            match state {
                QuoteState::Ready(quote) => {
                    assert_eq!(quote.as_of, latest);
                    assert_eq!(quote.amount_out, "2");
                }
                other => panic!("Expected the latest quote, got {:?}", other),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_positive_amount_yields_no_quote() {
        let source = Arc::new(ScriptedSource::default());
        let engine = engine(source.clone());

        for amount in ["", "0", "0.00", "-1", "abc"] {
            engine.request_quote(&request(amount));
            assert_eq!(engine.current(), QuoteState::Idle);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(source.calls().is_empty());
        assert_eq!(engine.current(), QuoteState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_to_empty_cancels_pending_quote() {
        let source = Arc::new(ScriptedSource::default());
        let engine = engine(source.clone());

        engine.request_quote(&request("5"));
        assert!(engine.current().is_pending());
        engine.request_quote(&request(""));
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(source.calls().is_empty());
        assert_eq!(engine.current(), QuoteState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_collaborator_failure_is_reported_as_unavailable() {
        let mut source = MockQuoteSource::new();
        source
            .expect_get_quote()
            .times(1)
            .returning(|_| Box::pin(async { Err(SwapError::rate_limited("429 Too Many Requests")) }));
        let engine = engine(Arc::new(source));

        let seq = engine.request_quote(&request("3"));
        match engine.settled().await {
            QuoteState::Unavailable { seq: failed, reason } => {
                assert_eq!(failed, seq);
                assert!(reason.contains("429"));
            }
            other => panic!("Expected unavailable, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_clears_estimate() {
        let source = Arc::new(ScriptedSource::default());
        let engine = engine(source.clone());

        engine.request_quote(&request("4"));
        engine.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(source.calls().is_empty());
        assert_eq!(engine.current(), QuoteState::Idle);
    }

    #[test]
    fn test_stale_result_is_not_published() {
        let (state, _receiver) = watch::channel(QuoteState::Pending { seq: 2 });
        let generation = AtomicU64::new(2);
        let stale = QuoteState::Unavailable { seq: 1, reason: "late".to_string() };

        assert!(!publish_if_current(&state, &generation, 1, stale));
        assert_eq!(*state.borrow(), QuoteState::Pending { seq: 2 });

        let fresh = QuoteState::Unavailable { seq: 2, reason: "down".to_string() };
        assert!(publish_if_current(&state, &generation, 2, fresh.clone()));
        assert_eq!(*state.borrow(), fresh);
    }
}
