//! Allowance tracking keyed by (owner, token, spender, chain)
//!
//! A fetched allowance is only ever reported for the key it was fetched
//! with. Re-keying drops the old value immediately and a late answer for an
//! old key is ignored, so callers see "unknown" until the new key resolves.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use crate::domain::entities::{AllowanceKey, AllowanceSnapshot};
use crate::domain::repositories::AllowanceOracle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowanceStatus {
    /// Nothing to track (native token, no account)
    Unknown,
    Fetching { key: AllowanceKey },
    Fresh(AllowanceSnapshot),
    Unavailable { key: AllowanceKey, reason: String },
}

impl AllowanceStatus {
    pub fn key(&self) -> Option<&AllowanceKey> {
        match self {
            AllowanceStatus::Unknown => None,
            AllowanceStatus::Fetching { key } => Some(key),
            AllowanceStatus::Fresh(snapshot) => Some(&snapshot.key),
            AllowanceStatus::Unavailable { key, .. } => Some(key),
        }
    }

    pub fn snapshot(&self) -> Option<&AllowanceSnapshot> {
        match self {
            AllowanceStatus::Fresh(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

pub struct AllowanceTracker {
    oracle: Arc<dyn AllowanceOracle>,
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<AllowanceStatus>>,
    inflight: Mutex<Option<JoinHandle<()>>>,
}

impl AllowanceTracker {
    pub fn new(oracle: Arc<dyn AllowanceOracle>) -> Self {
        let (state, _) = watch::channel(AllowanceStatus::Unknown);
        Self {
            oracle,
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
            inflight: Mutex::new(None),
        }
    }

    pub fn current(&self) -> AllowanceStatus {
        self.state.borrow().clone()
    }

    /// Fresh snapshot, if the current key has one
    pub fn snapshot(&self) -> Option<AllowanceSnapshot> {
        self.state.borrow().snapshot().cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<AllowanceStatus> {
        self.state.subscribe()
    }

    /// Follow `key`. A no-op when already tracking it, except after a failure.
    pub fn track(&self, key: Option<AllowanceKey>) {
        {
            let current = self.state.borrow();
            let unchanged = match (&key, &*current) {
                (None, AllowanceStatus::Unknown) => true,
                (Some(_), AllowanceStatus::Unavailable { .. }) => false,
                (Some(key), status) => status.key() == Some(key),
                (None, _) => false,
            };
            if unchanged {
                return;
            }
        }
        self.fetch(key);
    }

    /// Re-fetch the current key, e.g. after an approval confirmed.
    pub fn refresh(&self) {
        let key = self.state.borrow().key().cloned();
        self.fetch(key);
    }

    /// Wait for the current key to resolve.
    pub async fn settled(&self) -> AllowanceStatus {
        let mut receiver = self.state.subscribe();
        loop {
            let current = receiver.borrow_and_update().clone();
            if !matches!(current, AllowanceStatus::Fetching { .. }) {
                return current;
            }
            if receiver.changed().await.is_err() {
                return current;
            }
        }
    }

    fn fetch(&self, key: Option<AllowanceKey>) {
        let seq = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.abort_inflight();

        let key = match key {
            Some(key) => key,
            None => {
                self.state.send_replace(AllowanceStatus::Unknown);
                return;
            }
        };

        log::debug!(
            "Fetching allowance #{} of token {:?} for spender {:?} on chain {}",
            seq,
            key.token,
            key.spender,
            key.chain_id
        );
        self.state.send_replace(AllowanceStatus::Fetching { key: key.clone() });

        let oracle = Arc::clone(&self.oracle);
        let generation = Arc::clone(&self.generation);
        let state = Arc::clone(&self.state);

        let handle = tokio::spawn(async move {
            let result = oracle
                .get_allowance(key.owner, key.token, key.spender, key.chain_id)
                .await;
            let next = match result {
                Ok(amount) => AllowanceStatus::Fresh(AllowanceSnapshot {
                    key: key.clone(),
                    amount,
                }),
                Err(e) => {
                    log::warn!("Allowance fetch #{} failed: {}", seq, e);
                    AllowanceStatus::Unavailable {
                        key: key.clone(),
                        reason: e.to_string(),
                    }
                }
            };

            let published = state.send_if_modified(|current| {
                let live = generation.load(Ordering::SeqCst) == seq
                    && matches!(current, AllowanceStatus::Fetching { key: pending } if *pending == key);
                if live {
                    *current = next;
                }
                live
            });
            if !published {
                log::debug!("Discarding stale allowance #{}", seq);
            }
        });

        *self.inflight_guard() = Some(handle);
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

impl Drop for AllowanceTracker {
    fn drop(&mut self) {
        self.abort_inflight();
    }
}
