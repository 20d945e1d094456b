use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::FetchError;
use crate::cache::UserStore;
use crate::models::User;

use super::{SyncEvent, SyncState, UserSource};

type FetchOutcome = Result<Vec<User>, FetchError>;

/// Drives one fetch per load and applies it to the store.
///
/// The fetch runs in a spawned Tokio task, so `load` must be called from
/// within a runtime. The outcome is only applied when the owner calls `poll`
/// or `wait`; dropping the synchronizer aborts the fetch and discards any
/// late result.
pub struct CacheSync {
    source: Arc<dyn UserSource>,
    store: UserStore,
    state: SyncState,
    /// A fetch has been started during the current load
    attempted: bool,
    outcome_rx: Option<mpsc::Receiver<FetchOutcome>>,
    in_flight: Option<JoinHandle<()>>,
    observers: Vec<mpsc::UnboundedSender<SyncEvent>>,
}

impl CacheSync {
    pub fn new(source: impl UserSource + 'static, store: UserStore) -> Self {
        Self {
            source: Arc::new(source),
            store,
            state: SyncState::Idle,
            attempted: false,
            outcome_rx: None,
            in_flight: None,
            observers: Vec::new(),
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    /// Current store contents. This is the only read path for display.
    pub fn users(&self) -> Vec<User> {
        self.store.read_all()
    }

    pub fn user(&self, id: &str) -> Option<User> {
        self.store.get(id)
    }

    /// Register an observer. Every observer receives every event.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SyncEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.push(tx);
        rx
    }

    /// Start the fetch for this load.
    ///
    /// Returns `false` without fetching when a fetch is already in flight, or
    /// when this load already attempted one and the store has data.
    pub fn load(&mut self) -> bool {
        if self.state == SyncState::Syncing {
            debug!("Sync already in flight, not starting another");
            return false;
        }
        if self.attempted && !self.store.is_empty() {
            debug!("Sync already attempted for this load and cache is populated");
            return false;
        }

        info!(cached = self.store.len(), "Starting sync");

        let (tx, rx) = mpsc::channel(1);
        let source = Arc::clone(&self.source);

        self.in_flight = Some(tokio::spawn(async move {
            let outcome = source.fetch().await;
            if tx.send(outcome).await.is_err() {
                debug!("Synchronizer gone before fetch completed, discarding result");
            }
        }));
        self.outcome_rx = Some(rx);
        self.attempted = true;
        self.state = SyncState::Syncing;
        true
    }

    /// Start a new load, e.g. when a long-lived front end is shown again.
    /// The next `load` call will fetch even if the store has data.
    pub fn new_load(&mut self) {
        if self.state != SyncState::Syncing {
            self.attempted = false;
            self.state = SyncState::Idle;
        }
    }

    /// Apply a finished fetch if there is one, without blocking.
    ///
    /// Returns the new state when an outcome was applied.
    pub fn poll(&mut self) -> Option<SyncState> {
        let received = match self.outcome_rx.as_mut()?.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(mpsc::error::TryRecvError::Empty) => return None,
            Err(mpsc::error::TryRecvError::Disconnected) => None,
        };
        self.finish(received);
        Some(self.state)
    }

    /// Wait for the in-flight fetch (if any) and apply it
    pub async fn wait(&mut self) -> SyncState {
        let received = match self.outcome_rx.as_mut() {
            Some(rx) => rx.recv().await,
            None => return self.state,
        };
        self.finish(received);
        self.state
    }

    /// `load` followed by `wait`
    pub async fn sync(&mut self) -> SyncState {
        self.load();
        self.wait().await
    }

    /// `None` means the fetch task ended without reporting (panic or abort)
    fn finish(&mut self, received: Option<FetchOutcome>) {
        self.outcome_rx = None;
        self.in_flight = None;

        match received {
            Some(Ok(users)) => self.apply_fetched(&users),
            Some(Err(e)) => {
                if !e.is_network() {
                    warn!(error = %e, "Fetch returned an unusable response");
                }
                self.fall_back(e.to_string())
            }
            None => {
                warn!("Fetch task ended without a result");
                self.fall_back("fetch task ended without a result".to_string())
            }
        }
    }

    fn apply_fetched(&mut self, users: &[User]) {
        match self.store.upsert(users) {
            Ok(summary) => {
                self.state = SyncState::Synced;
                self.notify(SyncEvent::DataChanged {
                    inserted: summary.inserted,
                    updated: summary.updated,
                    total: self.store.len(),
                });
            }
            Err(e) => {
                warn!(error = %e, "Failed to write fetched users to the store");
                self.state = SyncState::SyncFailedFallback;
                self.notify(SyncEvent::StoreWriteFailed {
                    reason: e.to_string(),
                });
            }
        }
    }

    fn fall_back(&mut self, reason: String) {
        info!(reason = %reason, cached = self.store.len(), "Sync failed, using cached data");
        self.state = SyncState::SyncFailedFallback;
        self.notify(SyncEvent::UsingCachedData { reason });
    }

    fn notify(&mut self, event: SyncEvent) {
        self.observers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl Drop for CacheSync {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
