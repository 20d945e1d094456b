//! Application state for the friendcache front end.
//!
//! `App` owns the synchronizer and turns its events into status messages.
//! It never reads fetch results directly; everything it shows comes from
//! the store through `CacheSync::users`.

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use friendcache_core::utils::format_date;
use friendcache_core::{ApiClient, CacheSync, Config, SyncEvent, SyncState, User, UserStore};

pub struct App {
    sync: CacheSync,
    events: mpsc::UnboundedReceiver<SyncEvent>,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let cache_dir = config.cache_dir()?;
        let store = UserStore::open(&cache_dir)
            .with_context(|| format!("Failed to open cache in {}", cache_dir.display()))?;
        let api = ApiClient::new(config.source_url(), config.request_timeout())
            .context("Failed to create HTTP client")?;

        debug!(url = api.url(), cache = %cache_dir.display(), "App configured");

        let status_message = store.quarantined().map(|aside| {
            format!("Cache was unreadable and has been reset (old copy at {})", aside.display())
        });

        let mut sync = CacheSync::new(api, store);
        let events = sync.subscribe();

        Ok(Self {
            sync,
            events,
            status_message,
        })
    }

    /// Run this load's fetch to completion and collect the resulting status
    pub async fn refresh(&mut self) -> SyncState {
        if self.sync.load() {
            self.status_message = Some("Refreshing data...".to_string());
        }
        let state = self.sync.wait().await;
        self.check_events();
        state
    }

    /// Show whatever is cached without touching the network
    pub fn offline(&mut self) {
        info!("Offline mode, using cache only");
        self.status_message = Some(format!("Offline mode ({})", self.last_updated()));
    }

    /// Drain pending sync events into the status line
    pub fn check_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.status_message = Some(self.describe(&event));
            if event.is_warning() {
                warn!(?event, "Sync warning");
            }
        }
    }

    fn describe(&self, event: &SyncEvent) -> String {
        match event {
            SyncEvent::DataChanged { inserted, updated, total } => format!(
                "Updated just now: {} users, {} friends ({} new, {} changed)",
                total,
                self.sync.store().friend_count(),
                inserted,
                updated
            ),
            SyncEvent::UsingCachedData { reason } => {
                format!("Offline: showing cached data, {} ({})", self.last_updated(), reason)
            }
            SyncEvent::StoreWriteFailed { reason } => {
                format!("Warning: could not save fetched data, showing previous cache ({})", reason)
            }
        }
    }

    fn last_updated(&self) -> String {
        let store = self.sync.store();
        match store.last_synced() {
            Some(at) => format!("last updated {} on {}", store.age_display(), format_date(&at)),
            None => "never updated".to_string(),
        }
    }

    pub fn users(&self) -> Vec<User> {
        self.sync.users()
    }

    pub fn user(&self, id: &str) -> Option<User> {
        self.sync.user(id)
    }
}
