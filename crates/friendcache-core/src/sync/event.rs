use std::fmt;

/// Where the synchronizer is in the current load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Syncing,
    Synced,
    SyncFailedFallback,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncState::Idle => write!(f, "Idle"),
            SyncState::Syncing => write!(f, "Syncing"),
            SyncState::Synced => write!(f, "Synced"),
            SyncState::SyncFailedFallback => write!(f, "Using cached data"),
        }
    }
}

/// Notifications sent to observers after a sync outcome has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Fetched records were written to the store
    DataChanged {
        inserted: usize,
        updated: usize,
        total: usize,
    },
    /// The fetch failed; the store was not touched
    UsingCachedData { reason: String },
    /// The fetch succeeded but the store write failed; prior contents kept
    StoreWriteFailed { reason: String },
}

impl SyncEvent {
    /// Whether the front end should surface this prominently
    pub fn is_warning(&self) -> bool {
        matches!(self, SyncEvent::StoreWriteFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_store_failures_are_warnings() {
        assert!(SyncEvent::StoreWriteFailed { reason: "disk".into() }.is_warning());
        assert!(!SyncEvent::UsingCachedData { reason: "offline".into() }.is_warning());
        assert!(!SyncEvent::DataChanged { inserted: 1, updated: 0, total: 1 }.is_warning());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SyncState::SyncFailedFallback.to_string(), "Using cached data");
        assert_eq!(SyncState::Synced.to_string(), "Synced");
    }
}
