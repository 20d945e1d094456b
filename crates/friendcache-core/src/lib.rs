//! Core library for friendcache.
//!
//! Fetches a remote friend directory, keeps a persisted copy of it and
//! serves that copy as the single source of truth, falling back to it when
//! the network is unavailable.
//!
//! - `api`: remote fetcher (`ApiClient`)
//! - `cache`: local store (`UserStore`)
//! - `sync`: cache synchronizer (`CacheSync`)

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod sync;
pub mod utils;

pub use api::{ApiClient, FetchError};
pub use cache::{StoreError, UserStore};
pub use config::Config;
pub use models::{Friend, User};
pub use sync::{CacheSync, SyncEvent, SyncState, UserSource};
