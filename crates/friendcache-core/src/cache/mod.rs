//! Local store for offline data access.
//!
//! This module provides the `UserStore`, the persisted source of truth for
//! everything the front end displays. Users and friends are kept in two
//! id-unique tables inside one JSON file (`users.json`) in the cache
//! directory, wrapped in a `CachedData` envelope that records when the last
//! successful sync was written.
//!
//! Writes are upserts: a record whose id is already present is overwritten in
//! place, never duplicated. Nothing is ever evicted.

pub mod error;
pub mod record;
pub mod store;

pub use error::StoreError;
pub use record::{decode_tags, encode_tags, CachedFriend, CachedUser};
pub use store::{CachedData, UpsertSummary, UserStore};
