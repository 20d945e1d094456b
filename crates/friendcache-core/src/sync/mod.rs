//! Cache synchronization core.
//!
//! `CacheSync` reconciles one remote fetch per application load against the
//! local `UserStore`:
//!
//! - the fetch runs in a spawned task and never touches the store
//! - its outcome comes back over a channel and is applied by the owner
//!   (`poll` / `wait`), so the store write and the observer notification
//!   happen together on the owner's task
//! - on failure the store is left alone and observers are told the cached
//!   data is being used
//!
//! Readers always go through `CacheSync::users`, i.e. the store.

pub mod event;
pub mod source;
pub mod synchronizer;

pub use event::{SyncEvent, SyncState};
pub use source::UserSource;
pub use synchronizer::CacheSync;
