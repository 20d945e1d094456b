//! Data models for the friend directory.
//!
//! These are the value records decoded from the remote JSON payload:
//!
//! - `User`: a directory entry with contact info, tags and friends
//! - `Friend`: a lightweight reference to another user (id + name)
//!
//! They are transient. The persisted copies live in `crate::cache`.

pub mod user;

pub use user::{Friend, User};
