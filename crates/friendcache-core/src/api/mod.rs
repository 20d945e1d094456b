//! Remote fetcher for the friend directory.
//!
//! This module provides the `ApiClient`, which performs a single GET of the
//! configured JSON resource and decodes it into `User` records. It never
//! touches the local store; merging is the synchronizer's job.

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_SOURCE_URL};
pub use error::FetchError;
