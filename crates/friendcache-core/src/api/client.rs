//! HTTP client for the remote friend directory.
//!
//! `ApiClient` wraps a `reqwest::Client` configured with a request timeout and
//! fetches the whole directory in one GET. There is no retry: the
//! synchronizer tries once per load and falls back to the cache on failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::debug;

use crate::models::User;
use crate::sync::UserSource;

use super::FetchError;

// ============================================================================
// Constants
// ============================================================================

/// Location of the sample directory payload
pub const DEFAULT_SOURCE_URL: &str = "https://www.hackingwithswift.com/samples/friendface.json";

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// API client for the friend directory.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    url: String,
}

impl ApiClient {
    /// Create a client for `url` with the given request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(FetchError::from_status(status, &body))
        }
    }

    /// Fetch and decode the full user directory
    pub async fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        let users: Vec<User> = serde_json::from_str(&text)?;

        debug!(url = %self.url, count = users.len(), "Users fetched");
        Ok(users)
    }
}

#[async_trait]
impl UserSource for ApiClient {
    async fn fetch(&self) -> Result<Vec<User>, FetchError> {
        self.fetch_users().await
    }
}

// ============================================================================
// Tests
// ============================================================================
