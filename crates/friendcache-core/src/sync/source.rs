use async_trait::async_trait;

use crate::api::FetchError;
use crate::models::User;

/// Something that can produce the full user directory in one call.
///
/// `ApiClient` is the production implementation.
#[async_trait]
pub trait UserSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<User>, FetchError>;
}
