//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{Account, DomainError, Post, PublishResult, RenderedImage};
use std::path::PathBuf;

/// Read side of the social platform: account lookup and timelines.
#[async_trait::async_trait]
pub trait SocialReader: Send + Sync {
    /// Resolve usernames in a single batch lookup.
    ///
    /// Result follows the input order. Usernames that do not resolve are absent (not an error).
    async fn resolve_accounts(&self, usernames: &[String]) -> Result<Vec<Account>, DomainError>;

    /// Newest post of the account, excluding reshares. `None` when the timeline is empty.
    async fn latest_post(&self, account: &Account) -> Result<Option<Post>, DomainError>;
}

/// Write side of the social platform: media upload and post creation.
#[async_trait::async_trait]
pub trait SocialPublisher: Send + Sync {
    /// Upload a PNG and return the platform media id.
    async fn upload_png(&self, image: &RenderedImage) -> Result<String, DomainError>;

    /// Create a post quoting `quoted_post_id` with the given media attached.
    async fn create_quote_post(
        &self,
        text: &str,
        media_ids: &[String],
        quoted_post_id: &str,
    ) -> Result<PublishResult, DomainError>;
}

/// Headless renderer. Loads a URL and returns the fixed crop as PNG bytes.
#[async_trait::async_trait]
pub trait RendererPort: Send + Sync {
    async fn capture(&self, url: &str) -> Result<Vec<u8>, DomainError>;
}

/// Screenshot storage. Overwrites any previous image with the same id.
#[async_trait::async_trait]
pub trait ImageStorePort: Send + Sync {
    async fn save_png(&self, id: &str, bytes: &[u8]) -> Result<PathBuf, DomainError>;
}
