//! Dry-run publisher. Logs the would-be reply instead of posting it.
//!
//! Used when THEME_ECHO_DRY_RUN is set: accounts are still read and screenshots
//! still rendered, nothing is written to the platform.

use crate::domain::{DomainError, PublishResult, RenderedImage};
use crate::ports::SocialPublisher;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

pub struct DryRunPublisher {
    counter: AtomicU64,
}

impl DryRunPublisher {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for DryRunPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SocialPublisher for DryRunPublisher {
    async fn upload_png(&self, image: &RenderedImage) -> Result<String, DomainError> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        info!(
            path = %image.path.display(),
            bytes = image.bytes.len(),
            "[DRY RUN] would upload screenshot"
        );
        Ok(format!("dry-run-media-{}", n))
    }

    async fn create_quote_post(
        &self,
        text: &str,
        media_ids: &[String],
        quoted_post_id: &str,
    ) -> Result<PublishResult, DomainError> {
        info!(
            quoted = quoted_post_id,
            media = ?media_ids,
            "[DRY RUN] would post:\n{}",
            text
        );
        Ok(PublishResult {
            post_id: format!("dry-run-{}", quoted_post_id),
        })
    }
}
