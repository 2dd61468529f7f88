//! Main pipeline: resolve accounts -> latest post -> colors -> theme URL -> screenshot -> quote post.
//!
//! - Accounts are processed sequentially, in resolver order
//! - Unsupported color counts are an explicit skip, never an error
//! - Only post creation is isolated per account; every earlier failure (upload included) aborts the run
//! - Every port call runs under a stage timeout

use crate::domain::{
    Account, AccountOutcome, ColorSet, DomainError, PaletteShape, Post, RenderedImage, RunReport,
    build_theme_url, compose_reply, extract_colors,
};
use crate::ports::{ImageStorePort, RendererPort, SocialPublisher, SocialReader};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Time budget per stage. Applied to each individual port call.
#[derive(Debug, Clone, Copy)]
pub struct StageTimeouts {
    pub social: Duration,
    pub render: Duration,
    pub storage: Duration,
}

impl Default for StageTimeouts {
    fn default() -> Self {
        Self {
            social: Duration::from_secs(30),
            render: Duration::from_secs(60),
            storage: Duration::from_secs(10),
        }
    }
}

/// Theme service. Owns the injected ports for one run.
pub struct ThemeService {
    reader: Arc<dyn SocialReader>,
    publisher: Arc<dyn SocialPublisher>,
    renderer: Arc<dyn RendererPort>,
    store: Arc<dyn ImageStorePort>,
    theme_base_url: String,
    timeouts: StageTimeouts,
}

impl ThemeService {
    pub fn new(
        reader: Arc<dyn SocialReader>,
        publisher: Arc<dyn SocialPublisher>,
        renderer: Arc<dyn RendererPort>,
        store: Arc<dyn ImageStorePort>,
        theme_base_url: String,
        timeouts: StageTimeouts,
    ) -> Self {
        Self {
            reader,
            publisher,
            renderer,
            store,
            theme_base_url,
            timeouts,
        }
    }

    /// Run once over the configured usernames. Resolution happens in a single batch call.
    pub async fn run(&self, usernames: &[String]) -> Result<RunReport, DomainError> {
        let accounts = with_timeout(
            "resolve accounts",
            self.timeouts.social,
            self.reader.resolve_accounts(usernames),
        )
        .await?;
        info!(
            requested = usernames.len(),
            resolved = accounts.len(),
            "resolved source accounts"
        );

        let mut report = RunReport::default();
        for account in accounts {
            let outcome = self.process_account(&account).await?;
            info!(username = %account.username, outcome = %outcome, "account processed");
            report.push(account, outcome);
        }
        Ok(report)
    }

    /// Full pipeline for one account.
    pub async fn process_account(&self, account: &Account) -> Result<AccountOutcome, DomainError> {
        let post = with_timeout(
            "fetch latest post",
            self.timeouts.social,
            self.reader.latest_post(account),
        )
        .await?;
        let Some(post) = post else {
            info!(username = %account.username, "no original post on timeline");
            return Ok(AccountOutcome::SkippedNoPost);
        };

        let colors = extract_colors(&post.text);
        match colors.shape() {
            PaletteShape::Primary | PaletteShape::Full => {}
            PaletteShape::Empty => {
                debug!(post_id = %post.id, "post has no colors");
                return Ok(AccountOutcome::SkippedNoColors);
            }
            PaletteShape::Unsupported(n) => {
                info!(post_id = %post.id, count = n, "unsupported color count, skipping");
                return Ok(AccountOutcome::SkippedUnsupportedCount(n));
            }
        }

        let url = build_theme_url(&self.theme_base_url, &colors)
            .ok_or_else(|| DomainError::Render("empty color set".into()))?;
        let image = self.render_theme(&url, &post.id).await?;

        self.publish(&post, &colors, &image).await
    }

    /// Capture the theme page and write it as `<post_id>.png`.
    async fn render_theme(&self, url: &str, post_id: &str) -> Result<RenderedImage, DomainError> {
        info!(url, "screenshotting theme");
        let bytes = with_timeout("render", self.timeouts.render, self.renderer.capture(url)).await?;
        let path = with_timeout(
            "save screenshot",
            self.timeouts.storage,
            self.store.save_png(post_id, &bytes),
        )
        .await?;
        info!(path = %path.display(), bytes = bytes.len(), "screenshot saved");
        Ok(RenderedImage {
            path,
            bytes,
            url: url.to_string(),
        })
    }

    /// Upload, then quote post. Only post creation is isolated: an upload failure aborts the run,
    /// a post failure is reported in the outcome.
    async fn publish(
        &self,
        post: &Post,
        colors: &ColorSet,
        image: &RenderedImage,
    ) -> Result<AccountOutcome, DomainError> {
        let text = compose_reply(colors, &image.url);
        let media_id = with_timeout(
            "upload media",
            self.timeouts.social,
            self.publisher.upload_png(image),
        )
        .await?;

        let result = with_timeout(
            "create post",
            self.timeouts.social,
            self.publisher
                .create_quote_post(&text, std::slice::from_ref(&media_id), &post.id),
        )
        .await;

        Ok(match result {
            Ok(published) => {
                info!(post_id = %published.post_id, quoted = %post.id, "posted theme");
                AccountOutcome::Published {
                    source_post_id: post.id.clone(),
                    post_id: published.post_id,
                }
            }
            Err(e) => {
                warn!(quoted = %post.id, error = %e, "error posting theme");
                AccountOutcome::PublishFailed {
                    reason: e.to_string(),
                }
            }
        })
    }
}

/// Bounds a port call. Expiry maps to `DomainError::Timeout` for the named stage.
async fn with_timeout<T>(
    stage: &'static str,
    limit: Duration,
    fut: impl Future<Output = Result<T, DomainError>>,
) -> Result<T, DomainError> {
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res,
        Err(_) => Err(DomainError::Timeout { stage, limit }),
    }
}
