//! Wiring & DI. Entry point: bootstrap adapters, inject into the theme service, run once.
//! No business logic here. Meant to be invoked by an external scheduler (cron).

use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use theme_echo::adapters::browser::{CaptureSettings, ChromiumRenderer};
use theme_echo::adapters::persistence::FsImageStore;
use theme_echo::adapters::twitter::{DryRunPublisher, TwitterClient};
use theme_echo::ports::{ImageStorePort, RendererPort, SocialPublisher, SocialReader};
use theme_echo::shared::config::AppConfig;
use theme_echo::usecases::{StageTimeouts, ThemeService};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load()?;
    let Some(creds) = cfg.twitter_credentials() else {
        anyhow::bail!(
            "Set TWITTER_CONSUMER_KEY, TWITTER_CONSUMER_SECRET, TWITTER_ACCESS_TOKEN and \
             TWITTER_ACCESS_TOKEN_SECRET (env or .env)"
        );
    };

    // --- One authenticated client for the whole run (reads + writes) ---
    let twitter = Arc::new(TwitterClient::new(creds));
    let reader: Arc<dyn SocialReader> = Arc::clone(&twitter) as Arc<dyn SocialReader>;
    let publisher: Arc<dyn SocialPublisher> = if cfg.is_dry_run() {
        warn!("THEME_ECHO_DRY_RUN is set, replies will be logged instead of posted");
        Arc::new(DryRunPublisher::new())
    } else {
        twitter as Arc<dyn SocialPublisher>
    };

    // --- Renderer + screenshot store ---
    let renderer: Arc<dyn RendererPort> = Arc::new(
        ChromiumRenderer::new(CaptureSettings::default())
            .with_executable(cfg.chrome_executable.as_deref().map(PathBuf::from))
            .with_no_sandbox(cfg.no_sandbox()),
    );
    let screenshots_dir = cfg.screenshots_dir_or_default();
    info!(path = %screenshots_dir, "screenshot directory");
    let store: Arc<dyn ImageStorePort> = Arc::new(FsImageStore::new(&screenshots_dir));

    let timeouts = StageTimeouts {
        social: cfg.social_timeout(),
        render: cfg.render_timeout(),
        storage: cfg.storage_timeout(),
    };
    info!(
        social_secs = timeouts.social.as_secs(),
        render_secs = timeouts.render.as_secs(),
        storage_secs = timeouts.storage.as_secs(),
        "stage timeouts"
    );

    let service = ThemeService::new(
        reader,
        publisher,
        renderer,
        store,
        cfg.theme_base_url_or_default(),
        timeouts,
    );

    // --- Run ---
    let usernames = cfg.usernames_or_default();
    info!(usernames = ?usernames, "polling accounts");
    let report = service.run(&usernames).await?;

    info!(
        accounts = report.outcomes.len(),
        published = report.published_count(),
        "run complete"
    );
    Ok(())
}
