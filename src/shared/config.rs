//! Application configuration. API credentials, source accounts, paths, stage timeouts.

use serde::Deserialize;
use std::time::Duration;

/// Accounts polled when THEME_ECHO_USERNAMES is not set.
pub const DEFAULT_USERNAMES: &[&str] = &["everycolorbot", "EveryPalette"];

/// Default directory for rendered screenshots.
pub const DEFAULT_SCREENSHOTS_DIR: &str = "./screenshots";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Comma-separated source usernames. Read from THEME_ECHO_USERNAMES.
    #[serde(default)]
    pub usernames: Option<String>,

    /// Output directory for screenshots. Read from THEME_ECHO_SCREENSHOTS_DIR.
    #[serde(default)]
    pub screenshots_dir: Option<String>,

    /// Theme generator page. Read from THEME_ECHO_THEME_BASE_URL.
    #[serde(default)]
    pub theme_base_url: Option<String>,

    /// Render and log replies instead of posting them. Read from THEME_ECHO_DRY_RUN.
    #[serde(default)]
    pub dry_run: Option<bool>,

    /// Timeout per social API call (default 30). Read from THEME_ECHO_SOCIAL_TIMEOUT_SECS.
    #[serde(default)]
    pub social_timeout_secs: Option<u64>,

    /// Timeout per screenshot, browser launch included (default 60). Read from THEME_ECHO_RENDER_TIMEOUT_SECS.
    #[serde(default)]
    pub render_timeout_secs: Option<u64>,

    /// Timeout per screenshot write (default 10). Read from THEME_ECHO_STORAGE_TIMEOUT_SECS.
    #[serde(default)]
    pub storage_timeout_secs: Option<u64>,

    // ─────────────────────────────────────────────────────────────────────────
    // Browser
    // ─────────────────────────────────────────────────────────────────────────
    /// Chrome/Chromium binary. Autodetected when unset. Read from THEME_ECHO_CHROME_EXECUTABLE.
    #[serde(default)]
    pub chrome_executable: Option<String>,

    /// Launch Chromium with --no-sandbox (containers). Read from THEME_ECHO_NO_SANDBOX.
    #[serde(default)]
    pub no_sandbox: Option<bool>,

    // ─────────────────────────────────────────────────────────────────────────
    // Twitter credentials (OAuth 1.0a user context)
    // ─────────────────────────────────────────────────────────────────────────
    /// Read from TWITTER_CONSUMER_KEY.
    #[serde(default)]
    pub consumer_key: Option<String>,

    /// Read from TWITTER_CONSUMER_SECRET.
    #[serde(default)]
    pub consumer_secret: Option<String>,

    /// Read from TWITTER_ACCESS_TOKEN.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Read from TWITTER_ACCESS_TOKEN_SECRET.
    #[serde(default)]
    pub access_token_secret: Option<String>,
}

/// OAuth 1.0a credential set for the posting account.
#[derive(Debug, Clone)]
pub struct TwitterCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("THEME_ECHO"));
        if let Ok(path) = std::env::var("THEME_ECHO_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // Credentials keep the TWITTER_ names (no THEME_ECHO_ prefix) so an existing .env works as is
        if let Ok(s) = std::env::var("TWITTER_CONSUMER_KEY") {
            cfg.consumer_key = Some(s);
        }
        if let Ok(s) = std::env::var("TWITTER_CONSUMER_SECRET") {
            cfg.consumer_secret = Some(s);
        }
        if let Ok(s) = std::env::var("TWITTER_ACCESS_TOKEN") {
            cfg.access_token = Some(s);
        }
        if let Ok(s) = std::env::var("TWITTER_ACCESS_TOKEN_SECRET") {
            cfg.access_token_secret = Some(s);
        }
        Ok(cfg)
    }

    /// Source usernames. Falls back to DEFAULT_USERNAMES when unset or blank.
    pub fn usernames_or_default(&self) -> Vec<String> {
        let parsed = self
            .usernames
            .as_deref()
            .map(parse_usernames)
            .unwrap_or_default();
        if parsed.is_empty() {
            DEFAULT_USERNAMES.iter().map(|s| s.to_string()).collect()
        } else {
            parsed
        }
    }

    pub fn screenshots_dir_or_default(&self) -> String {
        self.screenshots_dir
            .clone()
            .unwrap_or_else(|| DEFAULT_SCREENSHOTS_DIR.to_string())
    }

    pub fn theme_base_url_or_default(&self) -> String {
        self.theme_base_url
            .clone()
            .unwrap_or_else(|| crate::domain::DEFAULT_THEME_BASE_URL.to_string())
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run.unwrap_or(false)
    }

    pub fn no_sandbox(&self) -> bool {
        self.no_sandbox.unwrap_or(false)
    }

    pub fn social_timeout(&self) -> Duration {
        Duration::from_secs(self.social_timeout_secs.unwrap_or(30))
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs.unwrap_or(60))
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_secs(self.storage_timeout_secs.unwrap_or(10))
    }

    /// Returns the credential set only when all four values are present and non-empty.
    pub fn twitter_credentials(&self) -> Option<TwitterCredentials> {
        let get = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        Some(TwitterCredentials {
            consumer_key: get(&self.consumer_key)?,
            consumer_secret: get(&self.consumer_secret)?,
            access_token: get(&self.access_token)?,
            access_token_secret: get(&self.access_token_secret)?,
        })
    }
}

/// Splits a comma-separated list, trimming whitespace and a leading `@`.
fn parse_usernames(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('@'))
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
