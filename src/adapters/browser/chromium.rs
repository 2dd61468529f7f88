//! Implements RendererPort with a headless Chromium driven over CDP (chromiumoxide).
//!
//! One browser per capture. The browser lives in a `BrowserSession` that is closed on every
//! path; if the capture future is dropped (stage timeout) the guard still tears it down.

use crate::domain::DomainError;
use crate::ports::RendererPort;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, Viewport};
use chromiumoxide::page::ScreenshotParams;
use futures::StreamExt;
use std::io::Cursor;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Region of the page to capture, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Viewport and crop used for every theme screenshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureSettings {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub device_scale_factor: f64,
    pub clip: ClipRect,
}

impl Default for CaptureSettings {
    /// The theme builder's preview panel at 2x.
    fn default() -> Self {
        Self {
            viewport_width: 1400,
            viewport_height: 1300,
            device_scale_factor: 2.0,
            clip: ClipRect {
                x: 760.0,
                y: 260.0,
                width: 625.0,
                height: 877.0,
            },
        }
    }
}

impl CaptureSettings {
    /// Pixel size of the PNG Chromium produces for the clip.
    pub fn expected_pixels(&self) -> (u32, u32) {
        (
            (self.clip.width * self.device_scale_factor).round() as u32,
            (self.clip.height * self.device_scale_factor).round() as u32,
        )
    }
}

pub struct ChromiumRenderer {
    settings: CaptureSettings,
    chrome_executable: Option<PathBuf>,
    no_sandbox: bool,
}

impl ChromiumRenderer {
    pub fn new(settings: CaptureSettings) -> Self {
        Self {
            settings,
            chrome_executable: None,
            no_sandbox: false,
        }
    }

    /// Use a specific Chrome/Chromium binary instead of autodetection.
    pub fn with_executable(mut self, path: Option<PathBuf>) -> Self {
        self.chrome_executable = path;
        self
    }

    /// Pass `--no-sandbox` (needed when running as root in containers).
    pub fn with_no_sandbox(mut self, no_sandbox: bool) -> Self {
        self.no_sandbox = no_sandbox;
        self
    }

    fn browser_config(&self) -> Result<BrowserConfig, DomainError> {
        let mut builder = BrowserConfig::builder()
            .window_size(self.settings.viewport_width, self.settings.viewport_height);
        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        if self.no_sandbox {
            builder = builder.no_sandbox();
        }
        builder
            .build()
            .map_err(|e| DomainError::Render(format!("browser config: {}", e)))
    }

    async fn capture_in(&self, browser: &Browser, url: &str) -> Result<Vec<u8>, DomainError> {
        let s = &self.settings;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| DomainError::Render(format!("new page: {}", e)))?;
        page.execute(SetDeviceMetricsOverrideParams::new(
            i64::from(s.viewport_width),
            i64::from(s.viewport_height),
            s.device_scale_factor,
            false,
        ))
        .await
        .map_err(|e| DomainError::Render(format!("set viewport: {}", e)))?;

        page.goto(url)
            .await
            .map_err(|e| DomainError::Render(format!("navigate: {}", e)))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| DomainError::Render(format!("wait for navigation: {}", e)))?;

        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .clip(Viewport {
                x: s.clip.x,
                y: s.clip.y,
                width: s.clip.width,
                height: s.clip.height,
                scale: 1.0,
            })
            .build();
        page.screenshot(params)
            .await
            .map_err(|e| DomainError::Render(format!("screenshot: {}", e)))
    }
}

#[async_trait]
impl RendererPort for ChromiumRenderer {
    async fn capture(&self, url: &str) -> Result<Vec<u8>, DomainError> {
        let session = BrowserSession::launch(self.browser_config()?).await?;
        let result = self.capture_in(&session.browser, url).await;
        session.close().await;
        let bytes = result?;

        let expected = self.settings.expected_pixels();
        match png_dimensions(&bytes) {
            Some(actual) if actual == expected => {
                debug!(width = actual.0, height = actual.1, "captured PNG")
            }
            Some(actual) => warn!(
                expected = ?expected,
                actual = ?actual,
                "captured PNG has unexpected size"
            ),
            None => warn!(bytes = bytes.len(), "captured data is not a readable PNG"),
        }
        Ok(bytes)
    }
}

/// Launched browser plus the task driving its CDP connection.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    async fn launch(config: BrowserConfig) -> Result<Self, DomainError> {
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| DomainError::Render(format!("launch browser: {}", e)))?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "CDP handler event error");
                }
            }
        });
        Ok(Self { browser, handler })
    }

    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "browser close failed");
        }
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "waiting for browser exit failed");
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Browser's own Drop kills the child process.
        self.handler.abort();
    }
}

/// Width and height from a PNG header, `None` if the bytes are not a PNG.
pub fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::with_format(Cursor::new(bytes), image::ImageFormat::Png)
        .into_dimensions()
        .ok()
}
