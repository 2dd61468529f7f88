//! Browser adapter. Headless Chromium screenshots of the theme builder.

pub mod chromium;

pub use chromium::{CaptureSettings, ChromiumRenderer, ClipRect};
