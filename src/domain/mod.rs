//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod colors;
pub mod entities;
pub mod errors;
pub mod theme;

pub use colors::extract_colors;
pub use entities::{
    Account, AccountOutcome, Color, ColorSet, PaletteShape, Post, PublishResult, RenderedImage,
    RunReport,
};
pub use errors::DomainError;
pub use theme::{DEFAULT_THEME_BASE_URL, build_theme_url, compose_reply};
