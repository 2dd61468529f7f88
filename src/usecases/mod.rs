//! Application use cases. Orchestrate domain logic via ports.

pub mod theme_service;

pub use theme_service::{StageTimeouts, ThemeService};
