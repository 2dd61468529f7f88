//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Social API error: {0}")]
    Social(String),

    #[error("Render failed: {0}")]
    Render(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// A stage exceeded its time budget. The run is aborted unless the stage is post creation.
    #[error("{stage} timed out after {limit:?}")]
    Timeout {
        stage: &'static str,
        limit: Duration,
    },
}
