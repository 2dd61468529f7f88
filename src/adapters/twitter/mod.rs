//! Twitter adapters: signed HTTP client, response mapping, dry-run publisher.

pub mod client;
pub mod dry_run;
pub mod mapper;
pub mod oauth;

pub use client::TwitterClient;
pub use dry_run::DryRunPublisher;
