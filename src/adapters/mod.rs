//! Infrastructure adapters. Implement outbound ports.
//!
//! Twitter, headless browser, filesystem. Map errors to DomainError.

pub mod browser;
pub mod persistence;
pub mod twitter;
