//! Port traits. API boundaries for the hexagon.
//!
//! - Outbound: Called by application into infrastructure (social API, browser, filesystem)

pub mod outbound;

pub use outbound::{ImageStorePort, RendererPort, SocialPublisher, SocialReader};
