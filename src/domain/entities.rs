//! Domain entities. Pure data structures for the core business.
//!
//! No Twitter/browser types here; adapters map into these.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A source account on the social platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub username: String,
}

/// A single post fetched fresh for this run. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// RGB color in canonical `#rrggbb` form (lowercase).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(String);

impl Color {
    /// Canonicalizes a `#`-prefixed six digit hex string. No validation beyond lowercasing;
    /// callers obtain colors from the extractor, which only yields regex-shaped input.
    pub(crate) fn from_hash_form(raw: &str) -> Self {
        Self(raw.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex digits without the leading `#`.
    pub fn hex(&self) -> &str {
        self.0.strip_prefix('#').unwrap_or(&self.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a set of colors maps onto a theme. Only `Primary` and `Full` are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteShape {
    Empty,
    /// Exactly one color.
    Primary,
    /// Exactly five colors: primary, secondary, tertiary + 2 custom.
    Full,
    Unsupported(usize),
}

/// Ordered colors extracted from one post. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorSet(Vec<Color>);

impl ColorSet {
    pub fn new(colors: Vec<Color>) -> Self {
        Self(colors)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.0
    }

    pub fn primary(&self) -> Option<&Color> {
        self.0.first()
    }

    pub fn secondary(&self) -> Option<&Color> {
        self.0.get(1)
    }

    pub fn tertiary(&self) -> Option<&Color> {
        self.0.get(2)
    }

    /// Colors after the tertiary slot.
    pub fn custom(&self) -> &[Color] {
        self.0.get(3..).unwrap_or(&[])
    }

    pub fn shape(&self) -> PaletteShape {
        match self.0.len() {
            0 => PaletteShape::Empty,
            1 => PaletteShape::Primary,
            5 => PaletteShape::Full,
            n => PaletteShape::Unsupported(n),
        }
    }
}

/// Screenshot written to disk for one post.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    /// Theme URL the screenshot was taken from.
    pub url: String,
}

/// The reply post created by the publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    pub post_id: String,
}

/// What happened to one account during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountOutcome {
    Published {
        source_post_id: String,
        post_id: String,
    },
    /// Account has no original (non-reshared) post.
    SkippedNoPost,
    SkippedNoColors,
    SkippedUnsupportedCount(usize),
    /// Post creation failed; the run continued with the next account.
    PublishFailed { reason: String },
}

impl fmt::Display for AccountOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Published { post_id, .. } => write!(f, "published {}", post_id),
            Self::SkippedNoPost => f.write_str("skipped (no post)"),
            Self::SkippedNoColors => f.write_str("skipped (no colors)"),
            Self::SkippedUnsupportedCount(n) => write!(f, "skipped ({} colors)", n),
            Self::PublishFailed { reason } => write!(f, "publish failed: {}", reason),
        }
    }
}

/// Per-account outcomes, in processing order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<(Account, AccountOutcome)>,
}

impl RunReport {
    pub fn push(&mut self, account: Account, outcome: AccountOutcome) {
        self.outcomes.push((account, outcome));
    }

    pub fn published_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, AccountOutcome::Published { .. }))
            .count()
    }
}
