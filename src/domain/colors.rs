//! Color extraction from free-text posts.

use crate::domain::{Color, ColorSet};
use once_cell::sync::Lazy;
use regex::Regex;

static HASH_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)#[0-9a-f]{6}").expect("valid hash color regex"));
static HEX_LITERAL_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)0x[0-9a-f]{6}").expect("valid 0x color regex"));

/// Extracts colors from post text, in order of appearance.
///
/// `#rrggbb` takes precedence: if the text contains any `#`, only that style is
/// considered. Otherwise `0xrrggbb` tokens are rewritten to `#rrggbb`. Mixed styles
/// in a single post are not supported.
pub fn extract_colors(text: &str) -> ColorSet {
    if text.contains('#') {
        let colors = HASH_COLOR
            .find_iter(text)
            .map(|m| Color::from_hash_form(m.as_str()))
            .collect();
        return ColorSet::new(colors);
    }
    if text.contains("0x") {
        let colors = HEX_LITERAL_COLOR
            .find_iter(text)
            .map(|m| Color::from_hash_form(&format!("#{}", &m.as_str()[2..])))
            .collect();
        return ColorSet::new(colors);
    }
    ColorSet::default()
}
