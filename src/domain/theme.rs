//! Theme URL and reply text. Pure functions of a ColorSet.

use crate::domain::{Color, ColorSet};

/// Material Theme Builder custom-theme page.
pub const DEFAULT_THEME_BASE_URL: &str =
    "https://material-foundation.github.io/material-theme-builder/#/custom";

/// Trailing flag asking the builder for its shareable view.
const SHARE_FLAG: &str = "mods=share";

/// First line of every reply.
const REPLY_HEADER: &str = "Generated @materialdesign Theme 🎨";

/// Builds the theme generator URL. Returns `None` for an empty set.
///
/// Works for any non-empty cardinality: secondary and tertiary are added when present,
/// every color after the tertiary becomes `custom-<i>:<hex>:1`.
pub fn build_theme_url(base_url: &str, colors: &ColorSet) -> Option<String> {
    let primary = colors.primary()?;
    let mut url = format!("{}?primary={}", base_url, primary.hex());
    if let Some(secondary) = colors.secondary() {
        url.push_str(&format!("&secondary={}", secondary.hex()));
    }
    if let Some(tertiary) = colors.tertiary() {
        url.push_str(&format!("&tertiary={}", tertiary.hex()));
    }
    let custom = colors.custom();
    if !custom.is_empty() {
        let list = custom
            .iter()
            .enumerate()
            .map(|(i, c)| format!("custom-{}:{}:1", i, c.hex()))
            .collect::<Vec<_>>()
            .join(",");
        url.push_str(&format!("&customColors={}", list));
    }
    url.push('&');
    url.push_str(SHARE_FLAG);
    Some(url)
}

/// Composes the quote post body: header, color lines, theme URL.
pub fn compose_reply(colors: &ColorSet, url: &str) -> String {
    let mut lines: Vec<String> = vec![REPLY_HEADER.to_string(), String::new()];
    if let Some(primary) = colors.primary() {
        lines.push(format!("Primary Color: {}", primary));
    }
    if colors.len() > 1 {
        if let Some(secondary) = colors.secondary() {
            lines.push(format!("Secondary Color: {}", secondary));
        }
        if let Some(tertiary) = colors.tertiary() {
            lines.push(format!("Tertiary Color: {}", tertiary));
        }
        let custom = colors
            .custom()
            .iter()
            .map(Color::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Custom Colors: {}", custom));
    }
    lines.push(String::new());
    lines.push(url.to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extract_colors;

    const FIVE: &str = "#ff0000 #00ff00 #0000ff #111111 #222222";

    #[test]
    fn test_single_color_url() {
        let url = build_theme_url(DEFAULT_THEME_BASE_URL, &extract_colors("#FF0000")).unwrap();
        assert_eq!(
            url,
            "https://material-foundation.github.io/material-theme-builder/#/custom?primary=ff0000&mods=share"
        );
        assert!(!url.contains("secondary"));
        assert!(!url.contains("tertiary"));
        assert!(!url.contains("customColors"));
    }

    #[test]
    fn test_five_color_url() {
        let url = build_theme_url(DEFAULT_THEME_BASE_URL, &extract_colors(FIVE)).unwrap();
        assert!(url.contains(
            "primary=ff0000&secondary=00ff00&tertiary=0000ff&customColors=custom-0:111111:1,custom-1:222222:1"
        ));
        assert!(url.ends_with("&mods=share"));
    }

    #[test]
    fn test_url_is_deterministic() {
        let colors = extract_colors(FIVE);
        assert_eq!(
            build_theme_url("https://x.test/", &colors),
            build_theme_url("https://x.test/", &colors)
        );
    }

    #[test]
    fn test_intermediate_cardinalities() {
        let two = build_theme_url("b", &extract_colors("#aaaaaa #bbbbbb")).unwrap();
        assert_eq!(two, "b?primary=aaaaaa&secondary=bbbbbb&mods=share");

        let four =
            build_theme_url("b", &extract_colors("#aaaaaa #bbbbbb #cccccc #dddddd")).unwrap();
        assert_eq!(
            four,
            "b?primary=aaaaaa&secondary=bbbbbb&tertiary=cccccc&customColors=custom-0:dddddd:1&mods=share"
        );
    }

    #[test]
    fn test_empty_set_has_no_url() {
        assert!(build_theme_url("b", &ColorSet::default()).is_none());
    }

    #[test]
    fn test_reply_single_color() {
        let text = compose_reply(&extract_colors("#ABCDEF"), "https://t.test");
        assert_eq!(
            text,
            "Generated @materialdesign Theme 🎨\n\nPrimary Color: #abcdef\n\nhttps://t.test"
        );
    }

    #[test]
    fn test_reply_five_colors() {
        let text = compose_reply(&extract_colors(FIVE), "https://t.test");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Generated @materialdesign Theme 🎨",
                "",
                "Primary Color: #ff0000",
                "Secondary Color: #00ff00",
                "Tertiary Color: #0000ff",
                "Custom Colors: #111111, #222222",
                "",
                "https://t.test",
            ]
        );
    }
}
