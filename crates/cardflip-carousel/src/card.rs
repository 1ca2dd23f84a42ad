//! Card data supplied by the host, and the theme resolved from it.

use std::path::Path;

use cardflip_engine::paint::Color;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One double-sided card. Immutable input owned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    pub id: String,
    pub front_title: String,
    pub back_content: String,
    /// Small upper-cased caption on the front face.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<CardTheme>,
}

impl CardData {
    pub fn new(
        id: impl Into<String>,
        front_title: impl Into<String>,
        back_content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            front_title: front_title.into(),
            back_content: back_content.into(),
            label: None,
            theme: None,
        }
    }

    pub fn with_theme(mut self, theme: CardTheme) -> Self {
        self.theme = Some(theme);
        self
    }
}

/// Visual overrides as CSS-style hex strings (`#rgb`, `#rrggbb`, `#rrggbbaa`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardTheme {
    /// Solid front background; the front uses the gradient when unset.
    pub front_background: Option<String>,
    pub back_gradient_start: Option<String>,
    pub back_gradient_end: Option<String>,
    pub text_color: Option<String>,
}

/// Colors used to paint a card, with every override applied.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ResolvedTheme {
    pub front_background: Option<Color>,
    pub gradient_start: Color,
    pub gradient_end: Color,
    pub text_color: Color,
}

impl Default for ResolvedTheme {
    fn default() -> Self {
        Self {
            front_background: None,
            gradient_start: Color::from_srgb_u8(0x3b, 0x82, 0xf6, 0xff),
            gradient_end: Color::from_srgb_u8(0x25, 0x63, 0xeb, 0xff),
            text_color: Color::WHITE,
        }
    }
}

impl ResolvedTheme {
    /// Applies `theme` over the defaults. Unparseable colors keep the default.
    pub fn resolve(theme: Option<&CardTheme>) -> Self {
        let mut out = Self::default();
        let Some(theme) = theme else {
            return out;
        };

        out.front_background = theme.front_background.as_deref().and_then(parse_color);
        if let Some(c) = theme.back_gradient_start.as_deref().and_then(parse_color) {
            out.gradient_start = c;
        }
        if let Some(c) = theme.back_gradient_end.as_deref().and_then(parse_color) {
            out.gradient_end = c;
        }
        if let Some(c) = theme.text_color.as_deref().and_then(parse_color) {
            out.text_color = c;
        }
        out
    }
}

fn parse_color(s: &str) -> Option<Color> {
    match Color::from_hex(s) {
        Ok(c) => Some(c),
        Err(e) => {
            log::warn!("ignoring theme color: {e}");
            None
        }
    }
}

/// Which side of a card.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Face {
    Front,
    Back,
}

impl Face {
    pub const BOTH: [Face; 2] = [Face::Front, Face::Back];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Face::Front => 0,
            Face::Back => 1,
        }
    }
}

/// Parses a JSON array of cards.
pub fn parse_deck(json: &str) -> Result<Vec<CardData>, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

/// Reads a JSON card deck from disk.
pub fn load_deck(path: impl AsRef<Path>) -> Result<Vec<CardData>, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_deck(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_uses_camel_case_keys() {
        let deck = parse_deck(
            r##"[
                { "id": "a", "frontTitle": "Care Planning", "backContent": "Body" },
                { "id": "b", "frontTitle": "T", "backContent": "B",
                  "theme": { "backGradientStart": "#000000", "textColor": "#ff0000" } }
            ]"##,
        )
        .unwrap();

        assert_eq!(deck.len(), 2);
        assert_eq!(deck[0].front_title, "Care Planning");
        assert!(deck[0].theme.is_none());
        let theme = deck[1].theme.as_ref().unwrap();
        assert_eq!(theme.back_gradient_start.as_deref(), Some("#000000"));
        assert_eq!(theme.back_gradient_end, None);
    }

    #[test]
    fn theme_overrides_only_what_it_names() {
        let theme = CardTheme {
            text_color: Some("#000".into()),
            back_gradient_end: Some("not a color".into()),
            ..CardTheme::default()
        };
        let r = ResolvedTheme::resolve(Some(&theme));
        let d = ResolvedTheme::default();

        assert_eq!(r.text_color, Color::BLACK);
        assert_eq!(r.gradient_start, d.gradient_start);
        assert_eq!(r.gradient_end, d.gradient_end);
        assert_eq!(r.front_background, None);
    }

    #[test]
    fn missing_field_is_an_error() {
        assert!(parse_deck(r#"[{ "id": "a", "frontTitle": "x" }]"#).is_err());
    }
}
