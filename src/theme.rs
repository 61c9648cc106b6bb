//! Style palettes for highlighted code
//!
//! Provides YAML-based palettes with compile-time embedded builtins and
//! user-defined palettes from the config directory. A palette is the
//! `getTokenStyle` half of the bundled highlighter: it turns a token's
//! classification into a [`TokenStyle`].
//!
//! Palette loading priority:
//! 1. User config: `~/.config/fenced/themes/{id}.yaml`
//! 2. Embedded: Built-in palettes compiled into binary

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::syntax::{TokenStyle, PLAIN};

// Embed palette YAML files at compile time
pub const DEFAULT_DARK_YAML: &str = include_str!("../themes/default-dark.yaml");
pub const GITHUB_LIGHT_YAML: &str = include_str!("../themes/github-light.yaml");

/// Class every styled token carries
pub const BASE_CLASS: &str = "fenced-hl";

/// A built-in palette entry
pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "default-dark")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in palettes
pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: "default-dark",
        yaml: DEFAULT_DARK_YAML,
    },
    BuiltinTheme {
        id: "github-light",
        yaml: GITHUB_LIGHT_YAML,
    },
];

/// Load a palette from a YAML file
pub fn from_file(path: &Path) -> Result<StylePalette, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read theme file {}: {}", path.display(), e))?;
    StylePalette::from_yaml(&content)
}

/// Load palette by id with priority: user → builtin
pub fn load_theme(id: &str) -> Result<StylePalette, String> {
    if let Some(user_dir) = crate::config::config_path(crate::config::THEMES_DIR) {
        let user_path = user_dir.join(format!("{}.yaml", id));
        if user_path.exists() {
            tracing::info!("Loading user theme from {}", user_path.display());
            return from_file(&user_path);
        }
    }

    tracing::info!("Loading builtin theme: {}", id);
    StylePalette::from_builtin(id)
}

/// RGB color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Parse from "#RRGGBB" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        if s.len() != 6 || !s.is_ascii() {
            return Err(format!("Invalid color format: {}", s));
        }
        Ok(Color {
            r: u8::from_str_radix(&s[0..2], 16).map_err(|e| e.to_string())?,
            g: u8::from_str_radix(&s[2..4], 16).map_err(|e| e.to_string())?,
            b: u8::from_str_radix(&s[4..6], 16).map_err(|e| e.to_string())?,
        })
    }

    /// Format as lowercase "#rrggbb"
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Raw palette data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeData {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub foreground: String,
    #[serde(default)]
    pub syntax: HashMap<String, SyntaxStyleData>,
}

/// One classification's style (raw strings from YAML)
#[derive(Debug, Clone, Deserialize)]
pub struct SyntaxStyleData {
    pub color: String,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub bold: bool,
}

/// Resolved style for one classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxStyle {
    pub color: Color,
    pub italic: bool,
    pub bold: bool,
}

/// Resolved palette with parsed colors
#[derive(Debug, Clone)]
pub struct StylePalette {
    pub name: String,
    pub foreground: Color,
    styles: HashMap<String, SyntaxStyle>,
}

impl StylePalette {
    /// Load palette from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let data: ThemeData =
            serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))?;
        Self::from_data(data)
    }

    /// Load a built-in palette by id
    pub fn from_builtin(id: &str) -> Result<Self, String> {
        let entry = BUILTIN_THEMES
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| format!("Unknown theme id: {}", id))?;
        Self::from_yaml(entry.yaml)
    }

    /// Convert raw palette data to resolved palette
    pub fn from_data(data: ThemeData) -> Result<Self, String> {
        let mut styles = HashMap::with_capacity(data.syntax.len());
        for (name, style) in data.syntax {
            let color = Color::from_hex(&style.color)
                .map_err(|e| format!("Bad color for `{}`: {}", name, e))?;
            styles.insert(
                name,
                SyntaxStyle {
                    color,
                    italic: style.italic,
                    bold: style.bold,
                },
            );
        }

        Ok(Self {
            name: data.name,
            foreground: Color::from_hex(&data.foreground)?,
            styles,
        })
    }

    /// Default dark palette (YAML-backed with Rust fallback)
    pub fn default_dark() -> Self {
        match Self::from_yaml(DEFAULT_DARK_YAML) {
            Ok(palette) => palette,
            Err(e) => {
                tracing::warn!("Builtin palette failed to parse: {}", e);
                Self {
                    name: "Default Dark".to_string(),
                    foreground: Color { r: 0xD4, g: 0xD4, b: 0xD4 },
                    styles: HashMap::new(),
                }
            }
        }
    }

    /// Find the style for a classification, walking up dotted parents
    /// (`keyword.control.import` → `keyword.control` → `keyword`)
    pub fn resolve(&self, classification: &str) -> Option<&SyntaxStyle> {
        let mut current = classification;
        loop {
            if let Some(style) = self.styles.get(current) {
                return Some(style);
            }
            let dot = current.rfind('.')?;
            current = &current[..dot];
        }
    }

    /// Display style for a token classification
    pub fn style_for(&self, classification: &str) -> TokenStyle {
        let classification = if classification.is_empty() {
            PLAIN
        } else {
            classification
        };

        let style = match self.resolve(classification) {
            Some(s) => {
                let mut css = format!("color: {}", s.color.to_hex());
                if s.italic {
                    css.push_str("; font-style: italic");
                }
                if s.bold {
                    css.push_str("; font-weight: bold");
                }
                css
            }
            None => format!("color: {}", self.foreground.to_hex()),
        };

        TokenStyle {
            style,
            classes: vec![
                BASE_CLASS.to_string(),
                format!("{}-{}", BASE_CLASS, classification.replace('.', "-")),
            ],
        }
    }
}

impl Default for StylePalette {
    fn default() -> Self {
        Self::default_dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_palettes_parse() {
        for builtin in BUILTIN_THEMES {
            let palette = StylePalette::from_yaml(builtin.yaml);
            assert!(palette.is_ok(), "{} failed: {:?}", builtin.id, palette.err());
        }
    }

    #[test]
    fn test_style_for_known_classification() {
        let palette = StylePalette::default_dark();
        let style = palette.style_for("comment");
        assert_eq!(style.style, "color: #6a9955; font-style: italic");
        assert_eq!(style.classes, vec!["fenced-hl", "fenced-hl-comment"]);
    }

    #[test]
    fn test_style_falls_back_to_parent() {
        let palette = StylePalette::default_dark();
        assert_eq!(
            palette.style_for("keyword.control.import").style,
            palette.style_for("keyword").style
        );
        assert_eq!(
            palette.style_for("keyword.control.import").classes[1],
            "fenced-hl-keyword-control-import"
        );
    }

    #[test]
    fn test_unknown_classification_uses_foreground() {
        let palette = StylePalette::default_dark();
        assert_eq!(palette.style_for("text").style, "color: #d4d4d4");
        assert_eq!(palette.style_for("").classes[1], "fenced-hl-text");
    }

    #[test]
    fn test_color_hex_roundtrip() {
        let color = Color::from_hex("#1A2b3C").unwrap();
        assert_eq!(color, Color { r: 0x1A, g: 0x2B, b: 0x3C });
        assert_eq!(color.to_hex(), "#1a2b3c");
        assert!(Color::from_hex("#123").is_err());
    }

    #[test]
    fn test_unknown_builtin_is_error() {
        assert!(StylePalette::from_builtin("no-such-theme").is_err());
    }
}
