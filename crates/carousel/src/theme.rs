use serde::{Deserialize, Serialize};

use crate::color::DEFAULT_ACCENT;

/// Font families offered by the typography and theme editors.
pub const FONTS: &[&str] = &[
    "Inter",
    "Roboto",
    "Playfair Display",
    "Anton",
    "Bebas Neue",
    "Oswald",
    "Montserrat",
];

/// A named bundle of background, accent color and font.
///
/// Applying a theme copies these values into the project; later edits to
/// slides never flow back into the theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub description: String,
    pub preview_url: String,
    pub primary_color: String,
    pub font_family: String,
    pub bg_style: String,
}

impl Theme {
    fn builtin(
        id: &str,
        name: &str,
        description: &str,
        preview: u8,
        primary_color: &str,
        font_family: &str,
        bg_style: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            preview_url: format!("https://picsum.photos/300/400?random={preview}"),
            primary_color: primary_color.to_string(),
            font_family: font_family.to_string(),
            bg_style: bg_style.to_string(),
        }
    }

    /// The built-in catalog.
    pub fn catalog() -> Vec<Theme> {
        vec![
            Self::builtin(
                "modern-blue",
                "Modern Blue",
                "Clean lines & gradients",
                1,
                DEFAULT_ACCENT,
                "Inter",
                "linear-gradient(135deg, #1e3c72 0%, #2a5298 100%)",
            ),
            Self::builtin(
                "luxury-dark",
                "Luxury Dark",
                "Gold accents on black",
                2,
                "#d4af37",
                "Playfair Display",
                "#000000",
            ),
            Self::builtin(
                "pop-art",
                "Pop Art",
                "Bold borders & halftones",
                3,
                "#ff0055",
                "Anton",
                "#ffe600",
            ),
            Self::builtin(
                "minimal",
                "Minimal",
                "Ample whitespace",
                4,
                "#000000",
                "Inter",
                "#ffffff",
            ),
        ]
    }

    pub fn find(id: &str) -> Option<Theme> {
        Self::catalog().into_iter().find(|t| t.id == id)
    }

    /// Catalog entry for `id`, or the first built-in.
    pub fn find_or_default(id: &str) -> Theme {
        Self::find(id).unwrap_or_else(Self::default_theme)
    }

    pub fn default_theme() -> Theme {
        Self::catalog().remove(0)
    }

    /// Turn an edited copy into an ephemeral custom theme.
    pub fn into_custom(self) -> Theme {
        Theme {
            id: format!("custom-{}", chrono::Utc::now().timestamp_millis()),
            name: "Custom Theme".to_string(),
            ..self
        }
    }

    pub fn is_custom(&self) -> bool {
        self.id.starts_with("custom-")
    }
}

/// Presentation-wide values threaded to the compositor and renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeContext {
    pub accent: String,
}

impl ThemeContext {
    pub fn new(accent: impl Into<String>) -> Self {
        Self {
            accent: accent.into(),
        }
    }
}

impl Default for ThemeContext {
    fn default() -> Self {
        Self::new(DEFAULT_ACCENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_four_unique_builtins() {
        let catalog = Theme::catalog();
        assert_eq!(catalog.len(), 4);
        let mut ids: Vec<&str> = catalog.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
        assert!(catalog.iter().all(|t| !t.is_custom()));
    }

    #[test]
    fn test_find_or_default_falls_back_to_first() {
        assert_eq!(Theme::find_or_default("pop-art").font_family, "Anton");
        assert_eq!(Theme::find_or_default("missing").id, "modern-blue");
    }

    #[test]
    fn test_custom_theme_keeps_edits() {
        let mut edited = Theme::find_or_default("minimal");
        edited.primary_color = "#ff0000".into();
        let custom = edited.into_custom();
        assert!(custom.is_custom());
        assert_eq!(custom.name, "Custom Theme");
        assert_eq!(custom.primary_color, "#ff0000");
        assert_eq!(custom.bg_style, "#ffffff");
    }

    #[test]
    fn test_catalog_fonts_are_offered() {
        for theme in Theme::catalog() {
            assert!(FONTS.contains(&theme.font_family.as_str()));
        }
    }
}
