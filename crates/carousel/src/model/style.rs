use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_FONT_FAMILY: &str = "Inter";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn all() -> &'static [TextAlign] {
        &[TextAlign::Left, TextAlign::Center, TextAlign::Right]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowKind {
    #[default]
    None,
    Soft,
    Hard,
    Glow,
}

impl ShadowKind {
    pub fn all() -> &'static [ShadowKind] {
        &[
            ShadowKind::None,
            ShadowKind::Soft,
            ShadowKind::Hard,
            ShadowKind::Glow,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Soft => "soft",
            Self::Hard => "hard",
            Self::Glow => "glow",
        }
    }
}

/// Which text block of a slide a style belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextRole {
    Title,
    Content,
}

impl fmt::Display for TextRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => f.write_str("title"),
            Self::Content => f.write_str("content"),
        }
    }
}

/// Stored text style of one slide field. Unset fields take role defaults.
///
/// The same type doubles as a partial update: applying a style with only
/// `bold` set changes only `bold`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uppercase: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<ShadowKind>,
}

/// A text style with every field decided.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub uppercase: bool,
    pub color: String,
    pub font_size: f32,
    pub font_family: String,
    pub line_height: f32,
    pub letter_spacing: f32,
    pub align: TextAlign,
    pub shadow: ShadowKind,
}

impl ResolvedTextStyle {
    /// Documented defaults for a role.
    pub fn defaults(role: TextRole, font_family: &str) -> Self {
        match role {
            TextRole::Title => Self {
                bold: true,
                italic: false,
                underline: false,
                uppercase: false,
                color: "#ffffff".to_string(),
                font_size: 48.0,
                font_family: font_family.to_string(),
                line_height: 1.1,
                letter_spacing: 0.0,
                align: TextAlign::Left,
                shadow: ShadowKind::None,
            },
            TextRole::Content => Self {
                bold: false,
                italic: false,
                underline: false,
                uppercase: false,
                color: "rgba(255,255,255,0.9)".to_string(),
                font_size: 18.0,
                font_family: font_family.to_string(),
                line_height: 1.5,
                letter_spacing: 0.0,
                align: TextAlign::Left,
                shadow: ShadowKind::None,
            },
        }
    }
}

impl TextStyle {
    /// Fully populated style carrying the role defaults, used for freshly
    /// generated slides so the exported JSON shows every field.
    pub fn documented(role: TextRole) -> Self {
        let d = ResolvedTextStyle::defaults(role, DEFAULT_FONT_FAMILY);
        Self {
            bold: Some(d.bold),
            italic: Some(d.italic),
            underline: Some(d.underline),
            uppercase: Some(d.uppercase),
            color: Some(d.color),
            font_size: Some(d.font_size),
            font_family: None,
            line_height: Some(d.line_height),
            letter_spacing: Some(d.letter_spacing),
            text_align: Some(d.align),
            shadow: Some(d.shadow),
        }
    }

    /// Overlay every field that is set in `patch`.
    pub fn merge(&mut self, patch: &TextStyle) {
        fn take<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
            if let Some(v) = src {
                *dst = Some(v.clone());
            }
        }
        take(&mut self.bold, &patch.bold);
        take(&mut self.italic, &patch.italic);
        take(&mut self.underline, &patch.underline);
        take(&mut self.uppercase, &patch.uppercase);
        take(&mut self.color, &patch.color);
        take(&mut self.font_size, &patch.font_size);
        take(&mut self.font_family, &patch.font_family);
        take(&mut self.line_height, &patch.line_height);
        take(&mut self.letter_spacing, &patch.letter_spacing);
        take(&mut self.text_align, &patch.text_align);
        take(&mut self.shadow, &patch.shadow);
    }

    /// Substitute the role default for every unset field.
    ///
    /// `font_family` is the slide-level family used when the style names none.
    pub fn resolve(&self, role: TextRole, font_family: &str) -> ResolvedTextStyle {
        let d = ResolvedTextStyle::defaults(role, font_family);
        ResolvedTextStyle {
            bold: self.bold.unwrap_or(d.bold),
            italic: self.italic.unwrap_or(d.italic),
            underline: self.underline.unwrap_or(d.underline),
            uppercase: self.uppercase.unwrap_or(d.uppercase),
            color: self
                .color
                .clone()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(d.color),
            font_size: self.font_size.filter(|s| *s > 0.0).unwrap_or(d.font_size),
            font_family: self
                .font_family
                .clone()
                .filter(|f| !f.trim().is_empty())
                .unwrap_or(d.font_family),
            line_height: self.line_height.filter(|l| *l > 0.0).unwrap_or(d.line_height),
            letter_spacing: self.letter_spacing.unwrap_or(d.letter_spacing),
            align: self.text_align.unwrap_or(d.align),
            shadow: self.shadow.unwrap_or(d.shadow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_style_resolves_to_title_defaults() {
        let r = TextStyle::default().resolve(TextRole::Title, "Inter");
        assert!(r.bold);
        assert_eq!(r.font_size, 48.0);
        assert_eq!(r.line_height, 1.1);
        assert_eq!(r.align, TextAlign::Left);
        assert_eq!(r.shadow, ShadowKind::None);
    }

    #[test]
    fn test_empty_style_resolves_to_content_defaults() {
        let r = TextStyle::default().resolve(TextRole::Content, "Roboto");
        assert!(!r.bold);
        assert_eq!(r.font_size, 18.0);
        assert_eq!(r.line_height, 1.5);
        assert_eq!(r.font_family, "Roboto");
    }

    #[test]
    fn test_set_fields_win_over_defaults() {
        let style = TextStyle {
            font_size: Some(64.0),
            shadow: Some(ShadowKind::Glow),
            font_family: Some("Anton".into()),
            ..Default::default()
        };
        let r = style.resolve(TextRole::Title, "Inter");
        assert_eq!(r.font_size, 64.0);
        assert_eq!(r.shadow, ShadowKind::Glow);
        assert_eq!(r.font_family, "Anton");
        assert!(r.bold);
    }

    #[test]
    fn test_merge_only_touches_set_fields() {
        let mut style = TextStyle {
            bold: Some(true),
            font_size: Some(30.0),
            ..Default::default()
        };
        style.merge(&TextStyle {
            italic: Some(true),
            ..Default::default()
        });
        assert_eq!(style.bold, Some(true));
        assert_eq!(style.italic, Some(true));
        assert_eq!(style.font_size, Some(30.0));
    }

    #[test]
    fn test_serde_skips_unset_fields() {
        let style = TextStyle {
            text_align: Some(TextAlign::Center),
            ..Default::default()
        };
        let json = serde_json::to_string(&style).unwrap();
        assert_eq!(json, r#"{"textAlign":"center"}"#);
    }
}
