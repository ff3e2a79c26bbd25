pub mod background;
pub mod element;
pub mod geometry;
pub mod style;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use background::{BackgroundAnchor, BackgroundSettings, OverlayPattern};
pub use element::ElementKey;
pub use geometry::{AspectRatio, CanvasSize, Position};
pub use style::{ShadowKind, TextAlign, TextRole, TextStyle};

use crate::color::DEFAULT_ACCENT;

/// Default overlay scrim opacity for new slides.
pub const DEFAULT_OVERLAY_OPACITY: f32 = 0.4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Professional,
    Witty,
    Inspirational,
    Educational,
}

impl Tone {
    pub fn all() -> &'static [Tone] {
        &[
            Tone::Professional,
            Tone::Witty,
            Tone::Inspirational,
            Tone::Educational,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Professional => "Professional",
            Self::Witty => "Witty",
            Self::Inspirational => "Inspirational",
            Self::Educational => "Educational",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::all()
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Invalid tone: {s}. Must be 'Professional', 'Witty', 'Inspirational', or 'Educational'."
                )
            })
    }
}

/// Named decorative container treatment applied across the whole project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetStyle {
    #[default]
    Standard,
    Minimalist,
    Card,
    Bold,
    Geometric,
}

impl PresetStyle {
    pub fn all() -> &'static [PresetStyle] {
        &[
            PresetStyle::Standard,
            PresetStyle::Minimalist,
            PresetStyle::Card,
            PresetStyle::Bold,
            PresetStyle::Geometric,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Minimalist => "minimalist",
            Self::Card => "card",
            Self::Bold => "bold",
            Self::Geometric => "geometric",
        }
    }
}

impl fmt::Display for PresetStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PresetStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetStyle::all()
            .iter()
            .copied()
            .find(|p| p.label() == s.trim())
            .ok_or_else(|| {
                format!(
                    "Invalid preset: {s}. Must be 'standard', 'minimalist', 'card', 'bold', or 'geometric'."
                )
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    TitleCenter,
    #[default]
    Split,
    TextOnly,
    Quote,
    Comparison,
    Chat,
}

impl Layout {
    pub fn all() -> &'static [Layout] {
        &[
            Layout::TitleCenter,
            Layout::Split,
            Layout::TextOnly,
            Layout::Quote,
            Layout::Comparison,
            Layout::Chat,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::TitleCenter => "title-center",
            Self::Split => "split",
            Self::TextOnly => "text-only",
            Self::Quote => "quote",
            Self::Comparison => "comparison",
            Self::Chat => "chat",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    #[default]
    Icon,
}

/// A floating decorative icon on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAsset {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: AssetKind,
    /// Icon name, e.g. `rocket_launch`.
    pub value: String,
    #[serde(default)]
    pub position: Position,
    pub size: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

/// A floating extra text block on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraText {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub position: Position,
    pub font_size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub width: f32,
    pub color: String,
}

/// One page of the carousel deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_content: Option<String>,
    /// Authoring hint from the AI service; never rendered.
    #[serde(default)]
    pub visual_description: String,
    /// Color token, gradient expression, or image reference.
    #[serde(default)]
    pub background_image: String,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub title_style: TextStyle,
    #[serde(default)]
    pub content_style: TextStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(flatten)]
    pub background: BackgroundSettings,
    #[serde(default)]
    pub enable_text_highlight: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(default)]
    pub additional_assets: Vec<AiAsset>,
    #[serde(default)]
    pub additional_texts: Vec<ExtraText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_position: Option<Position>,
}

impl Slide {
    /// A slide carrying only text; every presentation field at its default.
    pub fn with_text(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            second_content: None,
            visual_description: String::new(),
            background_image: String::new(),
            layout: Layout::default(),
            title_style: TextStyle::default(),
            content_style: TextStyle::default(),
            font_family: None,
            background: BackgroundSettings::default(),
            enable_text_highlight: false,
            highlight_color: None,
            highlight_opacity: None,
            corner_radius: None,
            border: None,
            additional_assets: Vec::new(),
            additional_texts: Vec::new(),
            title_position: None,
            content_position: None,
        }
    }

    pub fn font_family_or_default(&self) -> &str {
        self.font_family
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(style::DEFAULT_FONT_FAMILY)
    }

    pub fn style(&self, role: TextRole) -> &TextStyle {
        match role {
            TextRole::Title => &self.title_style,
            TextRole::Content => &self.content_style,
        }
    }

    pub fn style_mut(&mut self, role: TextRole) -> &mut TextStyle {
        match role {
            TextRole::Title => &mut self.title_style,
            TextRole::Content => &mut self.content_style,
        }
    }

    /// Stored position of a slide-level element. `None` for the brand block,
    /// unknown ids, and elements never moved.
    pub fn committed_position(&self, key: &ElementKey) -> Option<Position> {
        match key {
            ElementKey::Title => self.title_position,
            ElementKey::Content => self.content_position,
            ElementKey::Brand => None,
            ElementKey::Asset(id) => self
                .additional_assets
                .iter()
                .find(|a| &a.id == id)
                .map(|a| a.position),
            ElementKey::Extra(id) => self
                .additional_texts
                .iter()
                .find(|t| &t.id == id)
                .map(|t| t.position),
        }
    }

    /// Write a slide-level element position. Returns false when nothing matched.
    pub fn set_position(&mut self, key: &ElementKey, position: Position) -> bool {
        match key {
            ElementKey::Title => {
                self.title_position = Some(position);
                true
            }
            ElementKey::Content => {
                self.content_position = Some(position);
                true
            }
            ElementKey::Brand => false,
            ElementKey::Asset(id) => match self.additional_assets.iter_mut().find(|a| &a.id == id) {
                Some(asset) => {
                    asset.position = position;
                    true
                }
                None => false,
            },
            ElementKey::Extra(id) => match self.additional_texts.iter_mut().find(|t| &t.id == id) {
                Some(text) => {
                    text.position = position;
                    true
                }
                None => false,
            },
        }
    }

    /// Every draggable element key on this slide, brand excluded.
    pub fn element_keys(&self) -> Vec<ElementKey> {
        let mut keys = vec![ElementKey::Title, ElementKey::Content];
        keys.extend(
            self.additional_assets
                .iter()
                .map(|a| ElementKey::Asset(a.id.clone())),
        );
        keys.extend(
            self.additional_texts
                .iter()
                .map(|t| ElementKey::Extra(t.id.clone())),
        );
        keys
    }
}

/// Brand overlay shown on every slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandConfig {
    pub enabled: bool,
    pub handle: String,
    pub website: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            handle: "@yourbrand".to_string(),
            website: "www.yourwebsite.com".to_string(),
            avatar_url: None,
            position: None,
        }
    }
}

/// The whole deck plus presentation and brand settings.
///
/// Slides are shared between history snapshots; a mutation replaces only
/// the slides it touches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub topic: String,
    pub tone: Tone,
    /// Slide count asked of the generator. The deck length is [`Project::slide_count`].
    #[serde(default)]
    pub requested_slides: usize,
    pub language: String,
    pub slides: Vec<Arc<Slide>>,
    pub theme_id: String,
    pub primary_color: String,
    #[serde(default)]
    pub preset_style: PresetStyle,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default)]
    pub brand_config: BrandConfig,
    pub last_saved: DateTime<Utc>,
}

impl Project {
    /// A fresh project around generated slides, with the editor defaults.
    pub fn new(
        topic: impl Into<String>,
        tone: Tone,
        requested_slides: usize,
        language: impl Into<String>,
        slides: Vec<Slide>,
    ) -> Self {
        Self {
            id: Utc::now().timestamp_millis().to_string(),
            topic: topic.into(),
            tone,
            requested_slides,
            language: language.into(),
            slides: slides.into_iter().map(Arc::new).collect(),
            theme_id: "modern-blue".to_string(),
            primary_color: DEFAULT_ACCENT.to_string(),
            preset_style: PresetStyle::default(),
            aspect_ratio: AspectRatio::default(),
            brand_config: BrandConfig::default(),
            last_saved: Utc::now(),
        }
    }

    /// Deck length, always derived from the slide sequence.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide_index(&self, id: &str) -> Option<usize> {
        self.slides.iter().position(|s| s.id == id)
    }

    pub fn slide(&self, id: &str) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == id).map(|s| s.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_json_shape() {
        let mut slide = Slide::with_text("s1", "Hello", "World");
        slide.layout = Layout::TitleCenter;
        slide.background.bg_overlay_opacity = Some(0.4);
        let json = serde_json::to_value(&slide).unwrap();
        assert_eq!(json["layout"], "title-center");
        assert_eq!(json["bgOverlayOpacity"], 0.4f32 as f64);
        assert!(json.get("titlePosition").is_none());
    }

    #[test]
    fn test_slide_deserializes_minimal_object() {
        let slide: Slide =
            serde_json::from_str(r##"{"id":"a","title":"T","content":"C","backgroundImage":"#111318"}"##)
                .unwrap();
        assert_eq!(slide.layout, Layout::Split);
        assert!(slide.additional_assets.is_empty());
        assert_eq!(slide.background_image, "#111318");
    }

    #[test]
    fn test_set_position_by_identity() {
        let mut slide = Slide::with_text("s", "t", "c");
        slide.additional_assets.push(AiAsset {
            id: "a1".into(),
            kind: AssetKind::Icon,
            value: "rocket".into(),
            position: Position::new(50.0, 50.0),
            size: 64.0,
            color: None,
            rotation: None,
            z_index: None,
        });
        let key = ElementKey::Asset("a1".into());
        assert!(slide.set_position(&key, Position::new(1.0, 2.0)));
        assert_eq!(slide.committed_position(&key), Some(Position::new(1.0, 2.0)));
        assert!(!slide.set_position(&ElementKey::Asset("nope".into()), Position::ORIGIN));
        assert!(!slide.set_position(&ElementKey::Brand, Position::ORIGIN));
    }

    #[test]
    fn test_tone_parse() {
        assert_eq!("witty".parse::<Tone>().unwrap(), Tone::Witty);
        assert!("sarcastic".parse::<Tone>().is_err());
    }

    #[test]
    fn test_project_slide_count_tracks_sequence() {
        let project = Project::new(
            "Topic",
            Tone::Professional,
            5,
            "English",
            vec![Slide::with_text("a", "t", "c")],
        );
        assert_eq!(project.slide_count(), 1);
        assert_eq!(project.requested_slides, 5);
    }
}
