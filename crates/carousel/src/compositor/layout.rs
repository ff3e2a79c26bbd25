//! Composition, preset container treatments, floating elements and the
//! brand block.

use serde::Serialize;

use crate::color::{self, Rgba};
use crate::model::{BrandConfig, ElementKey, Layout, Position, PresetStyle, Slide, TextAlign};

use super::icons;
use super::text::TextShadow;

pub const TITLE_GAP: f32 = 16.0;
pub const DEFAULT_CORNER_RADIUS: f32 = 8.0;
pub const ASSET_Z: i32 = 20;
pub const EXTRA_TEXT_Z: i32 = 30;
pub const BRAND_Z: i32 = 40;
pub const EXTRA_TEXT_WEIGHT: u16 = 600;
pub const BRAND_PADDING: f32 = 24.0;
pub const BRAND_WEBSITE_OPACITY: f32 = 0.7;

/// Decorative panel drawn behind the text block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Container {
    None,
    Panel {
        fill: Rgba,
        border: Option<(f32, Rgba)>,
        corner_radius: f32,
        padding: f32,
        shadow: Option<TextShadow>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composition {
    /// Centered both ways, or anchored to the bottom-left.
    pub centered: bool,
    pub align: TextAlign,
    /// Inset from the canvas edge.
    pub padding: f32,
    pub title_gap: f32,
    pub container: Container,
    pub show_content: bool,
}

impl Composition {
    pub fn resolve(slide: &Slide, preset: PresetStyle) -> Self {
        let centered = matches!(slide.layout, Layout::TitleCenter | Layout::Quote)
            || preset == PresetStyle::Minimalist;
        let padding = match preset {
            PresetStyle::Card => 40.0,
            PresetStyle::Bold => 24.0,
            PresetStyle::Minimalist => 48.0,
            PresetStyle::Standard | PresetStyle::Geometric => 32.0,
        };
        let container = match preset {
            PresetStyle::Card => Container::Panel {
                fill: Rgba::WHITE.with_opacity(0.1),
                border: Some((1.0, Rgba::WHITE.with_opacity(0.2))),
                corner_radius: 24.0,
                padding: 32.0,
                shadow: Some(TextShadow {
                    offset_x: 0.0,
                    offset_y: 25.0,
                    blur: 50.0,
                    color: Rgba::BLACK.with_opacity(0.25),
                }),
            },
            PresetStyle::Bold => Container::Panel {
                fill: Rgba::WHITE,
                border: None,
                corner_radius: 0.0,
                padding: 24.0,
                shadow: Some(TextShadow {
                    offset_x: 12.0,
                    offset_y: 12.0,
                    blur: 0.0,
                    color: Rgba::BLACK,
                }),
            },
            _ => Container::None,
        };
        Self {
            centered,
            align: if centered {
                TextAlign::Center
            } else {
                TextAlign::Left
            },
            padding,
            title_gap: TITLE_GAP,
            container,
            show_content: slide.layout != Layout::TitleCenter,
        }
    }
}

/// Canvas outline: rounded corners and an optional border.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub corner_radius: f32,
    pub border: Option<(f32, Rgba)>,
}

impl Frame {
    pub fn resolve(slide: &Slide, preset: PresetStyle) -> Self {
        let slide_border = slide.border.as_ref().filter(|b| b.width > 0.0).map(|b| {
            (
                b.width,
                color::parse_css_color(&b.color).unwrap_or(Rgba::BLACK),
            )
        });
        let preset_border = (preset == PresetStyle::Bold).then_some((12.0, Rgba::BLACK));
        Self {
            corner_radius: slide
                .corner_radius
                .map(|r| r.max(0.0))
                .unwrap_or(DEFAULT_CORNER_RADIUS),
            border: slide_border.or(preset_border),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FloatingKind {
    Icon {
        name: String,
        glyph: &'static str,
        size: f32,
        color: Rgba,
        rotation: f32,
    },
    Text {
        text: String,
        font_size: f32,
        weight: u16,
        color: Rgba,
    },
}

/// An asset or extra text placed at its offset from the canvas origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloatingElement {
    pub key: ElementKey,
    pub kind: FloatingKind,
    pub offset: Position,
    pub z_index: i32,
}

/// Assets and extra texts in paint order. Ties keep list order.
pub fn floating_elements(
    slide: &Slide,
    position_of: impl Fn(&ElementKey, Position) -> Position,
) -> Vec<FloatingElement> {
    let mut out: Vec<FloatingElement> = Vec::new();
    for asset in &slide.additional_assets {
        let key = ElementKey::Asset(asset.id.clone());
        out.push(FloatingElement {
            offset: position_of(&key, asset.position),
            key,
            kind: FloatingKind::Icon {
                name: asset.value.clone(),
                glyph: icons::glyph_for(&asset.value),
                size: asset.size,
                color: asset
                    .color
                    .as_deref()
                    .and_then(color::parse_css_color)
                    .unwrap_or(Rgba::WHITE),
                rotation: asset.rotation.unwrap_or(0.0),
            },
            z_index: asset.z_index.unwrap_or(ASSET_Z),
        });
    }
    for extra in &slide.additional_texts {
        let key = ElementKey::Extra(extra.id.clone());
        out.push(FloatingElement {
            offset: position_of(&key, extra.position),
            key,
            kind: FloatingKind::Text {
                text: extra.text.clone(),
                font_size: extra.font_size,
                weight: EXTRA_TEXT_WEIGHT,
                color: Rgba::WHITE,
            },
            z_index: EXTRA_TEXT_Z,
        });
    }
    out.sort_by_key(|e| e.z_index);
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandBlock {
    pub handle: String,
    pub website: String,
    /// Letter shown in the avatar bubble when no avatar image is set.
    pub initial: String,
    pub avatar: Option<String>,
    pub offset: Position,
    pub padding: f32,
    pub website_opacity: f32,
    pub z_index: i32,
}

impl BrandBlock {
    pub fn resolve(brand: &BrandConfig, offset: Position) -> Option<Self> {
        if !brand.enabled {
            return None;
        }
        Some(Self {
            handle: brand.handle.clone(),
            website: brand.website.clone(),
            initial: brand_initial(&brand.handle),
            avatar: brand.avatar_url.clone().filter(|a| !a.is_empty()),
            offset,
            padding: BRAND_PADDING,
            website_opacity: BRAND_WEBSITE_OPACITY,
            z_index: BRAND_Z,
        })
    }
}

/// First letter after a leading `@`, uppercased.
fn brand_initial(handle: &str) -> String {
    handle
        .trim()
        .trim_start_matches('@')
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AiAsset, AssetKind, ExtraText};

    #[test]
    fn test_centered_variants() {
        let mut slide = Slide::with_text("s", "t", "c");
        slide.layout = Layout::Split;
        assert!(!Composition::resolve(&slide, PresetStyle::Standard).centered);
        assert!(Composition::resolve(&slide, PresetStyle::Minimalist).centered);
        slide.layout = Layout::Quote;
        assert!(Composition::resolve(&slide, PresetStyle::Card).centered);
        slide.layout = Layout::TitleCenter;
        let c = Composition::resolve(&slide, PresetStyle::Standard);
        assert!(c.centered);
        assert!(!c.show_content);
    }

    #[test]
    fn test_geometric_gets_default_treatment() {
        let slide = Slide::with_text("s", "t", "c");
        let c = Composition::resolve(&slide, PresetStyle::Geometric);
        assert_eq!(c.container, Container::None);
        assert_eq!(c.padding, 32.0);
    }

    #[test]
    fn test_bold_frame_border_unless_slide_overrides() {
        let mut slide = Slide::with_text("s", "t", "c");
        assert_eq!(
            Frame::resolve(&slide, PresetStyle::Bold).border,
            Some((12.0, Rgba::BLACK))
        );
        slide.border = Some(crate::model::Border {
            width: 2.0,
            color: "#ffffff".into(),
        });
        assert_eq!(
            Frame::resolve(&slide, PresetStyle::Bold).border,
            Some((2.0, Rgba::WHITE))
        );
        assert_eq!(Frame::resolve(&slide, PresetStyle::Standard).corner_radius, 8.0);
    }

    #[test]
    fn test_floating_order_respects_z_override() {
        let mut slide = Slide::with_text("s", "t", "c");
        slide.additional_texts.push(ExtraText {
            id: "x".into(),
            text: "note".into(),
            position: Position::ORIGIN,
            font_size: 24.0,
        });
        slide.additional_assets.push(AiAsset {
            id: "a".into(),
            kind: AssetKind::Icon,
            value: "rocket".into(),
            position: Position::new(5.0, 5.0),
            size: 64.0,
            color: None,
            rotation: None,
            z_index: None,
        });
        slide.additional_assets.push(AiAsset {
            id: "b".into(),
            kind: AssetKind::Icon,
            value: "star".into(),
            position: Position::ORIGIN,
            size: 32.0,
            color: Some("#ff0000".into()),
            rotation: Some(15.0),
            z_index: Some(50),
        });
        let elems = floating_elements(&slide, |_, p| p);
        let keys: Vec<String> = elems.iter().map(|e| e.key.to_string()).collect();
        assert_eq!(keys, vec!["asset-a", "extra-x", "asset-b"]);
        assert!(elems[2].z_index > BRAND_Z);
    }

    #[test]
    fn test_brand_block() {
        let brand = BrandConfig::default();
        let block = BrandBlock::resolve(&brand, Position::ORIGIN).unwrap();
        assert_eq!(block.initial, "Y");
        let disabled = BrandConfig {
            enabled: false,
            ..BrandConfig::default()
        };
        assert!(BrandBlock::resolve(&disabled, Position::ORIGIN).is_none());
    }
}
