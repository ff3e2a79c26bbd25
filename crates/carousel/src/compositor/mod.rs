//! Turns a slide plus project-level presentation settings into a
//! [`RenderPlan`]: every coordinate, color and style decided, nothing left
//! for the painter to infer.
//!
//! [`resolve`] is pure. The same inputs always produce an equal plan, which
//! keeps the live drag preview from flickering.

pub mod background;
pub mod icons;
pub mod layout;
pub mod text;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::color::{self, Rgba};
use crate::model::{
    AspectRatio, BrandConfig, CanvasSize, ElementKey, Position, PresetStyle, Project, Slide,
    TextRole,
};
use crate::theme::ThemeContext;

pub use background::{BackgroundLayer, FilterChain, Overlay};
pub use layout::{BrandBlock, Composition, Container, FloatingElement, FloatingKind, Frame};
pub use text::{Highlight, TextBlock, TextShadow};

/// Project-level inputs to [`resolve`].
#[derive(Debug, Clone, Copy)]
pub struct PresentationSettings<'a> {
    pub preset: PresetStyle,
    pub aspect: AspectRatio,
    pub brand: &'a BrandConfig,
    pub theme: &'a ThemeContext,
    /// Live drag positions. Entries here win over committed positions.
    pub live: Option<&'a BTreeMap<ElementKey, Position>>,
}

impl<'a> PresentationSettings<'a> {
    pub fn for_project(project: &'a Project, theme: &'a ThemeContext) -> Self {
        Self {
            preset: project.preset_style,
            aspect: project.aspect_ratio,
            brand: &project.brand_config,
            theme,
            live: None,
        }
    }

    pub fn with_live(mut self, live: &'a BTreeMap<ElementKey, Position>) -> Self {
        self.live = if live.is_empty() { None } else { Some(live) };
        self
    }

    fn position_of(&self, key: &ElementKey, committed: Option<Position>) -> Position {
        self.live
            .and_then(|live| live.get(key).copied())
            .unwrap_or_else(|| Position::or_origin(committed))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub slide_id: String,
    pub canvas: CanvasSize,
    pub font_family: String,
    pub accent: Rgba,
    pub background: BackgroundLayer,
    pub overlay: Overlay,
    pub frame: Frame,
    pub composition: Composition,
    pub title: TextBlock,
    /// Absent for title-center slides.
    pub content: Option<TextBlock>,
    /// Paint order, lowest first.
    pub floating: Vec<FloatingElement>,
    pub brand: Option<BrandBlock>,
    /// Contrast of plain white text on the darkened background.
    pub white_contrast: f64,
}

impl RenderPlan {
    pub fn low_contrast(&self) -> bool {
        self.white_contrast < color::MIN_READABLE_CONTRAST
    }
}

pub fn resolve(slide: &Slide, settings: &PresentationSettings<'_>) -> RenderPlan {
    let accent = settings.theme.accent.as_str();

    let canvas = settings.aspect.canvas_size();
    let background = BackgroundLayer::resolve(slide, accent);
    let overlay = Overlay::resolve(slide);
    let composition = Composition::resolve(slide, settings.preset);
    let frame = Frame::resolve(slide, settings.preset);

    let title = text::resolve_block(
        slide,
        TextRole::Title,
        settings.preset,
        settings.position_of(&ElementKey::Title, slide.title_position),
    );
    let content = composition.show_content.then(|| {
        text::resolve_block(
            slide,
            TextRole::Content,
            settings.preset,
            settings.position_of(&ElementKey::Content, slide.content_position),
        )
    });

    let floating =
        layout::floating_elements(slide, |key, committed| settings.position_of(key, Some(committed)));
    let brand = BrandBlock::resolve(
        settings.brand,
        settings.position_of(&ElementKey::Brand, settings.brand.position),
    );
    let white_contrast = background::white_text_contrast(&background, &overlay, accent);

    RenderPlan {
        slide_id: slide.id.clone(),
        canvas,
        font_family: slide.font_family_or_default().to_string(),
        accent: color::parse_css_color(accent).unwrap_or(Rgba::rgb(0x13, 0x5b, 0xec)),
        background,
        overlay,
        frame,
        composition,
        title,
        content,
        floating,
        brand,
        white_contrast,
    }
}
