//! Title and body text blocks: style resolution, shadow table, highlight.

use serde::Serialize;

use crate::color::{self, Rgba};
use crate::model::style::ResolvedTextStyle;
use crate::model::{ElementKey, Position, PresetStyle, ShadowKind, Slide, TextRole};

/// Inner padding of a highlighted block (horizontal, vertical).
pub const HIGHLIGHT_PADDING: (f32, f32) = (12.0, 4.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextShadow {
    pub offset_x: f32,
    pub offset_y: f32,
    pub blur: f32,
    pub color: Rgba,
}

impl TextShadow {
    /// Fixed treatment per shadow kind. Glow takes the text's own color.
    pub fn for_kind(kind: ShadowKind, text_color: Rgba) -> Option<TextShadow> {
        match kind {
            ShadowKind::None => None,
            ShadowKind::Soft => Some(TextShadow {
                offset_x: 0.0,
                offset_y: 4.0,
                blur: 12.0,
                color: Rgba::BLACK.with_opacity(0.5),
            }),
            ShadowKind::Hard => Some(TextShadow {
                offset_x: 3.0,
                offset_y: 3.0,
                blur: 0.0,
                color: Rgba::BLACK,
            }),
            ShadowKind::Glow => Some(TextShadow {
                offset_x: 0.0,
                offset_y: 0.0,
                blur: 16.0,
                color: text_color.with_opacity(0.8),
            }),
        }
    }

    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px rgba({},{},{},{:.2})",
            self.offset_x,
            self.offset_y,
            self.blur,
            self.color.r,
            self.color.g,
            self.color.b,
            self.color.opacity()
        )
    }
}

/// Marked-block presentation used instead of a shadow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Highlight {
    pub background: Rgba,
    pub padding: (f32, f32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub key: ElementKey,
    /// Text as painted, uppercase already applied.
    pub text: String,
    pub style: ResolvedTextStyle,
    pub color: Rgba,
    pub shadow: Option<TextShadow>,
    pub highlight: Option<Highlight>,
    pub offset: Position,
}

/// Highlight fill and text color for a role.
///
/// Without a custom color the title reads white on black and the body black
/// on white.
fn highlight_colors(slide: &Slide, role: TextRole) -> (Rgba, Rgba) {
    let custom = slide
        .highlight_color
        .as_deref()
        .and_then(color::parse_css_color);
    match custom {
        Some(c) => {
            let fill = c.with_opacity(slide.highlight_opacity.unwrap_or(1.0));
            (fill, color::readable_on(c))
        }
        None => match role {
            TextRole::Title => (Rgba::BLACK, Rgba::WHITE),
            TextRole::Content => (Rgba::WHITE, Rgba::BLACK),
        },
    }
}

pub fn resolve_block(
    slide: &Slide,
    role: TextRole,
    preset: PresetStyle,
    offset: Position,
) -> TextBlock {
    let stored = slide.style(role);
    let style = stored.resolve(role, slide.font_family_or_default());
    let raw = match role {
        TextRole::Title => &slide.title,
        TextRole::Content => &slide.content,
    };
    let text = if style.uppercase {
        raw.to_uppercase()
    } else {
        raw.clone()
    };
    let key = match role {
        TextRole::Title => ElementKey::Title,
        TextRole::Content => ElementKey::Content,
    };

    if slide.enable_text_highlight {
        let (fill, ink) = highlight_colors(slide, role);
        return TextBlock {
            key,
            text,
            style,
            color: ink,
            shadow: None,
            highlight: Some(Highlight {
                background: fill,
                padding: HIGHLIGHT_PADDING,
            }),
            offset,
        };
    }

    // The bold preset sits text on a white card; unset colors go black.
    let color = if preset == PresetStyle::Bold && stored.color.is_none() {
        Rgba::BLACK
    } else {
        color::parse_css_color(&style.color).unwrap_or(Rgba::WHITE)
    };
    TextBlock {
        key,
        text,
        shadow: TextShadow::for_kind(style.shadow, color),
        style,
        color,
        highlight: None,
        offset,
    }
}
