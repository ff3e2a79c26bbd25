//! Background values are one string field with several renderings. The kind
//! is sniffed from the content, never stored, so data produced by the AI
//! service and the theme catalog stays compatible.

use serde::{Deserialize, Serialize};

use crate::color::{self, Rgba};

/// Background of a slide created without any other hint.
pub const FALLBACK_BACKGROUND: &str = "#111318";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundKind {
    /// Sized with cover-fit: URL references, embedded data, gradients.
    ImageLike,
    FlatColor,
}

/// Classify a background value by the three content tests.
pub fn classify(value: &str) -> BackgroundKind {
    let v = value.trim_start();
    if v.starts_with("url") || v.starts_with("data:image") || v.contains("gradient") {
        BackgroundKind::ImageLike
    } else {
        BackgroundKind::FlatColor
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    pub color: Rgba,
    /// 0..1 along the gradient line.
    pub offset: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gradient {
    /// CSS angle: 0 points up, 90 points right.
    pub angle_deg: f32,
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    pub fn color_at(&self, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let Some(first) = self.stops.first() else {
            return Rgba::BLACK;
        };
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = (b.offset - a.offset).max(f32::EPSILON);
                let k = (t - a.offset) / span;
                let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * k).round() as u8;
                return Rgba {
                    r: mix(a.color.r, b.color.r),
                    g: mix(a.color.g, b.color.g),
                    b: mix(a.color.b, b.color.b),
                    a: mix(a.color.a, b.color.a),
                };
            }
        }
        self.stops[self.stops.len() - 1].color
    }
}

/// A background value decoded for painting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BackgroundFill {
    Color { color: Rgba },
    Gradient(Gradient),
    /// URL, file path, or `data:` URI.
    Image { source: String },
}

impl BackgroundFill {
    /// Decode `value`. An empty value paints the accent color.
    pub fn parse(value: &str, accent: &str) -> BackgroundFill {
        let v = value.trim();
        if v.is_empty() {
            return BackgroundFill::Color {
                color: color_or_default(accent),
            };
        }
        match classify(v) {
            BackgroundKind::FlatColor => BackgroundFill::Color {
                color: color::parse_css_color(v)
                    .or_else(|| color::parse_css_color(accent))
                    .unwrap_or(default_fill()),
            },
            BackgroundKind::ImageLike => {
                if v.starts_with("url") {
                    BackgroundFill::Image {
                        source: unwrap_url(v).to_string(),
                    }
                } else if v.starts_with("data:image") {
                    BackgroundFill::Image {
                        source: v.to_string(),
                    }
                } else {
                    match parse_gradient(v) {
                        Some(gradient) => BackgroundFill::Gradient(gradient),
                        None => BackgroundFill::Color {
                            color: color_or_default(accent),
                        },
                    }
                }
            }
        }
    }

    /// Single color standing in for the whole background, used by the
    /// contrast check. Images fall back to the accent.
    pub fn representative_color(&self, accent: &str) -> Rgba {
        match self {
            Self::Color { color } => *color,
            Self::Gradient(g) => {
                let colors: Vec<Rgba> = g.stops.iter().map(|s| s.color).collect();
                color::average(&colors).unwrap_or_else(|| color_or_default(accent))
            }
            Self::Image { .. } => color_or_default(accent),
        }
    }
}

fn default_fill() -> Rgba {
    Rgba::rgb(0x11, 0x13, 0x18)
}

fn color_or_default(value: &str) -> Rgba {
    color::parse_css_color(value)
        .or_else(|| color::parse_css_color(color::DEFAULT_ACCENT))
        .unwrap_or(default_fill())
}

/// `url('x.png')` → `x.png`.
fn unwrap_url(value: &str) -> &str {
    let inner = value
        .strip_prefix("url(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(value);
    inner.trim().trim_matches(|c| c == '\'' || c == '"')
}

fn parse_gradient(value: &str) -> Option<Gradient> {
    let open = value.find('(')?;
    let close = value.rfind(')')?;
    if close <= open {
        return None;
    }
    let parts = split_top_level(&value[open + 1..close]);

    let mut angle_deg = 180.0;
    let mut raw: Vec<(Rgba, Option<f32>)> = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        if i == 0 {
            if let Some(angle) = parse_angle(part) {
                angle_deg = angle;
                continue;
            }
        }
        let (color_str, offset) = split_stop(part);
        if let Some(c) = color::parse_css_color(color_str) {
            raw.push((c, offset));
        }
    }
    if raw.len() < 2 {
        return None;
    }

    let last = (raw.len() - 1) as f32;
    let stops = raw
        .into_iter()
        .enumerate()
        .map(|(i, (color, offset))| GradientStop {
            color,
            offset: offset.unwrap_or(i as f32 / last),
        })
        .collect();
    Some(Gradient { angle_deg, stops })
}

fn parse_angle(part: &str) -> Option<f32> {
    let p = part.trim();
    if let Some(deg) = p.strip_suffix("deg") {
        return deg.trim().parse().ok();
    }
    match p {
        "to top" => Some(0.0),
        "to top right" | "to right top" => Some(45.0),
        "to right" => Some(90.0),
        "to bottom right" | "to right bottom" => Some(135.0),
        "to bottom" => Some(180.0),
        "to bottom left" | "to left bottom" => Some(225.0),
        "to left" => Some(270.0),
        "to top left" | "to left top" => Some(315.0),
        _ => None,
    }
}

/// `#fff 40%` → (`#fff`, Some(0.4)).
fn split_stop(part: &str) -> (&str, Option<f32>) {
    let p = part.trim();
    if let Some((color, pos)) = p.rsplit_once(' ') {
        if let Some(pct) = pos.strip_suffix('%') {
            if let Ok(v) = pct.parse::<f32>() {
                return (color.trim(), Some((v / 100.0).clamp(0.0, 1.0)));
            }
        }
    }
    (p, None)
}

/// Split on commas that are not nested inside parentheses.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Where the background image is anchored inside the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundAnchor {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

impl BackgroundAnchor {
    pub fn all() -> &'static [BackgroundAnchor] {
        &[
            BackgroundAnchor::Center,
            BackgroundAnchor::Top,
            BackgroundAnchor::Bottom,
            BackgroundAnchor::Left,
            BackgroundAnchor::Right,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Fractional alignment (x, y) of the image inside the canvas.
    pub fn alignment(&self) -> (f32, f32) {
        match self {
            Self::Center => (0.5, 0.5),
            Self::Top => (0.5, 0.0),
            Self::Bottom => (0.5, 1.0),
            Self::Left => (0.0, 0.5),
            Self::Right => (1.0, 0.5),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayPattern {
    #[default]
    None,
    Grid,
    Dots,
}

impl OverlayPattern {
    pub fn all() -> &'static [OverlayPattern] {
        &[OverlayPattern::None, OverlayPattern::Grid, OverlayPattern::Dots]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Grid => "grid",
            Self::Dots => "dots",
        }
    }
}

/// Per-slide background post-processing. Unset fields take defaults at
/// composition time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_blur: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_brightness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_contrast: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_saturation: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_scale: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_position: Option<BackgroundAnchor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_overlay_opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay_pattern: Option<OverlayPattern>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_three_forms() {
        assert_eq!(classify("url('x.png')"), BackgroundKind::ImageLike);
        assert_eq!(
            classify("linear-gradient(135deg, #135bec 0%, #2ecc71 100%)"),
            BackgroundKind::ImageLike
        );
        assert_eq!(classify("#111318"), BackgroundKind::FlatColor);
        assert_eq!(
            classify("data:image/png;base64,AAAA"),
            BackgroundKind::ImageLike
        );
    }

    #[test]
    fn test_parse_gradient_with_offsets() {
        let fill = BackgroundFill::parse("linear-gradient(135deg, #135bec 0%, #2ecc71 100%)", "#000");
        let BackgroundFill::Gradient(g) = fill else {
            panic!("expected gradient");
        };
        assert_eq!(g.angle_deg, 135.0);
        assert_eq!(g.stops.len(), 2);
        assert_eq!(g.stops[0].color, Rgba::rgb(0x13, 0x5b, 0xec));
        assert_eq!(g.stops[1].offset, 1.0);
    }

    #[test]
    fn test_parse_gradient_with_nested_rgba_and_no_offsets() {
        let fill = BackgroundFill::parse(
            "linear-gradient(to right, rgba(0, 0, 0, 0.5), #fff, #000)",
            "#000",
        );
        let BackgroundFill::Gradient(g) = fill else {
            panic!("expected gradient");
        };
        assert_eq!(g.angle_deg, 90.0);
        assert_eq!(g.stops.len(), 3);
        assert_eq!(g.stops[1].offset, 0.5);
    }

    #[test]
    fn test_parse_url_and_data() {
        assert_eq!(
            BackgroundFill::parse("url('https://picsum.photos/seed/a/800/1000')", "#000"),
            BackgroundFill::Image {
                source: "https://picsum.photos/seed/a/800/1000".into()
            }
        );
        let data = "data:image/png;base64,AAAA";
        assert_eq!(
            BackgroundFill::parse(data, "#000"),
            BackgroundFill::Image {
                source: data.into()
            }
        );
    }

    #[test]
    fn test_empty_background_paints_accent() {
        assert_eq!(
            BackgroundFill::parse("", "#d4af37"),
            BackgroundFill::Color {
                color: Rgba::rgb(0xd4, 0xaf, 0x37)
            }
        );
    }

    #[test]
    fn test_gradient_color_at_midpoint() {
        let g = Gradient {
            angle_deg: 180.0,
            stops: vec![
                GradientStop {
                    color: Rgba::BLACK,
                    offset: 0.0,
                },
                GradientStop {
                    color: Rgba::WHITE,
                    offset: 1.0,
                },
            ],
        };
        let mid = g.color_at(0.5);
        assert!(mid.r == 127 || mid.r == 128);
        assert_eq!(g.color_at(2.0), Rgba::WHITE);
    }

    #[test]
    fn test_representative_color_of_gradient_is_average() {
        let fill = BackgroundFill::parse("linear-gradient(180deg, #000000 0%, #ffffff 100%)", "#000");
        assert_eq!(fill.representative_color("#000"), Rgba::rgb(127, 127, 127));
    }
}
