//! Color math: CSS color parsing, relative luminance, contrast ratio and
//! dominant-color extraction.

use serde::Serialize;

/// Accent used when no better color can be derived.
pub const DEFAULT_ACCENT: &str = "#135bec";

/// WCAG AA threshold for normal-size text.
pub const MIN_READABLE_CONTRAST: f64 = 4.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with alpha set from a 0..1 opacity.
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: (opacity.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    pub fn opacity(&self) -> f32 {
        self.a as f32 / 255.0
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parse the CSS color forms the editor produces and the AI service emits.
///
/// Returns `None` for anything else (including `var(...)` references).
pub fn parse_css_color(value: &str) -> Option<Rgba> {
    let v = value.trim().to_ascii_lowercase();
    if let Some(hex) = v.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = v
        .strip_prefix("rgba(")
        .or_else(|| v.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }
        let channel = |s: &str| s.parse::<f32>().ok().map(|c| c.clamp(0.0, 255.0).round() as u8);
        let mut color = Rgba::rgb(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);
        if let Some(alpha) = parts.get(3) {
            color = color.with_opacity(alpha.parse::<f32>().ok()?);
        }
        return Some(color);
    }
    match v.as_str() {
        "white" => Some(Rgba::WHITE),
        "black" => Some(Rgba::BLACK),
        "transparent" => Some(Rgba::TRANSPARENT),
        _ => None,
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
    match hex.len() {
        3 => Some(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Rgba {
            a: nibble(3)?,
            ..Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)
        }),
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba {
            a: byte(6)?,
            ..Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)
        }),
        _ => None,
    }
}

/// Relative luminance (sRGB). Unparsable colors count as black.
pub fn luminance(color: &str) -> f64 {
    let c = parse_css_color(color).unwrap_or(Rgba::BLACK);
    relative_luminance(c)
}

pub fn relative_luminance(c: Rgba) -> f64 {
    let linear = |v: u8| {
        let v = v as f64 / 255.0;
        if v <= 0.03928 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };
    linear(c.r) * 0.2126 + linear(c.g) * 0.7152 + linear(c.b) * 0.0722
}

pub fn contrast_ratio(a: &str, b: &str) -> f64 {
    let l1 = luminance(a) + 0.05;
    let l2 = luminance(b) + 0.05;
    l1.max(l2) / l1.min(l2)
}

/// Black or white, whichever reads better on `background`.
pub fn readable_on(background: Rgba) -> Rgba {
    let l = relative_luminance(background);
    let on_white = (1.05) / (l + 0.05);
    let on_black = (l + 0.05) / 0.05;
    if on_white >= on_black {
        Rgba::WHITE
    } else {
        Rgba::BLACK
    }
}

/// Channel-wise mean of opaque colors.
pub fn average(colors: &[Rgba]) -> Option<Rgba> {
    if colors.is_empty() {
        return None;
    }
    let n = colors.len() as u32;
    let sum = colors.iter().fold((0u32, 0u32, 0u32), |acc, c| {
        (acc.0 + c.r as u32, acc.1 + c.g as u32, acc.2 + c.b as u32)
    });
    Some(Rgba::rgb((sum.0 / n) as u8, (sum.1 / n) as u8, (sum.2 / n) as u8))
}

/// Average color of a logo or photo, as `#rrggbb`.
///
/// Samples every 10th pixel and skips mostly transparent ones.
pub fn dominant_color(image: &image::RgbaImage) -> String {
    let mut r = 0u64;
    let mut g = 0u64;
    let mut b = 0u64;
    let mut count = 0u64;
    for pixel in image.pixels().step_by(10) {
        let [pr, pg, pb, pa] = pixel.0;
        if pa < 128 {
            continue;
        }
        r += pr as u64;
        g += pg as u64;
        b += pb as u64;
        count += 1;
    }
    if count == 0 {
        return DEFAULT_ACCENT.to_string();
    }
    Rgba::rgb((r / count) as u8, (g / count) as u8, (b / count) as u8).to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_css_color("#fff"), Some(Rgba::WHITE));
        assert_eq!(parse_css_color("#135BEC"), Some(Rgba::rgb(0x13, 0x5b, 0xec)));
        assert_eq!(parse_css_color("#00000080").unwrap().a, 0x80);
        assert_eq!(parse_css_color("#12345"), None);
        assert_eq!(parse_css_color("#zzzzzz"), None);
    }

    #[test]
    fn test_parse_rgb_functions() {
        assert_eq!(parse_css_color("rgb(1, 2, 3)"), Some(Rgba::rgb(1, 2, 3)));
        let c = parse_css_color("rgba(255,255,255,0.9)").unwrap();
        assert_eq!((c.r, c.g, c.b), (255, 255, 255));
        assert!((229..=230).contains(&c.a));
        assert_eq!(parse_css_color("var(--primary-color)"), None);
    }

    #[test]
    fn test_luminance_extremes() {
        assert!((luminance("#ffffff") - 1.0).abs() < 1e-9);
        assert!(luminance("#000000").abs() < 1e-9);
        assert!(luminance("not a color").abs() < 1e-9);
    }

    #[test]
    fn test_contrast_ratio() {
        assert!((contrast_ratio("#ffffff", "#000000") - 21.0).abs() < 1e-6);
        assert!((contrast_ratio("#135bec", "#135bec") - 1.0).abs() < 1e-9);
        assert!(contrast_ratio("#ffffff", "#ffe600") < MIN_READABLE_CONTRAST);
        assert!(contrast_ratio("#ffffff", "#111318") >= MIN_READABLE_CONTRAST);
    }

    #[test]
    fn test_readable_on() {
        assert_eq!(readable_on(Rgba::BLACK), Rgba::WHITE);
        assert_eq!(readable_on(Rgba::rgb(0xff, 0xe6, 0x00)), Rgba::BLACK);
    }

    #[test]
    fn test_dominant_color_skips_transparent_pixels() {
        let mut img = image::RgbaImage::new(10, 10);
        for (i, p) in img.pixels_mut().enumerate() {
            *p = if i % 20 == 0 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 255, 0])
            };
        }
        assert_eq!(dominant_color(&img), "#ff0000");
    }

    #[test]
    fn test_dominant_color_of_fully_transparent_image() {
        let img = image::RgbaImage::new(4, 4);
        assert_eq!(dominant_color(&img), DEFAULT_ACCENT);
    }
}
