//! Background layer, filter chain and overlay scrim.

use serde::Serialize;

use crate::color::{self, Rgba};
use crate::model::background::{classify, BackgroundFill, BackgroundKind};
use crate::model::{BackgroundAnchor, OverlayPattern, Slide, DEFAULT_OVERLAY_OPACITY};

/// Base zoom applied under the filters so blurred edges stay off-canvas.
pub const DEFAULT_BACKGROUND_SCALE: f32 = 1.1;
pub const PATTERN_OPACITY: f32 = 0.1;
pub const PATTERN_CELL: f32 = 20.0;

/// Blur in pixels; the other three are percentages with 100 as identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterChain {
    pub blur: f32,
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
}

impl Default for FilterChain {
    fn default() -> Self {
        Self {
            blur: 0.0,
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
        }
    }
}

impl FilterChain {
    pub fn from_slide(slide: &Slide) -> Self {
        let d = Self::default();
        let bg = &slide.background;
        Self {
            blur: bg.bg_blur.unwrap_or(d.blur).max(0.0),
            brightness: bg.bg_brightness.unwrap_or(d.brightness).max(0.0),
            contrast: bg.bg_contrast.unwrap_or(d.contrast).max(0.0),
            saturation: bg.bg_saturation.unwrap_or(d.saturation).max(0.0),
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// CSS `filter` value, in application order.
    pub fn to_css(&self) -> String {
        format!(
            "blur({}px) brightness({}%) contrast({}%) saturate({}%)",
            self.blur, self.brightness, self.contrast, self.saturation
        )
    }

    /// Apply brightness, contrast and saturation to one color. Blur is
    /// spatial and left to the painter.
    pub fn apply(&self, c: Rgba) -> Rgba {
        let b = self.brightness / 100.0;
        let k = self.contrast / 100.0;
        let s = self.saturation / 100.0;
        let mut rgb = [c.r as f32, c.g as f32, c.b as f32].map(|v| v * b);
        for v in &mut rgb {
            *v = (*v - 127.5) * k + 127.5;
        }
        let gray = rgb[0] * 0.2126 + rgb[1] * 0.7152 + rgb[2] * 0.0722;
        let out = rgb.map(|v| (gray + (v - gray) * s).round().clamp(0.0, 255.0) as u8);
        Rgba {
            r: out[0],
            g: out[1],
            b: out[2],
            a: c.a,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackgroundLayer {
    /// Stored value the layer was decoded from.
    pub value: String,
    pub kind: BackgroundKind,
    pub fill: BackgroundFill,
    pub filter: FilterChain,
    pub scale: f32,
    pub anchor: BackgroundAnchor,
}

impl BackgroundLayer {
    pub fn resolve(slide: &Slide, accent: &str) -> Self {
        let value = slide.background_image.clone();
        Self {
            kind: classify(&value),
            fill: BackgroundFill::parse(&value, accent),
            filter: FilterChain::from_slide(slide),
            scale: slide
                .background
                .background_scale
                .filter(|s| *s > 0.0)
                .unwrap_or(DEFAULT_BACKGROUND_SCALE),
            anchor: slide.background.background_position.unwrap_or_default(),
            value,
        }
    }

    /// Cover-fit rectangle (x, y, w, h) of an image of `image_size` inside
    /// `canvas`, anchored and zoomed by `scale`.
    pub fn cover_rect(&self, image_size: (f32, f32), canvas: (f32, f32)) -> (f32, f32, f32, f32) {
        let (iw, ih) = image_size;
        let (cw, ch) = canvas;
        if iw <= 0.0 || ih <= 0.0 {
            return (0.0, 0.0, cw, ch);
        }
        let fit = (cw / iw).max(ch / ih) * self.scale;
        let (w, h) = (iw * fit, ih * fit);
        let (ax, ay) = self.anchor.alignment();
        ((cw - w) * ax, (ch - h) * ay, w, h)
    }
}

/// Black scrim above the background and below everything else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub color: Rgba,
    pub pattern: OverlayPattern,
    pub pattern_color: Rgba,
    pub pattern_cell: f32,
}

impl Overlay {
    pub fn resolve(slide: &Slide) -> Self {
        let opacity = slide
            .background
            .bg_overlay_opacity
            .unwrap_or(DEFAULT_OVERLAY_OPACITY)
            .clamp(0.0, 1.0);
        Self {
            color: Rgba::BLACK.with_opacity(opacity),
            pattern: slide.background.overlay_pattern.unwrap_or_default(),
            pattern_color: Rgba::WHITE.with_opacity(PATTERN_OPACITY),
            pattern_cell: PATTERN_CELL,
        }
    }

    pub fn opacity(&self) -> f32 {
        self.color.opacity()
    }
}

/// Color white text actually sits on: the background stand-in color after
/// filters, darkened by the overlay.
pub fn effective_backdrop(layer: &BackgroundLayer, overlay: &Overlay, accent: &str) -> Rgba {
    let base = layer.filter.apply(layer.fill.representative_color(accent));
    let k = 1.0 - overlay.opacity();
    let dim = |v: u8| (v as f32 * k).round() as u8;
    Rgba::rgb(dim(base.r), dim(base.g), dim(base.b))
}

/// Contrast of white text on the slide's effective backdrop.
pub fn white_text_contrast(layer: &BackgroundLayer, overlay: &Overlay, accent: &str) -> f64 {
    let backdrop = effective_backdrop(layer, overlay, accent);
    color::contrast_ratio("#ffffff", &backdrop.to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults_are_identity() {
        let slide = Slide::with_text("s", "t", "c");
        let chain = FilterChain::from_slide(&slide);
        assert!(chain.is_identity());
        assert_eq!(chain.apply(Rgba::rgb(10, 200, 30)), Rgba::rgb(10, 200, 30));
        assert_eq!(
            chain.to_css(),
            "blur(0px) brightness(100%) contrast(100%) saturate(100%)"
        );
    }

    #[test]
    fn test_zero_saturation_is_gray() {
        let chain = FilterChain {
            saturation: 0.0,
            ..Default::default()
        };
        let c = chain.apply(Rgba::rgb(255, 0, 0));
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
    }

    #[test]
    fn test_overlay_default_opacity() {
        let slide = Slide::with_text("s", "t", "c");
        let overlay = Overlay::resolve(&slide);
        assert_eq!(overlay.color.a, 102);
        assert_eq!(overlay.pattern, OverlayPattern::None);
    }

    #[test]
    fn test_cover_rect_fills_canvas() {
        let mut slide = Slide::with_text("s", "t", "c");
        slide.background_image = "url('a.png')".into();
        let layer = BackgroundLayer::resolve(&slide, "#000");
        let (x, y, w, h) = layer.cover_rect((800.0, 400.0), (400.0, 500.0));
        assert!(w >= 400.0 && h >= 500.0);
        // centered anchor
        assert!((x + w / 2.0 - 200.0).abs() < 0.01);
        assert!((y + h / 2.0 - 250.0).abs() < 0.01);
    }

    #[test]
    fn test_white_background_has_low_contrast_until_darkened() {
        let mut slide = Slide::with_text("s", "t", "c");
        slide.background_image = "#ffffff".into();
        slide.background.bg_overlay_opacity = Some(0.0);
        let layer = BackgroundLayer::resolve(&slide, "#000");
        assert!(white_text_contrast(&layer, &Overlay::resolve(&slide), "#000") < 4.5);
        slide.background.bg_overlay_opacity = Some(0.7);
        assert!(white_text_contrast(&layer, &Overlay::resolve(&slide), "#000") >= 4.5);
    }
}
