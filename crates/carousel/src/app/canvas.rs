//! Paints a [`RenderPlan`] with the egui painter.
//!
//! The plan is in canvas pixels; everything here multiplies by one scale
//! factor so the editor preview and the 2x export share a single code path.
//! Painting returns the hit regions of every draggable element.

use std::sync::Arc;

use eframe::egui::{self, Align, Color32, FontFamily, FontId, Pos2, Rect, Stroke, Vec2};

use crate::color::Rgba;
use crate::compositor::{
    BackgroundLayer, BrandBlock, Container, FloatingKind, Overlay, RenderPlan, TextBlock,
};
use crate::model::background::{BackgroundFill, Gradient};
use crate::model::{CanvasSize, ElementKey, OverlayPattern, Position, TextAlign};

use super::image_cache::ImageCache;

const GRADIENT_GRID: usize = 24;
const BRAND_AVATAR: f32 = 40.0;
const BRAND_GAP: f32 = 12.0;
const BRAND_HANDLE_SIZE: f32 = 16.0;
const BRAND_WEBSITE_SIZE: f32 = 13.0;
const BLUR_TAPS: usize = 8;

/// Screen rectangle of a draggable element, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    pub key: ElementKey,
    pub rect: Rect,
}

/// Topmost element under `pos`.
pub fn hit_test(regions: &[HitRegion], pos: Pos2) -> Option<&ElementKey> {
    regions
        .iter()
        .rev()
        .find(|r| r.rect.contains(pos))
        .map(|r| &r.key)
}

/// Largest rectangle of the canvas aspect that fits `available`, centered.
pub fn fit_canvas(available: Rect, canvas: CanvasSize) -> Rect {
    let scale = (available.width() / canvas.width).min(available.height() / canvas.height);
    let size = egui::vec2(canvas.width * scale, canvas.height * scale);
    Rect::from_center_size(available.center(), size)
}

/// Screen position to canvas pixels.
pub fn to_canvas(rect: Rect, canvas: CanvasSize, pos: Pos2) -> Position {
    let scale = rect.width() / canvas.width;
    Position::new((pos.x - rect.left()) / scale, (pos.y - rect.top()) / scale)
}

/// Cut `region` (in points) out of a viewport screenshot and scale it to
/// exactly `target` pixels.
pub fn capture_region(
    shot: &egui::ColorImage,
    region: Rect,
    pixels_per_point: f32,
    target: (u32, u32),
) -> image::RgbaImage {
    let [w, h] = shot.size;
    let raw: Vec<u8> = shot.pixels.iter().flat_map(|c| c.to_array()).collect();
    let Some(full) = image::RgbaImage::from_raw(w as u32, h as u32, raw) else {
        return image::RgbaImage::new(0, 0);
    };
    let px = |v: f32| (v * pixels_per_point).round().max(0.0) as u32;
    let x = px(region.left()).min(full.width());
    let y = px(region.top()).min(full.height());
    let cw = px(region.width()).min(full.width() - x);
    let ch = px(region.height()).min(full.height() - y);
    if cw == 0 || ch == 0 {
        return image::RgbaImage::new(0, 0);
    }
    let cropped = image::imageops::crop_imm(&full, x, y, cw, ch).to_image();
    if (cw, ch) == target {
        cropped
    } else {
        image::imageops::resize(&cropped, target.0, target.1, image::imageops::FilterType::Lanczos3)
    }
}

pub fn color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

/// Paint `plan` into `rect` and return the draggable hit regions.
pub fn paint(ui: &egui::Ui, plan: &RenderPlan, images: &ImageCache, rect: Rect) -> Vec<HitRegion> {
    let scale = rect.width() / plan.canvas.width;
    let painter = ui.painter().with_clip_rect(rect.intersect(ui.clip_rect()));
    let mut regions = Vec::new();

    paint_background(ui.ctx(), &painter, &plan.background, plan.accent, images, rect, scale);
    paint_overlay(&painter, &plan.overlay, rect, scale);
    paint_text_stack(&painter, plan, rect, scale, &mut regions);

    for element in &plan.floating {
        let pos = rect.min + to_vec(element.offset, scale);
        let hit = match &element.kind {
            FloatingKind::Icon {
                glyph,
                size,
                color,
                rotation,
                ..
            } => {
                let galley = painter.layout_no_wrap(
                    glyph.to_string(),
                    FontId::proportional(size * scale),
                    color32(*color),
                );
                let hit = Rect::from_min_size(pos, galley.size());
                let shape = egui::epaint::TextShape::new(pos, galley, color32(*color))
                    .with_angle(rotation.to_radians());
                painter.add(shape);
                hit
            }
            FloatingKind::Text {
                text,
                font_size,
                weight,
                color,
            } => {
                let galley = painter.layout_no_wrap(
                    text.clone(),
                    FontId::proportional(font_size * scale),
                    color32(*color),
                );
                let hit = Rect::from_min_size(pos, galley.size());
                paint_galley(&painter, pos, &galley, color32(*color), *weight >= 600, scale);
                hit
            }
        };
        regions.push(HitRegion {
            key: element.key.clone(),
            rect: hit,
        });
    }

    if let Some(brand) = &plan.brand {
        let hit = paint_brand(ui.ctx(), &painter, brand, plan, images, rect, scale);
        regions.push(HitRegion {
            key: ElementKey::Brand,
            rect: hit,
        });
    }

    if let Some((width, color)) = plan.frame.border {
        painter.rect_stroke(
            rect,
            plan.frame.corner_radius * scale,
            Stroke::new(width * scale, color32(color)),
            egui::StrokeKind::Inside,
        );
    }

    regions
}

fn to_vec(p: Position, scale: f32) -> Vec2 {
    egui::vec2(p.x * scale, p.y * scale)
}

// -- background --------------------------------------------------------------

fn paint_background(
    ctx: &egui::Context,
    painter: &egui::Painter,
    layer: &BackgroundLayer,
    accent: Rgba,
    images: &ImageCache,
    rect: Rect,
    scale: f32,
) {
    let filter = &layer.filter;
    match &layer.fill {
        BackgroundFill::Color { color } => {
            painter.rect_filled(rect, 0.0, color32(filter.apply(*color)));
        }
        BackgroundFill::Gradient(gradient) => {
            painter.add(gradient_mesh(gradient, rect, |c| filter.apply(c)));
        }
        BackgroundFill::Image { source } => {
            let stand_in = filter.apply(layer.fill.representative_color(&accent.to_hex()));
            painter.rect_filled(rect, 0.0, color32(stand_in));
            let Some(texture) = images.get_or_load(ctx, source) else {
                return;
            };
            let size = texture.size_vec2();
            let canvas = (rect.width() / scale, rect.height() / scale);
            let (x, y, w, h) = layer.cover_rect((size.x, size.y), canvas);
            let target = Rect::from_min_size(
                rect.min + egui::vec2(x * scale, y * scale),
                egui::vec2(w * scale, h * scale),
            );
            let uv = Rect::from_min_max(Pos2::ZERO, egui::pos2(1.0, 1.0));
            let tint = image_tint(filter.brightness);
            painter.image(texture.id(), target, uv, tint);
            if filter.blur > 0.0 {
                let radius = filter.blur * scale * 0.5;
                let soft = Color32::from_rgba_unmultiplied(tint.r(), tint.g(), tint.b(), 48);
                for i in 0..BLUR_TAPS {
                    let angle = i as f32 / BLUR_TAPS as f32 * std::f32::consts::TAU;
                    let shift = egui::vec2(angle.cos(), angle.sin()) * radius;
                    painter.image(texture.id(), target.translate(shift), uv, soft);
                }
            }
        }
    }
}

/// Brightness below 100% darkens the image through the texture tint.
fn image_tint(brightness: f32) -> Color32 {
    let v = ((brightness / 100.0).clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgb(v, v, v)
}

/// A vertex-colored mesh following the CSS linear-gradient geometry.
fn gradient_mesh(gradient: &Gradient, rect: Rect, filter: impl Fn(Rgba) -> Rgba) -> egui::Mesh {
    let angle = gradient.angle_deg.to_radians();
    let dir = egui::vec2(angle.sin(), -angle.cos());
    let length = (rect.width() * angle.sin()).abs() + (rect.height() * angle.cos()).abs();
    let center = rect.center();

    let mut mesh = egui::Mesh::default();
    let n = GRADIENT_GRID;
    for row in 0..=n {
        for col in 0..=n {
            let pos = egui::pos2(
                rect.left() + rect.width() * col as f32 / n as f32,
                rect.top() + rect.height() * row as f32 / n as f32,
            );
            let t = if length > 0.0 {
                (pos - center).dot(dir) / length + 0.5
            } else {
                0.0
            };
            mesh.colored_vertex(pos, color32(filter(gradient.color_at(t))));
        }
    }
    let stride = (n + 1) as u32;
    for row in 0..n as u32 {
        for col in 0..n as u32 {
            let i = row * stride + col;
            mesh.add_triangle(i, i + 1, i + stride);
            mesh.add_triangle(i + 1, i + stride + 1, i + stride);
        }
    }
    mesh
}

fn paint_overlay(painter: &egui::Painter, overlay: &Overlay, rect: Rect, scale: f32) {
    if overlay.opacity() > 0.0 {
        painter.rect_filled(rect, 0.0, color32(overlay.color));
    }
    let cell = overlay.pattern_cell * scale;
    if cell <= 1.0 {
        return;
    }
    let ink = color32(overlay.pattern_color);
    match overlay.pattern {
        OverlayPattern::None => {}
        OverlayPattern::Grid => {
            let stroke = Stroke::new(scale.max(0.5), ink);
            let mut x = rect.left();
            while x <= rect.right() {
                painter.line_segment([egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())], stroke);
                x += cell;
            }
            let mut y = rect.top();
            while y <= rect.bottom() {
                painter.line_segment([egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)], stroke);
                y += cell;
            }
        }
        OverlayPattern::Dots => {
            let radius = scale.max(0.5);
            let mut y = rect.top() + cell / 2.0;
            while y < rect.bottom() {
                let mut x = rect.left() + cell / 2.0;
                while x < rect.right() {
                    painter.circle_filled(egui::pos2(x, y), radius, ink);
                    x += cell;
                }
                y += cell;
            }
        }
    }
}

// -- text ----------------------------------------------------------------------

fn text_job(block: &TextBlock, width: f32, scale: f32) -> egui::text::LayoutJob {
    let style = &block.style;
    let mut job = egui::text::LayoutJob::default();
    job.wrap.max_width = width;
    job.halign = match style.align {
        TextAlign::Left => Align::LEFT,
        TextAlign::Center => Align::Center,
        TextAlign::Right => Align::RIGHT,
    };
    let size = style.font_size * scale;
    let format = egui::text::TextFormat {
        font_id: FontId::new(size, FontFamily::Proportional),
        color: color32(block.color),
        italics: style.italic,
        underline: if style.underline {
            Stroke::new((size / 16.0).max(1.0), color32(block.color))
        } else {
            Stroke::NONE
        },
        extra_letter_spacing: style.letter_spacing * scale,
        line_height: Some(size * style.line_height),
        ..Default::default()
    };
    job.append(&block.text, 0.0, format);
    job
}

/// Paint a galley, faking bold with a second pass nudged sideways.
fn paint_galley(
    painter: &egui::Painter,
    pos: Pos2,
    galley: &Arc<egui::Galley>,
    color: Color32,
    bold: bool,
    scale: f32,
) {
    painter.galley_with_override_text_color(pos, galley.clone(), color);
    if bold {
        let nudge = egui::vec2((scale * 0.8).max(0.5), 0.0);
        painter.galley_with_override_text_color(pos + nudge, galley.clone(), color);
    }
}

struct LaidOut<'a> {
    block: &'a TextBlock,
    galley: Arc<egui::Galley>,
}

impl LaidOut<'_> {
    fn height(&self) -> f32 {
        self.galley.rect.height()
    }
}

fn paint_text_stack(
    painter: &egui::Painter,
    plan: &RenderPlan,
    rect: Rect,
    scale: f32,
    regions: &mut Vec<HitRegion>,
) {
    let comp = &plan.composition;
    let pad = comp.padding * scale;
    let inner = match &comp.container {
        Container::Panel { padding, .. } => padding * scale,
        Container::None => 0.0,
    };
    let column = (rect.width() - 2.0 * pad - 2.0 * inner).max(1.0);

    let mut blocks = vec![LaidOut {
        block: &plan.title,
        galley: painter.layout_job(text_job(&plan.title, column, scale)),
    }];
    if let Some(content) = &plan.content {
        blocks.push(LaidOut {
            block: content,
            galley: painter.layout_job(text_job(content, column, scale)),
        });
    }

    let gap = comp.title_gap * scale;
    let stack_h: f32 =
        blocks.iter().map(LaidOut::height).sum::<f32>() + gap * (blocks.len() as f32 - 1.0);
    let box_size = egui::vec2(column + 2.0 * inner, stack_h + 2.0 * inner);
    let box_rect = if comp.centered {
        Rect::from_center_size(rect.center(), box_size)
    } else {
        Rect::from_min_size(
            egui::pos2(rect.left() + pad, rect.bottom() - pad - box_size.y),
            box_size,
        )
    };

    if let Container::Panel {
        fill,
        border,
        corner_radius,
        shadow,
        ..
    } = &comp.container
    {
        let radius = corner_radius * scale;
        if let Some(shadow) = shadow {
            let offset = egui::vec2(shadow.offset_x, shadow.offset_y) * scale;
            painter.rect_filled(
                box_rect.translate(offset).expand(shadow.blur * scale * 0.25),
                radius,
                color32(shadow.color.with_opacity(shadow.color.opacity() * 0.6)),
            );
        }
        painter.rect_filled(box_rect, radius, color32(*fill));
        if let Some((width, color)) = border {
            painter.rect_stroke(
                box_rect,
                radius,
                Stroke::new(width * scale, color32(*color)),
                egui::StrokeKind::Inside,
            );
        }
    }

    let mut y = box_rect.top() + inner;
    let column_left = box_rect.left() + inner;
    for laid in &blocks {
        let anchor_x = match laid.block.style.align {
            TextAlign::Left => column_left,
            TextAlign::Center => column_left + column / 2.0,
            TextAlign::Right => column_left + column,
        };
        let base = egui::pos2(anchor_x, y) + to_vec(laid.block.offset, scale);
        let drawn = laid.galley.rect.translate(base.to_vec2());
        paint_text_block(painter, laid.block, &laid.galley, base, drawn, scale);
        regions.push(HitRegion {
            key: laid.block.key.clone(),
            rect: drawn,
        });
        y += laid.height() + gap;
    }
}

fn paint_text_block(
    painter: &egui::Painter,
    block: &TextBlock,
    galley: &Arc<egui::Galley>,
    pos: Pos2,
    drawn: Rect,
    scale: f32,
) {
    if let Some(highlight) = &block.highlight {
        let (px, py) = highlight.padding;
        painter.rect_filled(
            drawn.expand2(egui::vec2(px, py) * scale),
            2.0 * scale,
            color32(highlight.background),
        );
    }
    if let Some(shadow) = &block.shadow {
        let offset = egui::vec2(shadow.offset_x, shadow.offset_y) * scale;
        let ink = color32(shadow.color);
        if shadow.blur <= 0.0 {
            painter.galley_with_override_text_color(pos + offset, galley.clone(), ink);
        } else {
            let radius = shadow.blur * scale * 0.25;
            let faint = color32(shadow.color.with_opacity(shadow.color.opacity() / 3.0));
            for i in 0..BLUR_TAPS {
                let angle = i as f32 / BLUR_TAPS as f32 * std::f32::consts::TAU;
                let spread = egui::vec2(angle.cos(), angle.sin()) * radius;
                painter.galley_with_override_text_color(pos + offset + spread, galley.clone(), faint);
            }
        }
    }
    paint_galley(painter, pos, galley, color32(block.color), block.style.bold, scale);
}

// -- brand -----------------------------------------------------------------------

fn paint_brand(
    ctx: &egui::Context,
    painter: &egui::Painter,
    brand: &BrandBlock,
    plan: &RenderPlan,
    images: &ImageCache,
    rect: Rect,
    scale: f32,
) -> Rect {
    let white = Color32::WHITE;
    let handle = painter.layout_no_wrap(
        brand.handle.clone(),
        FontId::proportional(BRAND_HANDLE_SIZE * scale),
        white,
    );
    let website = painter.layout_no_wrap(
        brand.website.clone(),
        FontId::proportional(BRAND_WEBSITE_SIZE * scale),
        color32(Rgba::WHITE.with_opacity(brand.website_opacity)),
    );
    let avatar = BRAND_AVATAR * scale;
    let text_w = handle.size().x.max(website.size().x);
    let text_h = handle.size().y + website.size().y;
    let size = egui::vec2(avatar + BRAND_GAP * scale + text_w, avatar.max(text_h));
    let min = egui::pos2(
        rect.left() + brand.padding * scale,
        rect.bottom() - brand.padding * scale - size.y,
    ) + to_vec(brand.offset, scale);
    let block = Rect::from_min_size(min, size);

    let avatar_rect = Rect::from_min_size(
        egui::pos2(min.x, block.center().y - avatar / 2.0),
        egui::vec2(avatar, avatar),
    );
    let texture = brand
        .avatar
        .as_deref()
        .and_then(|src| images.get_or_load(ctx, src));
    match texture {
        Some(texture) => {
            let uv = Rect::from_min_max(Pos2::ZERO, egui::pos2(1.0, 1.0));
            painter.image(texture.id(), avatar_rect, uv, white);
        }
        None => {
            painter.circle_filled(avatar_rect.center(), avatar / 2.0, color32(plan.accent));
            painter.text(
                avatar_rect.center(),
                egui::Align2::CENTER_CENTER,
                &brand.initial,
                FontId::proportional(avatar * 0.45),
                white,
            );
        }
    }

    let text_x = avatar_rect.right() + BRAND_GAP * scale;
    let text_top = block.center().y - text_h / 2.0;
    let handle_h = handle.size().y;
    paint_galley(painter, egui::pos2(text_x, text_top), &handle, white, true, scale);
    painter.galley(egui::pos2(text_x, text_top + handle_h), website, white);
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions() -> Vec<HitRegion> {
        vec![
            HitRegion {
                key: ElementKey::Title,
                rect: Rect::from_min_size(Pos2::ZERO, egui::vec2(100.0, 50.0)),
            },
            HitRegion {
                key: ElementKey::Asset("a".into()),
                rect: Rect::from_min_size(egui::pos2(40.0, 20.0), egui::vec2(20.0, 20.0)),
            },
        ]
    }

    #[test]
    fn test_text_job_follows_alignment() {
        let mut block = TextBlock {
            key: ElementKey::Title,
            text: "Hello".into(),
            style: crate::model::style::ResolvedTextStyle::defaults(
                crate::model::TextRole::Title,
                "Inter",
            ),
            color: Rgba {
                r: 255,
                g: 255,
                b: 255,
                a: 255,
            },
            shadow: None,
            highlight: None,
            offset: Position::default(),
        };
        for (align, expected) in [
            (TextAlign::Left, Align::LEFT),
            (TextAlign::Center, Align::Center),
            (TextAlign::Right, Align::RIGHT),
        ] {
            block.style.align = align;
            let job = text_job(&block, 400.0, 1.0);
            assert_eq!(job.halign, expected);
            assert!(!job.justify);
        }
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let r = regions();
        assert_eq!(hit_test(&r, egui::pos2(45.0, 25.0)), Some(&ElementKey::Asset("a".into())));
        assert_eq!(hit_test(&r, egui::pos2(5.0, 5.0)), Some(&ElementKey::Title));
        assert_eq!(hit_test(&r, egui::pos2(500.0, 5.0)), None);
    }

    #[test]
    fn test_fit_canvas_keeps_aspect() {
        let canvas = CanvasSize {
            width: 1080.0,
            height: 1350.0,
        };
        let fitted = fit_canvas(Rect::from_min_size(Pos2::ZERO, egui::vec2(1000.0, 500.0)), canvas);
        assert!((fitted.height() - 500.0).abs() < 0.01);
        assert!((fitted.width() / fitted.height() - 1080.0 / 1350.0).abs() < 1e-4);
        assert!((fitted.center().x - 500.0).abs() < 0.01);
    }

    #[test]
    fn test_to_canvas_inverts_scale() {
        let canvas = CanvasSize {
            width: 1080.0,
            height: 1080.0,
        };
        let rect = Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(540.0, 540.0));
        let p = to_canvas(rect, canvas, egui::pos2(10.0 + 270.0, 20.0 + 54.0));
        assert_eq!(p, Position::new(540.0, 108.0));
    }

    #[test]
    fn test_capture_region_crops_and_scales() {
        let mut shot = egui::ColorImage::filled([40, 20], Color32::BLACK);
        for y in 0..20 {
            for x in 20..40 {
                shot.pixels[y * 40 + x] = Color32::WHITE;
            }
        }
        let region = Rect::from_min_size(egui::pos2(10.0, 0.0), egui::vec2(10.0, 10.0));
        let out = capture_region(&shot, region, 2.0, (40, 40));
        assert_eq!(out.dimensions(), (40, 40));
        assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255, 255]);

        let outside = Rect::from_min_size(egui::pos2(100.0, 100.0), egui::vec2(10.0, 10.0));
        assert_eq!(capture_region(&shot, outside, 1.0, (8, 8)).dimensions(), (0, 0));
    }

    #[test]
    fn test_image_tint_only_darkens() {
        assert_eq!(image_tint(100.0), Color32::from_rgb(255, 255, 255));
        assert_eq!(image_tint(150.0), Color32::from_rgb(255, 255, 255));
        assert_eq!(image_tint(50.0), Color32::from_rgb(128, 128, 128));
    }
}
