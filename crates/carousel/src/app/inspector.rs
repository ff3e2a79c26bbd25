//! Right-hand panel: every per-slide and project-level control.
//!
//! Each widget edit goes straight through the editor as one mutation.
//! Work that needs the AI service or the filesystem is handed back to the
//! app as an [`InspectorAction`].

use eframe::egui;

use crate::editor::Editor;
use crate::model::background::FALLBACK_BACKGROUND;
use crate::model::{
    AspectRatio, BackgroundAnchor, Border, Layout, OverlayPattern, PresetStyle, ShadowKind, Slide,
    TextAlign, TextRole, TextStyle,
};
use crate::store::{ProjectPatch, SlidePatch};
use crate::theme::FONTS;

pub enum InspectorAction {
    SuggestIcons,
    GenerateImage(String),
    SyncLogo(String),
    OpenThemes,
}

pub struct InspectorState {
    role: TextRole,
    image_prompt: String,
    extra_text: String,
    logo_path: String,
    /// Last icon suggestions for the active slide.
    pub suggestions: Vec<String>,
}

impl Default for InspectorState {
    fn default() -> Self {
        Self {
            role: TextRole::Title,
            image_prompt: String::new(),
            extra_text: String::new(),
            logo_path: String::new(),
            suggestions: Vec::new(),
        }
    }
}

impl InspectorState {
    /// Clear per-slide scratch state after the selection changes.
    pub fn slide_changed(&mut self) {
        self.image_prompt.clear();
        self.suggestions.clear();
    }
}

pub fn show(
    ui: &mut egui::Ui,
    editor: &mut Editor,
    state: &mut InspectorState,
    busy: bool,
) -> Option<InspectorAction> {
    let Some(slide) = editor.active_slide().cloned() else {
        ui.label("No slide selected.");
        return None;
    };
    let mut action = None;

    if editor.active_low_contrast() {
        egui::Frame::new()
            .fill(egui::Color32::from_rgb(0x45, 0x2a, 0x06))
            .inner_margin(8.0)
            .corner_radius(6.0)
            .show(ui, |ui| {
                ui.colored_label(
                    egui::Color32::from_rgb(0xfb, 0xbf, 0x24),
                    "Low contrast: white text may be hard to read on this background.",
                );
                if ui.button("Fix automatically").clicked() {
                    editor.fix_contrast();
                }
            });
        ui.add_space(8.0);
    }

    egui::CollapsingHeader::new("Slide")
        .default_open(true)
        .show(ui, |ui| slide_section(ui, editor, &slide));

    egui::CollapsingHeader::new("Typography")
        .default_open(true)
        .show(ui, |ui| typography_section(ui, editor, state, &slide));

    egui::CollapsingHeader::new("Design").show(ui, |ui| {
        if let Some(a) = design_section(ui, editor, state, &slide, busy) {
            action = Some(a);
        }
    });

    egui::CollapsingHeader::new("Assets").show(ui, |ui| {
        if let Some(a) = assets_section(ui, editor, state, &slide, busy) {
            action = Some(a);
        }
    });

    egui::CollapsingHeader::new("Project").show(ui, |ui| {
        if let Some(a) = project_section(ui, editor, state) {
            action = Some(a);
        }
    });

    action
}

fn slide_section(ui: &mut egui::Ui, editor: &mut Editor, slide: &Slide) {
    let mut title = slide.title.clone();
    ui.label("Title");
    if ui
        .add(egui::TextEdit::multiline(&mut title).desired_rows(2))
        .changed()
    {
        editor.patch_active(SlidePatch::title(title));
    }

    let mut content = slide.content.clone();
    ui.label("Content");
    if ui
        .add(egui::TextEdit::multiline(&mut content).desired_rows(4))
        .changed()
    {
        editor.patch_active(SlidePatch::content(content));
    }

    ui.horizontal(|ui| {
        ui.label("Layout");
        let mut layout = slide.layout;
        egui::ComboBox::from_id_salt("slide_layout")
            .selected_text(layout.label())
            .show_ui(ui, |ui| {
                for l in Layout::all() {
                    ui.selectable_value(&mut layout, *l, l.label());
                }
            });
        if layout != slide.layout {
            editor.patch_active(SlidePatch {
                layout: Some(layout),
                ..Default::default()
            });
        }
    });

    ui.horizontal(|ui| {
        ui.label("Font");
        let current = slide.font_family_or_default().to_string();
        let mut font = current.clone();
        egui::ComboBox::from_id_salt("slide_font")
            .selected_text(font.as_str())
            .show_ui(ui, |ui| {
                for f in FONTS {
                    ui.selectable_value(&mut font, f.to_string(), *f);
                }
            });
        if font != current {
            editor.patch_active(SlidePatch {
                font_family: Some(font),
                ..Default::default()
            });
        }
    });

    if !slide.visual_description.is_empty() {
        ui.small(format!("Visual idea: {}", slide.visual_description));
    }
}

fn typography_section(
    ui: &mut egui::Ui,
    editor: &mut Editor,
    state: &mut InspectorState,
    slide: &Slide,
) {
    ui.horizontal(|ui| {
        ui.selectable_value(&mut state.role, TextRole::Title, "Title");
        ui.selectable_value(&mut state.role, TextRole::Content, "Content");
    });
    let role = state.role;
    let style = slide.style(role).resolve(role, slide.font_family_or_default());
    let mut patch = TextStyle::default();

    ui.horizontal(|ui| {
        let mut bold = style.bold;
        if ui.toggle_value(&mut bold, "B").changed() {
            patch.bold = Some(bold);
        }
        let mut italic = style.italic;
        if ui.toggle_value(&mut italic, "I").changed() {
            patch.italic = Some(italic);
        }
        let mut underline = style.underline;
        if ui.toggle_value(&mut underline, "U").changed() {
            patch.underline = Some(underline);
        }
        let mut uppercase = style.uppercase;
        if ui.toggle_value(&mut uppercase, "AA").changed() {
            patch.uppercase = Some(uppercase);
        }
    });

    egui::Grid::new("typography")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label("Size");
            let mut size = style.font_size;
            if ui
                .add(egui::Slider::new(&mut size, 8.0..=120.0).suffix("px"))
                .changed()
            {
                patch.font_size = Some(size);
            }
            ui.end_row();

            ui.label("Line height");
            let mut line_height = style.line_height;
            if ui
                .add(egui::Slider::new(&mut line_height, 0.8..=2.5))
                .changed()
            {
                patch.line_height = Some(line_height);
            }
            ui.end_row();

            ui.label("Spacing");
            let mut spacing = style.letter_spacing;
            if ui
                .add(egui::Slider::new(&mut spacing, -5.0..=20.0).suffix("px"))
                .changed()
            {
                patch.letter_spacing = Some(spacing);
            }
            ui.end_row();

            ui.label("Color");
            let mut color = style.color.clone();
            if ui.text_edit_singleline(&mut color).changed() {
                patch.color = Some(color);
            }
            ui.end_row();

            ui.label("Align");
            let mut align = style.align;
            egui::ComboBox::from_id_salt("text_align")
                .selected_text(align.label())
                .show_ui(ui, |ui| {
                    for a in TextAlign::all() {
                        ui.selectable_value(&mut align, *a, a.label());
                    }
                });
            if align != style.align {
                patch.text_align = Some(align);
            }
            ui.end_row();

            ui.label("Shadow");
            let mut shadow = style.shadow;
            egui::ComboBox::from_id_salt("text_shadow")
                .selected_text(shadow.label())
                .show_ui(ui, |ui| {
                    for s in ShadowKind::all() {
                        ui.selectable_value(&mut shadow, *s, s.label());
                    }
                });
            if shadow != style.shadow {
                patch.shadow = Some(shadow);
            }
            ui.end_row();
        });

    if patch != TextStyle::default() {
        editor.update_text_style(role, &patch);
    }
}

/// Optional percentage slider over a stored `Option<f32>`.
fn percent(ui: &mut egui::Ui, label: &str, value: Option<f32>, default: f32, max: f32) -> Option<f32> {
    ui.label(label);
    let mut v = value.unwrap_or(default);
    let changed = ui
        .add(egui::Slider::new(&mut v, 0.0..=max).suffix("%"))
        .changed();
    ui.end_row();
    changed.then_some(v)
}

fn design_section(
    ui: &mut egui::Ui,
    editor: &mut Editor,
    state: &mut InspectorState,
    slide: &Slide,
    busy: bool,
) -> Option<InspectorAction> {
    let mut action = None;

    ui.label("Background");
    if slide.background_image.contains("data:image") {
        ui.horizontal(|ui| {
            ui.label("Generated image");
            if ui.small_button("Clear").clicked() {
                editor.patch_active(SlidePatch {
                    background_image: Some(FALLBACK_BACKGROUND.to_string()),
                    ..Default::default()
                });
            }
        });
    } else {
        let mut background = slide.background_image.clone();
        if ui
            .add(egui::TextEdit::singleline(&mut background).hint_text("#111318, gradient or url(...)"))
            .changed()
        {
            editor.patch_active(SlidePatch {
                background_image: Some(background),
                ..Default::default()
            });
        }
    }

    ui.horizontal(|ui| {
        if state.image_prompt.is_empty() {
            state.image_prompt = slide.visual_description.clone();
        }
        ui.add(egui::TextEdit::singleline(&mut state.image_prompt).hint_text("Describe an image"));
        if ui
            .add_enabled(!busy && !state.image_prompt.trim().is_empty(), egui::Button::new("Generate"))
            .clicked()
        {
            action = Some(InspectorAction::GenerateImage(state.image_prompt.trim().to_string()));
        }
    });

    let mut bg = slide.background.clone();
    let mut changed = false;
    egui::Grid::new("design_filters")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label("Blur");
            let mut blur = bg.bg_blur.unwrap_or(0.0);
            if ui
                .add(egui::Slider::new(&mut blur, 0.0..=20.0).suffix("px"))
                .changed()
            {
                bg.bg_blur = Some(blur);
                changed = true;
            }
            ui.end_row();

            if let Some(v) = percent(ui, "Brightness", bg.bg_brightness, 100.0, 200.0) {
                bg.bg_brightness = Some(v);
                changed = true;
            }
            if let Some(v) = percent(ui, "Contrast", bg.bg_contrast, 100.0, 200.0) {
                bg.bg_contrast = Some(v);
                changed = true;
            }
            if let Some(v) = percent(ui, "Saturation", bg.bg_saturation, 100.0, 200.0) {
                bg.bg_saturation = Some(v);
                changed = true;
            }

            ui.label("Zoom");
            let mut scale = bg
                .background_scale
                .unwrap_or(crate::compositor::background::DEFAULT_BACKGROUND_SCALE);
            if ui.add(egui::Slider::new(&mut scale, 1.0..=3.0)).changed() {
                bg.background_scale = Some(scale);
                changed = true;
            }
            ui.end_row();

            ui.label("Anchor");
            let mut anchor = bg.background_position.unwrap_or_default();
            egui::ComboBox::from_id_salt("bg_anchor")
                .selected_text(anchor.label())
                .show_ui(ui, |ui| {
                    for a in BackgroundAnchor::all() {
                        ui.selectable_value(&mut anchor, *a, a.label());
                    }
                });
            if anchor != bg.background_position.unwrap_or_default() {
                bg.background_position = Some(anchor);
                changed = true;
            }
            ui.end_row();

            ui.label("Overlay");
            let mut overlay = bg
                .bg_overlay_opacity
                .unwrap_or(crate::model::DEFAULT_OVERLAY_OPACITY);
            if ui.add(egui::Slider::new(&mut overlay, 0.0..=1.0)).changed() {
                bg.bg_overlay_opacity = Some(overlay);
                changed = true;
            }
            ui.end_row();

            ui.label("Pattern");
            let mut pattern = bg.overlay_pattern.unwrap_or_default();
            egui::ComboBox::from_id_salt("bg_pattern")
                .selected_text(pattern.label())
                .show_ui(ui, |ui| {
                    for p in OverlayPattern::all() {
                        ui.selectable_value(&mut pattern, *p, p.label());
                    }
                });
            if pattern != bg.overlay_pattern.unwrap_or_default() {
                bg.overlay_pattern = Some(pattern);
                changed = true;
            }
            ui.end_row();
        });
    if changed {
        editor.patch_active(SlidePatch {
            background: Some(bg),
            ..Default::default()
        });
    }

    ui.separator();
    let mut highlight = slide.enable_text_highlight;
    if ui.checkbox(&mut highlight, "Highlight text blocks").changed() {
        editor.patch_active(SlidePatch {
            enable_text_highlight: Some(highlight),
            ..Default::default()
        });
    }
    if slide.enable_text_highlight {
        ui.horizontal(|ui| {
            ui.label("Color");
            let mut color = slide.highlight_color.clone().unwrap_or_default();
            if ui
                .add(egui::TextEdit::singleline(&mut color).hint_text("default"))
                .changed()
            {
                editor.patch_active(SlidePatch {
                    highlight_color: Some(color),
                    ..Default::default()
                });
            }
        });
        let mut opacity = slide.highlight_opacity.unwrap_or(1.0);
        if ui
            .add(egui::Slider::new(&mut opacity, 0.0..=1.0).text("Opacity"))
            .changed()
        {
            editor.patch_active(SlidePatch {
                highlight_opacity: Some(opacity),
                ..Default::default()
            });
        }
    }

    ui.separator();
    let mut radius = slide
        .corner_radius
        .unwrap_or(crate::compositor::layout::DEFAULT_CORNER_RADIUS);
    if ui
        .add(egui::Slider::new(&mut radius, 0.0..=64.0).text("Corner radius"))
        .changed()
    {
        editor.patch_active(SlidePatch {
            corner_radius: Some(radius),
            ..Default::default()
        });
    }
    let mut border = slide.border.clone().unwrap_or(Border {
        width: 0.0,
        color: "#ffffff".to_string(),
    });
    let before = border.clone();
    ui.horizontal(|ui| {
        ui.add(egui::Slider::new(&mut border.width, 0.0..=24.0).text("Border"));
        ui.add(egui::TextEdit::singleline(&mut border.color).desired_width(80.0));
    });
    if border != before {
        editor.patch_active(SlidePatch {
            border: Some(border),
            ..Default::default()
        });
    }

    action
}

fn assets_section(
    ui: &mut egui::Ui,
    editor: &mut Editor,
    state: &mut InspectorState,
    slide: &Slide,
    busy: bool,
) -> Option<InspectorAction> {
    let mut action = None;

    for asset in &slide.additional_assets {
        ui.horizontal(|ui| {
            ui.label(format!(
                "{} {}",
                crate::compositor::icons::glyph_for(&asset.value),
                asset.value
            ));
            if ui.small_button("Remove").clicked() {
                editor.remove_asset(&asset.id);
            }
        });
    }

    ui.horizontal(|ui| {
        if ui
            .add_enabled(!busy, egui::Button::new("Suggest icons"))
            .clicked()
        {
            action = Some(InspectorAction::SuggestIcons);
        }
    });
    if !state.suggestions.is_empty() {
        ui.horizontal_wrapped(|ui| {
            for name in &state.suggestions {
                let label = format!("{} {name}", crate::compositor::icons::glyph_for(name));
                if ui.button(label).on_hover_text("Add to slide").clicked() {
                    editor.add_icon(name);
                }
            }
        });
    }

    ui.separator();
    for extra in &slide.additional_texts {
        ui.horizontal(|ui| {
            ui.label(&extra.text);
            if ui.small_button("Remove").clicked() {
                editor.remove_extra_text(&extra.id);
            }
        });
    }
    ui.horizontal(|ui| {
        ui.add(egui::TextEdit::singleline(&mut state.extra_text).hint_text("Extra text"));
        if ui.button("Add").clicked() && !state.extra_text.trim().is_empty() {
            editor.add_extra_text(state.extra_text.trim());
            state.extra_text.clear();
        }
    });

    action
}

fn project_section(
    ui: &mut egui::Ui,
    editor: &mut Editor,
    state: &mut InspectorState,
) -> Option<InspectorAction> {
    let mut action = None;
    let project = editor.project().clone();

    ui.horizontal(|ui| {
        ui.label("Style");
        let mut preset = project.preset_style;
        egui::ComboBox::from_id_salt("project_preset")
            .selected_text(preset.label())
            .show_ui(ui, |ui| {
                for p in PresetStyle::all() {
                    ui.selectable_value(&mut preset, *p, p.label());
                }
            });
        if preset != project.preset_style {
            editor.patch_project(ProjectPatch {
                preset_style: Some(preset),
                ..Default::default()
            });
        }
    });

    ui.horizontal(|ui| {
        ui.label("Format");
        let mut aspect = project.aspect_ratio;
        egui::ComboBox::from_id_salt("project_aspect")
            .selected_text(aspect.label())
            .show_ui(ui, |ui| {
                for a in AspectRatio::all() {
                    ui.selectable_value(&mut aspect, *a, a.label());
                }
            });
        if aspect != project.aspect_ratio {
            editor.patch_project(ProjectPatch {
                aspect_ratio: Some(aspect),
                ..Default::default()
            });
        }
    });

    ui.horizontal(|ui| {
        ui.label(format!("Theme: {}", project.theme_id));
        if ui.button("Change...").clicked() {
            action = Some(InspectorAction::OpenThemes);
        }
    });

    ui.separator();
    ui.strong("Brand");
    let mut brand = project.brand_config.clone();
    ui.checkbox(&mut brand.enabled, "Show on every slide");
    egui::Grid::new("brand")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label("Handle");
            ui.text_edit_singleline(&mut brand.handle);
            ui.end_row();
            ui.label("Website");
            ui.text_edit_singleline(&mut brand.website);
            ui.end_row();
            ui.label("Avatar");
            let mut avatar = brand.avatar_url.clone().unwrap_or_default();
            if ui.text_edit_singleline(&mut avatar).changed() {
                brand.avatar_url = Some(avatar).filter(|a| !a.trim().is_empty());
            }
            ui.end_row();
        });
    if brand != project.brand_config {
        editor.patch_project(ProjectPatch {
            brand_config: Some(brand),
            ..Default::default()
        });
    }

    ui.horizontal(|ui| {
        ui.add(egui::TextEdit::singleline(&mut state.logo_path).hint_text("logo.png"));
        if ui.button("Match accent to logo").clicked() && !state.logo_path.trim().is_empty() {
            action = Some(InspectorAction::SyncLogo(state.logo_path.trim().to_string()));
        }
    });
    ui.small(format!("Accent {}", project.primary_color));

    action
}
