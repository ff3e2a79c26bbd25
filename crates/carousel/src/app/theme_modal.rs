use eframe::egui;

use crate::color;
use crate::model::background::BackgroundFill;
use crate::theme::{FONTS, Theme};

use super::canvas::color32;

/// Theme picker window: the built-in catalog plus a custom theme editor.
pub struct ThemeModal {
    custom: Theme,
}

pub enum ThemeChoice {
    Apply(Theme),
    Close,
}

impl ThemeModal {
    /// Open with the custom editor seeded from `current`.
    pub fn new(current: &Theme) -> Self {
        Self {
            custom: current.clone(),
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, active_id: &str) -> Option<ThemeChoice> {
        let mut choice = None;
        let mut open = true;
        egui::Window::new("Themes")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for theme in Theme::catalog() {
                        if theme_card(ui, &theme, theme.id == active_id) {
                            choice = Some(ThemeChoice::Apply(theme));
                        }
                    }
                });

                ui.add_space(12.0);
                ui.separator();
                ui.strong("Custom theme");
                egui::Grid::new("custom_theme")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("Accent");
                        ui.text_edit_singleline(&mut self.custom.primary_color);
                        ui.end_row();

                        ui.label("Font");
                        egui::ComboBox::from_id_salt("custom_font")
                            .selected_text(self.custom.font_family.as_str())
                            .show_ui(ui, |ui| {
                                for font in FONTS {
                                    ui.selectable_value(
                                        &mut self.custom.font_family,
                                        font.to_string(),
                                        *font,
                                    );
                                }
                            });
                        ui.end_row();

                        ui.label("Background");
                        ui.text_edit_singleline(&mut self.custom.bg_style);
                        ui.end_row();
                    });

                let valid = color::parse_css_color(&self.custom.primary_color).is_some();
                if !valid {
                    ui.small("Accent must be a CSS color such as #ff0055.");
                }
                if ui
                    .add_enabled(valid, egui::Button::new("Apply custom theme"))
                    .clicked()
                {
                    choice = Some(ThemeChoice::Apply(self.custom.clone().into_custom()));
                }
            });
        if !open {
            choice = Some(ThemeChoice::Close);
        }
        choice
    }
}

/// A clickable swatch card. Returns true when picked.
fn theme_card(ui: &mut egui::Ui, theme: &Theme, active: bool) -> bool {
    let size = egui::vec2(120.0, 150.0);
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
    let painter = ui.painter_at(rect);

    let fill = BackgroundFill::parse(&theme.bg_style, &theme.primary_color);
    let swatch = egui::Rect::from_min_size(rect.min, egui::vec2(size.x, 96.0));
    painter.rect_filled(swatch, 8.0, color32(fill.representative_color(&theme.primary_color)));
    if let Some(accent) = color::parse_css_color(&theme.primary_color) {
        painter.circle_filled(swatch.right_bottom() - egui::vec2(16.0, 16.0), 8.0, color32(accent));
    }

    let text = ui.visuals().text_color();
    painter.text(
        egui::pos2(rect.left() + 4.0, swatch.bottom() + 6.0),
        egui::Align2::LEFT_TOP,
        &theme.name,
        egui::FontId::proportional(14.0),
        text,
    );
    painter.text(
        egui::pos2(rect.left() + 4.0, swatch.bottom() + 26.0),
        egui::Align2::LEFT_TOP,
        &theme.description,
        egui::FontId::proportional(10.0),
        text.gamma_multiply(0.7),
    );

    let stroke = if active {
        egui::Stroke::new(2.0, ui.visuals().selection.stroke.color)
    } else if response.hovered() {
        egui::Stroke::new(1.0, text)
    } else {
        egui::Stroke::NONE
    };
    painter.rect_stroke(rect, 8.0, stroke, egui::StrokeKind::Inside);
    response
        .on_hover_text(format!("{} / {}", theme.font_family, theme.primary_color))
        .clicked()
}
