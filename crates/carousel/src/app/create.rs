use eframe::egui;

use crate::config::{GenerationDefaults, MAX_SLIDES, MIN_SLIDES};
use crate::generate::GenerationRequest;
use crate::model::{AspectRatio, PresetStyle, Tone};

/// What the create screen asks the app to do.
pub enum CreateAction {
    Generate {
        request: GenerationRequest,
        aspect: AspectRatio,
        preset: PresetStyle,
    },
    Open(String),
}

/// Form state of the create screen.
pub struct CreateForm {
    pub topic: String,
    pub tone: Tone,
    pub slides: usize,
    pub language: String,
    pub aspect: AspectRatio,
    pub preset: PresetStyle,
    open_path: String,
    error: Option<String>,
}

impl CreateForm {
    pub fn new(defaults: &GenerationDefaults) -> Self {
        Self {
            topic: String::new(),
            tone: defaults.tone,
            slides: defaults.slides,
            language: defaults.language.clone(),
            aspect: defaults.aspect,
            preset: defaults.preset,
            open_path: String::new(),
            error: None,
        }
    }

    /// Build a generation request, or explain what is missing.
    pub fn request(&self) -> Result<GenerationRequest, String> {
        let topic = self.topic.trim();
        if topic.is_empty() {
            return Err("Enter a topic first.".to_string());
        }
        if !(MIN_SLIDES..=MAX_SLIDES).contains(&self.slides) {
            return Err(format!("Choose {MIN_SLIDES} to {MAX_SLIDES} slides."));
        }
        let language = if self.language.trim().is_empty() {
            "English"
        } else {
            self.language.trim()
        };
        Ok(GenerationRequest::new(topic, self.tone, self.slides, language))
    }

    pub fn show(&mut self, ui: &mut egui::Ui, busy: bool) -> Option<CreateAction> {
        let mut action = None;
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.heading("Create a carousel");
            ui.add_space(16.0);
        });

        egui::Grid::new("create_form")
            .num_columns(2)
            .spacing([16.0, 10.0])
            .show(ui, |ui| {
                ui.label("Topic");
                ui.add(
                    egui::TextEdit::singleline(&mut self.topic)
                        .hint_text("e.g. Growth hacks for indie founders")
                        .desired_width(360.0),
                );
                ui.end_row();

                ui.label("Tone");
                egui::ComboBox::from_id_salt("create_tone")
                    .selected_text(self.tone.label())
                    .show_ui(ui, |ui| {
                        for tone in Tone::all() {
                            ui.selectable_value(&mut self.tone, *tone, tone.label());
                        }
                    });
                ui.end_row();

                ui.label("Slides");
                ui.add(egui::Slider::new(&mut self.slides, MIN_SLIDES..=MAX_SLIDES));
                ui.end_row();

                ui.label("Language");
                ui.add(egui::TextEdit::singleline(&mut self.language).desired_width(200.0));
                ui.end_row();

                ui.label("Format");
                egui::ComboBox::from_id_salt("create_aspect")
                    .selected_text(self.aspect.label())
                    .show_ui(ui, |ui| {
                        for aspect in AspectRatio::all() {
                            ui.selectable_value(&mut self.aspect, *aspect, aspect.label());
                        }
                    });
                ui.end_row();

                ui.label("Style");
                egui::ComboBox::from_id_salt("create_preset")
                    .selected_text(self.preset.label())
                    .show_ui(ui, |ui| {
                        for preset in PresetStyle::all() {
                            ui.selectable_value(&mut self.preset, *preset, preset.label());
                        }
                    });
                ui.end_row();
            });

        ui.add_space(16.0);
        ui.horizontal(|ui| {
            let generate = ui.add_enabled(!busy, egui::Button::new("Generate slides"));
            if busy {
                ui.spinner();
                ui.label("Writing your slides...");
            }
            if generate.clicked() {
                match self.request() {
                    Ok(request) => {
                        self.error = None;
                        action = Some(CreateAction::Generate {
                            request,
                            aspect: self.aspect,
                            preset: self.preset,
                        });
                    }
                    Err(e) => self.error = Some(e),
                }
            }
        });

        if let Some(error) = &self.error {
            ui.colored_label(egui::Color32::from_rgb(0xf8, 0x71, 0x71), error);
        }

        ui.add_space(24.0);
        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Open project");
            ui.add(
                egui::TextEdit::singleline(&mut self.open_path)
                    .hint_text("path/to/Topic.json")
                    .desired_width(280.0),
            );
            if ui.button("Open").clicked() && !self.open_path.trim().is_empty() {
                action = Some(CreateAction::Open(self.open_path.trim().to_string()));
            }
        });
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_validation() {
        let mut form = CreateForm::new(&GenerationDefaults::default());
        assert!(form.request().is_err());

        form.topic = "  Remote work  ".into();
        form.language = " ".into();
        let request = form.request().unwrap();
        assert_eq!(request.topic, "Remote work");
        assert_eq!(request.language, "English");
        assert_eq!(request.count, 5);

        form.slides = 11;
        assert!(form.request().is_err());
    }
}
