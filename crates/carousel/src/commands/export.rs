use std::path::PathBuf;

use anyhow::Context;
use colored::Colorize;
use eframe::egui;

use crate::app::canvas;
use crate::app::image_cache::ImageCache;
use crate::compositor::{self, PresentationSettings, RenderPlan};
use crate::config::Config;
use crate::export;
use crate::model::Project;
use crate::theme::ThemeContext;

/// Frames to wait for background images before capturing anyway.
const MAX_WAIT_FRAMES: u32 = 600;

struct ExportApp {
    plan: RenderPlan,
    topic: String,
    image_cache: ImageCache,
    output_dir: PathBuf,
    target: (u32, u32),
    frames: u32,
    screenshot_requested: bool,
    result: std::sync::Arc<std::sync::Mutex<Option<Result<PathBuf, String>>>>,
}

impl eframe::App for ExportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut shot = None;
        ctx.input(|i| {
            for event in &i.events {
                if let egui::Event::Screenshot { image, .. } = event {
                    shot = Some((image.clone(), i.pixels_per_point));
                }
            }
        });

        let mut canvas_rect = egui::Rect::NOTHING;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::BLACK).inner_margin(0.0))
            .show(ctx, |ui| {
                canvas_rect = canvas::fit_canvas(ui.max_rect(), self.plan.canvas);
                canvas::paint(ui, &self.plan, &self.image_cache, canvas_rect);
            });

        if let Some((image, ppp)) = shot {
            let capture = canvas::capture_region(&image, canvas_rect, ppp, self.target);
            let outcome = export::write_slide_jpeg(&capture, &self.output_dir, &self.topic)
                .map_err(|e| e.to_string());
            if let Ok(mut slot) = self.result.lock() {
                *slot = Some(outcome);
            }
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        self.frames += 1;
        let ready = self.image_cache.is_idle(ctx) || self.frames >= MAX_WAIT_FRAMES;
        // One settled frame after the images land, then capture.
        if ready && self.frames > 1 && !self.screenshot_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            self.screenshot_requested = true;
        }
        ctx.request_repaint();
    }
}

fn plan_for(project: &Project, index: usize) -> Option<RenderPlan> {
    let slide = project.slides.get(index)?;
    let theme = ThemeContext::new(project.primary_color.clone());
    let settings = PresentationSettings::for_project(project, &theme);
    Some(compositor::resolve(slide, &settings))
}

/// Render one slide off screen and write it as a JPEG.
pub fn run(file: PathBuf, slide: usize, output: Option<PathBuf>) -> anyhow::Result<()> {
    let project = export::load_project(&file)
        .with_context(|| format!("Failed to load {}", file.display()))?;

    let count = project.slide_count();
    if slide == 0 || slide > count {
        anyhow::bail!("Slide {slide} out of range. The project has {count} slide(s).");
    }
    let plan = plan_for(&project, slide - 1)
        .ok_or_else(|| anyhow::anyhow!("Slide {slide} not found"))?;

    let base_path = file
        .parent()
        .unwrap_or(std::path::Path::new("."))
        .to_path_buf();
    let output_dir = output.unwrap_or_else(|| Config::load_or_default().generation_defaults().export_dir);
    let target = project.aspect_ratio.canvas_size().scaled(export::EXPORT_SCALE);

    eprintln!(
        "Exporting slide {slide} of \"{}\" ({}x{})",
        project.topic, target.0, target.1
    );

    let title = format!("carousel export - {}", project.topic);
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([plan.canvas.width, plan.canvas.height])
        .with_title(&title)
        .with_decorations(false);
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let result = std::sync::Arc::new(std::sync::Mutex::new(None));
    let app = ExportApp {
        plan,
        topic: project.topic.clone(),
        image_cache: ImageCache::new(base_path),
        output_dir,
        target,
        frames: 0,
        screenshot_requested: false,
        result: result.clone(),
    };
    eframe::run_native(&title, options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let outcome = result
        .lock()
        .map_err(|_| anyhow::anyhow!("Export state was poisoned"))?
        .take();
    match outcome {
        Some(Ok(path)) => {
            println!("{} {}", "Exported".green().bold(), path.display());
            Ok(())
        }
        Some(Err(e)) => anyhow::bail!("Export failed: {e}"),
        None => anyhow::bail!("Export window closed before the slide was captured"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Slide, Tone};

    #[test]
    fn test_plan_for_uses_project_settings() {
        let slides = vec![
            Slide::with_text("a", "First", "Body"),
            Slide::with_text("b", "Second", "Body"),
        ];
        let mut project = Project::new("Topic", Tone::Professional, 2, "English", slides);
        project.aspect_ratio = crate::model::AspectRatio::Square;

        let plan = plan_for(&project, 1).unwrap();
        assert_eq!(plan.slide_id, "b");
        assert_eq!(plan.canvas.width, plan.canvas.height);
        assert!(plan_for(&project, 2).is_none());
    }
}
