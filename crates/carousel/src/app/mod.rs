//! The desktop editor: create screen, slide rail, live canvas, inspector.

pub mod canvas;
mod create;
pub mod image_cache;
mod inspector;
mod theme_modal;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

use eframe::egui;

use crate::config::{Config, GenerationDefaults};
use crate::editor::Editor;
use crate::export;
use crate::generate::{Bridge, GenerationRequest, ImageRequest};
use crate::model::{AspectRatio, PresetStyle, Project, Slide};
use crate::store::{MoveDirection, SlidePatch};
use crate::theme::Theme;

use canvas::HitRegion;
use create::{CreateAction, CreateForm};
use image_cache::ImageCache;
use inspector::{InspectorAction, InspectorState};
use theme_modal::{ThemeChoice, ThemeModal};

const TOAST_DURATION: f32 = 2.5;
const TOAST_FADE_START: f32 = 2.0;
const RAIL_WIDTH: f32 = 170.0;
const INSPECTOR_WIDTH: f32 = 330.0;
const CANVAS_MARGIN: f32 = 24.0;

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        if elapsed < TOAST_FADE_START {
            1.0
        } else if elapsed < TOAST_DURATION {
            1.0 - (elapsed - TOAST_FADE_START) / (TOAST_DURATION - TOAST_FADE_START)
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= TOAST_DURATION
    }
}

/// Result of work done off the UI thread.
enum JobResult {
    Slides {
        request: GenerationRequest,
        aspect: AspectRatio,
        preset: PresetStyle,
        slides: Vec<Slide>,
    },
    Icons {
        slide_id: String,
        names: Vec<String>,
    },
    Image {
        slide_id: String,
        background: String,
    },
}

/// Runs bridge calls on worker threads; results are polled every frame.
struct Worker {
    bridge: Arc<Bridge>,
    tx: Sender<JobResult>,
    rx: Receiver<JobResult>,
    running: Option<&'static str>,
}

impl Worker {
    fn new(bridge: Bridge) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            bridge: Arc::new(bridge),
            tx,
            rx,
            running: None,
        }
    }

    fn is_busy(&self) -> bool {
        self.running.is_some()
    }

    /// Start `job` unless one is already running; the running job's label is
    /// returned when busy.
    fn spawn(
        &mut self,
        ctx: &egui::Context,
        label: &'static str,
        job: impl FnOnce(&Bridge) -> JobResult + Send + 'static,
    ) -> Result<(), &'static str> {
        if let Some(running) = self.running {
            return Err(running);
        }
        log::debug!("Starting background job: {label}");
        self.running = Some(label);
        let bridge = Arc::clone(&self.bridge);
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let _ = tx.send(job(&bridge));
            ctx.request_repaint();
        });
        Ok(())
    }

    fn poll(&mut self) -> Option<JobResult> {
        let result = self.rx.try_recv().ok()?;
        self.running = None;
        Some(result)
    }
}

/// Pointer position a drag is anchored on.
///
/// egui reports a drag start only once the pointer has moved past its drag
/// threshold, so the press point is preferred over the current position.
fn drag_anchor(press: Option<egui::Pos2>, current: Option<egui::Pos2>) -> Option<egui::Pos2> {
    press.or(current)
}

enum Screen {
    Create(CreateForm),
    Edit(Box<Editor>),
}

pub struct EditorApp {
    screen: Screen,
    defaults: GenerationDefaults,
    worker: Worker,
    images: ImageCache,
    inspector: InspectorState,
    theme_modal: Option<ThemeModal>,
    toast: Option<Toast>,
    /// Hit regions from the last painted frame.
    regions: Vec<HitRegion>,
    canvas_rect: egui::Rect,
    /// Canvas rectangle to cut out of the next screenshot.
    pending_capture: Option<egui::Rect>,
    project_path: Option<PathBuf>,
}

impl EditorApp {
    fn new(config: &Config, project: Option<(Project, PathBuf)>) -> Self {
        let defaults = config.generation_defaults();
        let base = project
            .as_ref()
            .and_then(|(_, path)| path.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));
        let (screen, project_path) = match project {
            Some((project, path)) => (Screen::Edit(Box::new(Editor::new(project))), Some(path)),
            None => (Screen::Create(CreateForm::new(&defaults)), None),
        };
        Self {
            screen,
            defaults,
            worker: Worker::new(config.ai_or_default().bridge()),
            images: ImageCache::new(base),
            inspector: InspectorState::default(),
            theme_modal: None,
            toast: None,
            regions: Vec::new(),
            canvas_rect: egui::Rect::NOTHING,
            pending_capture: None,
            project_path,
        }
    }

    fn editor_mut(&mut self) -> Option<&mut Editor> {
        match &mut self.screen {
            Screen::Edit(editor) => Some(editor.as_mut()),
            Screen::Create(_) => None,
        }
    }

    fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{message}");
        self.toast = Some(Toast::new(message));
    }

    fn export_dir(&self) -> PathBuf {
        self.project_path
            .as_ref()
            .and_then(|p| p.parent().map(|d| d.to_path_buf()))
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| self.defaults.export_dir.clone())
    }

    // -- background jobs --------------------------------------------------------

    fn run_job(
        &mut self,
        ctx: &egui::Context,
        label: &'static str,
        job: impl FnOnce(&Bridge) -> JobResult + Send + 'static,
    ) {
        if let Err(running) = self.worker.spawn(ctx, label, job) {
            self.notify(format!("Busy: {running}"));
        }
    }

    fn start_generation(
        &mut self,
        ctx: &egui::Context,
        request: GenerationRequest,
        aspect: AspectRatio,
        preset: PresetStyle,
    ) {
        self.run_job(ctx, "Generating slides", move |bridge| {
            let slides = bridge.generate_slides(&request);
            JobResult::Slides {
                request,
                aspect,
                preset,
                slides,
            }
        });
    }

    fn handle_job(&mut self, result: JobResult) {
        match result {
            JobResult::Slides {
                request,
                aspect,
                preset,
                slides,
            } => {
                let mut project = Project::new(
                    request.topic,
                    request.tone,
                    request.count,
                    request.language,
                    slides,
                );
                project.aspect_ratio = aspect;
                project.preset_style = preset;
                let count = project.slide_count();
                if let Screen::Edit(editor) = &mut self.screen {
                    editor.load(project);
                } else {
                    self.screen = Screen::Edit(Box::new(Editor::new(project)));
                }
                self.project_path = None;
                self.inspector.slide_changed();
                self.notify(format!("Generated {count} slides"));
            }
            JobResult::Icons { slide_id, names } => {
                let active = match &self.screen {
                    Screen::Edit(editor) => editor.active_slide().map(|s| s.id.clone()),
                    Screen::Create(_) => None,
                };
                if active.as_deref() == Some(slide_id.as_str()) {
                    self.inspector.suggestions = names;
                }
            }
            JobResult::Image {
                slide_id,
                background,
            } => {
                let applied = self.editor_mut().is_some_and(|editor| {
                    editor.patch_slide(
                        &slide_id,
                        SlidePatch {
                            background_image: Some(background),
                            ..Default::default()
                        },
                    )
                });
                if applied {
                    self.notify("Background updated");
                }
            }
        }
    }

    fn handle_inspector(&mut self, ctx: &egui::Context, action: InspectorAction) {
        let Screen::Edit(editor) = &self.screen else {
            return;
        };
        let Some(slide) = editor.active_slide().cloned() else {
            return;
        };
        let aspect = editor.project().aspect_ratio;
        let theme = Theme::find_or_default(&editor.project().theme_id);

        match action {
            InspectorAction::SuggestIcons => {
                self.run_job(ctx, "Suggesting icons", move |bridge| JobResult::Icons {
                    names: bridge.suggest_icons(&slide.title, &slide.content),
                    slide_id: slide.id,
                });
            }
            InspectorAction::GenerateImage(prompt) => {
                self.run_job(ctx, "Generating image", move |bridge| {
                    let request = ImageRequest::background(prompt, aspect);
                    JobResult::Image {
                        background: bridge.generate_image(&request),
                        slide_id: slide.id,
                    }
                });
            }
            InspectorAction::SyncLogo(path) => {
                let base = self.export_dir();
                match image_cache::decode_source(&path, &base) {
                    Ok(logo) => {
                        let synced = self
                            .editor_mut()
                            .is_some_and(|editor| editor.sync_brand_color(&logo));
                        if synced {
                            self.notify("Accent matched to logo");
                        }
                    }
                    Err(e) => self.notify(format!("Could not read logo: {e}")),
                }
            }
            InspectorAction::OpenThemes => {
                self.theme_modal = Some(ThemeModal::new(&theme));
            }
        }
    }

    // -- file actions -------------------------------------------------------------

    fn open_project(&mut self, path: PathBuf) {
        match export::load_project(&path) {
            Ok(project) => {
                self.notify(format!("Opened {}", path.display()));
                self.screen = Screen::Edit(Box::new(Editor::new(project)));
                self.project_path = Some(path);
                self.inspector = InspectorState::default();
            }
            Err(e) => self.notify(format!("Could not open project: {e}")),
        }
    }

    fn save_json(&mut self) {
        let Screen::Edit(editor) = &self.screen else {
            return;
        };
        let project = Arc::clone(editor.project());
        let dir = self.export_dir();
        match export::write_project(&project, &dir) {
            Ok(path) => {
                self.notify(format!("Saved {}", path.display()));
                self.project_path = Some(path);
            }
            Err(e) => self.notify(format!("Save failed: {e}")),
        }
    }

    fn request_capture(&mut self, ctx: &egui::Context) {
        if self.canvas_rect.is_positive() {
            self.pending_capture = Some(self.canvas_rect);
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
        }
    }

    fn finish_capture(&mut self, shot: &egui::ColorImage, pixels_per_point: f32) {
        let Some(region) = self.pending_capture.take() else {
            return;
        };
        let Screen::Edit(editor) = &self.screen else {
            return;
        };
        let project = Arc::clone(editor.project());
        let target = project.aspect_ratio.canvas_size().scaled(export::EXPORT_SCALE);
        let capture = canvas::capture_region(shot, region, pixels_per_point, target);
        let dir = self.export_dir();
        match export::write_slide_jpeg(&capture, &dir, &project.topic) {
            Ok(path) => self.notify(format!("Exported {}", path.display())),
            Err(e) => self.notify(format!("Export failed: {e}")),
        }
    }

    // -- input ----------------------------------------------------------------------

    fn handle_keys(&mut self, ctx: &egui::Context) {
        // Text fields keep their own undo.
        if ctx.memory(|m| m.focused().is_some()) {
            return;
        }
        let (undo, redo, save, capture) = ctx.input(|i| {
            let cmd = i.modifiers.command;
            let z = i.key_pressed(egui::Key::Z);
            (
                cmd && z && !i.modifiers.shift,
                cmd && ((z && i.modifiers.shift) || i.key_pressed(egui::Key::Y)),
                cmd && i.key_pressed(egui::Key::S),
                cmd && i.key_pressed(egui::Key::E),
            )
        });
        if let Some(editor) = self.editor_mut() {
            if undo {
                editor.undo();
            }
            if redo {
                editor.redo();
            }
        }
        if save {
            self.save_json();
        }
        if capture {
            self.request_capture(ctx);
        }
    }

    fn handle_canvas_drag(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let rect = self.canvas_rect;
        let Screen::Edit(editor) = &mut self.screen else {
            return;
        };
        let canvas = editor.project().aspect_ratio.canvas_size();

        if response.drag_started() {
            let press = ctx.input(|i| i.pointer.press_origin());
            if let Some(pos) = drag_anchor(press, response.interact_pointer_pos()) {
                if let Some(key) = canvas::hit_test(&self.regions, pos) {
                    editor.begin_drag(key.clone(), canvas::to_canvas(rect, canvas, pos));
                }
            }
        } else if response.dragged() && editor.drag().is_active() {
            if let Some(pos) = response.interact_pointer_pos() {
                editor.drag_to(canvas::to_canvas(rect, canvas, pos));
            }
        } else if response.drag_stopped() {
            editor.end_drag();
        }

        if editor.drag().is_active() {
            let (focused, any_down) = ctx.input(|i| (i.viewport().focused, i.pointer.any_down()));
            if focused == Some(false) || (!any_down && !response.drag_stopped()) {
                log::debug!("Drag cancelled: focus lost or release missed");
                editor.cancel_drag();
            }
        }
    }

    // -- panels ---------------------------------------------------------------------

    fn top_bar(&mut self, ctx: &egui::Context) {
        let mut go_create = false;
        let mut regenerate = None;
        let mut save = false;
        let mut capture = false;
        let busy = self.worker.running;

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Carousel");
                ui.separator();
                if let Screen::Edit(editor) = &mut self.screen {
                    if ui.button("New").clicked() {
                        go_create = true;
                    }
                    if ui
                        .add_enabled(busy.is_none(), egui::Button::new("Regenerate"))
                        .clicked()
                    {
                        let p = editor.project();
                        regenerate = Some((
                            GenerationRequest::new(
                                p.topic.clone(),
                                p.tone,
                                p.requested_slides.max(1),
                                p.language.clone(),
                            ),
                            p.aspect_ratio,
                            p.preset_style,
                        ));
                    }
                    ui.separator();
                    if ui
                        .add_enabled(editor.can_undo(), egui::Button::new("Undo"))
                        .clicked()
                    {
                        editor.undo();
                    }
                    if ui
                        .add_enabled(editor.can_redo(), egui::Button::new("Redo"))
                        .clicked()
                    {
                        editor.redo();
                    }
                    ui.separator();
                    if ui.button("Themes").clicked() {
                        let theme = Theme::find_or_default(&editor.project().theme_id);
                        self.theme_modal = Some(ThemeModal::new(&theme));
                    }
                    if ui.button("Save JSON").clicked() {
                        save = true;
                    }
                    if ui.button("Export JPG").clicked() {
                        capture = true;
                    }
                    ui.label(editor.project().topic.as_str());
                }
                if let Some(label) = busy {
                    ui.separator();
                    ui.spinner();
                    ui.label(label);
                }
            });
        });

        if go_create {
            self.screen = Screen::Create(CreateForm::new(&self.defaults));
            self.project_path = None;
        }
        if let Some((request, aspect, preset)) = regenerate {
            self.start_generation(ctx, request, aspect, preset);
        }
        if save {
            self.save_json();
        }
        if capture {
            self.request_capture(ctx);
        }
    }

    fn slide_rail(&mut self, ctx: &egui::Context) {
        let Screen::Edit(editor) = &mut self.screen else {
            return;
        };
        let images = &self.images;
        let mut selected = None;
        egui::SidePanel::left("slide_rail")
            .exact_width(RAIL_WIDTH)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("+ Slide").clicked() {
                        editor.add_slide();
                        selected = Some(editor.active_index());
                    }
                    let active = editor.active_index();
                    if ui.small_button("Copy").clicked() {
                        editor.duplicate_slide(active);
                        selected = Some(editor.active_index());
                    }
                    if ui
                        .add_enabled(
                            editor.project().slide_count() > 1,
                            egui::Button::new("Delete").small(),
                        )
                        .clicked()
                    {
                        editor.remove_slide(active);
                        selected = Some(editor.active_index());
                    }
                });
                ui.horizontal(|ui| {
                    let active = editor.active_index();
                    if ui.small_button("Up").clicked() {
                        editor.move_slide(active, MoveDirection::Up);
                    }
                    if ui.small_button("Down").clicked() {
                        editor.move_slide(active, MoveDirection::Down);
                    }
                });
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    let canvas = editor.project().aspect_ratio.canvas_size();
                    let width = RAIL_WIDTH - 24.0;
                    let size = egui::vec2(width, width * canvas.height / canvas.width);
                    for index in 0..editor.project().slide_count() {
                        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
                        if let Some(plan) = editor.render_plan(index) {
                            canvas::paint(ui, &plan, images, rect);
                        }
                        let stroke = if index == editor.active_index() {
                            egui::Stroke::new(2.0, ui.visuals().selection.stroke.color)
                        } else {
                            egui::Stroke::new(1.0, ui.visuals().weak_text_color())
                        };
                        ui.painter()
                            .rect_stroke(rect, 4.0, stroke, egui::StrokeKind::Outside);
                        if response.clicked() && editor.select(index) {
                            selected = Some(index);
                        }
                        ui.label(format!("{}", index + 1));
                    }
                });
            });
        if selected.is_some() {
            self.inspector.slide_changed();
        }
    }

    fn inspector_panel(&mut self, ctx: &egui::Context) {
        let busy = self.worker.is_busy();
        let mut action = None;
        if let Screen::Edit(editor) = &mut self.screen {
            let state = &mut self.inspector;
            egui::SidePanel::right("inspector")
                .default_width(INSPECTOR_WIDTH)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        action = inspector::show(ui, editor, state, busy);
                    });
                });
        }
        if let Some(action) = action {
            self.handle_inspector(ctx, action);
        }
    }

    fn canvas_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::from_gray(24)))
            .show(ctx, |ui| {
                let Screen::Edit(editor) = &self.screen else {
                    return;
                };
                let canvas = editor.project().aspect_ratio.canvas_size();
                let available = ui.max_rect().shrink(CANVAS_MARGIN);
                let rect = canvas::fit_canvas(available, canvas);
                let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
                self.canvas_rect = rect;
                self.handle_canvas_drag(ctx, &response);

                let Screen::Edit(editor) = &self.screen else {
                    return;
                };
                if let Some(plan) = editor.active_plan() {
                    self.regions = canvas::paint(ui, &plan, &self.images, rect);
                }
                if self.pending_capture.is_none() {
                    if let Some(key) = editor.drag().dragging() {
                        if let Some(region) = self.regions.iter().find(|r| &r.key == key) {
                            ui.painter().rect_stroke(
                                region.rect.expand(2.0),
                                2.0,
                                egui::Stroke::new(1.0, egui::Color32::from_rgb(0x13, 0x5b, 0xec)),
                                egui::StrokeKind::Outside,
                            );
                        }
                    } else if let Some(pos) = response.hover_pos() {
                        if canvas::hit_test(&self.regions, pos).is_some() {
                            ctx.set_cursor_icon(egui::CursorIcon::Grab);
                        }
                    }
                }
            });
    }

    fn create_panel(&mut self, ctx: &egui::Context) {
        let busy = self.worker.is_busy();
        let mut action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Screen::Create(form) = &mut self.screen {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    action = form.show(ui, busy);
                });
            }
        });
        match action {
            Some(CreateAction::Generate {
                request,
                aspect,
                preset,
            }) => self.start_generation(ctx, request, aspect, preset),
            Some(CreateAction::Open(path)) => self.open_project(PathBuf::from(path)),
            None => {}
        }
    }

    fn draw_toast(&mut self, ctx: &egui::Context) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }
        let Some(toast) = &self.toast else {
            return;
        };
        let opacity = toast.opacity();
        egui::Area::new(egui::Id::new("toast"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -32.0))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(egui::Color32::from_black_alpha((220.0 * opacity) as u8))
                    .corner_radius(8.0)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.colored_label(
                            egui::Color32::WHITE.gamma_multiply(opacity),
                            &toast.message,
                        );
                    });
            });
        ctx.request_repaint();
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Some(result) = self.worker.poll() {
            self.handle_job(result);
        }

        let mut shot = None;
        ctx.input(|i| {
            for event in &i.events {
                if let egui::Event::Screenshot { image, .. } = event {
                    shot = Some((Arc::clone(image), i.pixels_per_point));
                }
            }
        });
        if let Some((image, ppp)) = shot {
            self.finish_capture(&image, ppp);
        }

        self.handle_keys(ctx);
        self.top_bar(ctx);

        if matches!(self.screen, Screen::Create(_)) {
            self.create_panel(ctx);
        } else {
            self.slide_rail(ctx);
            self.inspector_panel(ctx);
            self.canvas_panel(ctx);
        }

        if let Some(modal) = &mut self.theme_modal {
            let active = match &self.screen {
                Screen::Edit(editor) => editor.project().theme_id.clone(),
                Screen::Create(_) => String::new(),
            };
            match modal.show(ctx, &active) {
                Some(ThemeChoice::Apply(theme)) => {
                    if let Some(editor) = self.editor_mut() {
                        editor.apply_theme(&theme);
                    }
                    self.theme_modal = None;
                    self.notify(format!("Theme: {}", theme.name));
                }
                Some(ThemeChoice::Close) => self.theme_modal = None,
                None => {}
            }
        }

        self.draw_toast(ctx);
    }
}

/// Window icon: three stacked cards in the default accent.
fn app_icon() -> egui::IconData {
    let size = 64u32;
    let img = image::RgbaImage::from_fn(size, size, |x, y| {
        let card = |ox: u32, oy: u32, shade: u8| {
            let inside = (ox..ox + 36).contains(&x) && (oy..oy + 44).contains(&y);
            inside.then_some(shade)
        };
        let hit = card(22, 4, 0xec).or(card(14, 10, 0xb0)).or(card(6, 16, 0x80));
        match hit {
            Some(shade) => image::Rgba([0x13, 0x5b, shade, 0xff]),
            None => image::Rgba([0, 0, 0, 0]),
        }
    });
    egui::IconData {
        rgba: img.into_raw(),
        width: size,
        height: size,
    }
}

pub fn run(file: Option<PathBuf>) -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let project = match file {
        Some(path) => {
            let project = export::load_project(&path)
                .map_err(|e| anyhow::anyhow!("Failed to open {}: {e}", path.display()))?;
            Some((project, path))
        }
        None => None,
    };

    let title = match &project {
        Some((p, _)) => format!("Carousel - {}", p.topic),
        None => "Carousel".to_string(),
    };

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1440.0, 900.0])
        .with_min_inner_size([960.0, 600.0])
        .with_title(&title)
        .with_icon(Arc::new(app_icon()));

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(EditorApp::new(&config, project)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_toast_fades_then_expires() {
        let fresh = Toast::new("Saved");
        assert_eq!(fresh.opacity(), 1.0);
        assert!(!fresh.is_expired());

        let old = Toast {
            message: "old".into(),
            start: Instant::now() - Duration::from_secs_f32(TOAST_DURATION + 0.1),
        };
        assert_eq!(old.opacity(), 0.0);
        assert!(old.is_expired());
    }

    #[test]
    fn test_worker_refuses_second_job_while_busy() {
        let ctx = egui::Context::default();
        let mut worker = Worker::new(Bridge::offline());
        let (release, gate) = mpsc::channel::<()>();

        let started = worker.spawn(&ctx, "Generating image", move |_| {
            let _ = gate.recv();
            JobResult::Icons {
                slide_id: "s0".into(),
                names: vec!["star".into()],
            }
        });
        assert!(started.is_ok());

        let refused = worker.spawn(&ctx, "Suggesting icons", |_| JobResult::Icons {
            slide_id: "s0".into(),
            names: Vec::new(),
        });
        assert_eq!(refused, Err("Generating image"));

        release.send(()).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut finished = None;
        while finished.is_none() && Instant::now() < deadline {
            finished = worker.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(matches!(finished, Some(JobResult::Icons { .. })));
        assert!(!worker.is_busy());
    }

    #[test]
    fn test_drag_anchors_on_press_point() {
        let press = egui::pos2(100.0, 100.0);
        let past_threshold = egui::pos2(106.0, 103.0);
        assert_eq!(drag_anchor(Some(press), Some(past_threshold)), Some(press));
        assert_eq!(drag_anchor(None, Some(past_threshold)), Some(past_threshold));
        assert_eq!(drag_anchor(None, None), None);
    }

    #[test]
    fn test_app_icon_shape() {
        let icon = app_icon();
        assert_eq!(icon.rgba.len(), (icon.width * icon.height * 4) as usize);
        assert!(icon.rgba.chunks(4).any(|px| px[3] == 0xff));
    }
}
