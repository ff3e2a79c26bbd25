//! The editing session: store, history and drag engine composed, plus the
//! active-slide cursor the editor screen works against.
//!
//! Every successful store mutation is recorded as one history entry here.
//! Refused mutations record nothing.

use std::sync::Arc;

use crate::compositor::{self, PresentationSettings, RenderPlan};
use crate::drag::{self, DragEngine};
use crate::history::History;
use crate::model::{ElementKey, Position, Project, Slide, TextRole, TextStyle};
use crate::store::{MoveDirection, ProjectPatch, SlidePatch, Store};
use crate::theme::{Theme, ThemeContext};

/// Overlay and blur applied by the low-contrast auto fix.
pub const CONTRAST_FIX_OVERLAY: f32 = 0.7;
pub const CONTRAST_FIX_BLUR: f32 = 10.0;

pub struct Editor {
    store: Store,
    history: History<Arc<Project>>,
    drag: DragEngine,
    active: usize,
}

impl Editor {
    pub fn new(project: Project) -> Self {
        let store = Store::new(project);
        let history = History::with_initial(Arc::clone(store.project()));
        Self {
            store,
            history,
            drag: DragEngine::new(),
            active: 0,
        }
    }

    pub fn project(&self) -> &Arc<Project> {
        self.store.project()
    }

    pub fn theme_context(&self) -> ThemeContext {
        ThemeContext::new(self.project().primary_color.clone())
    }

    pub fn history(&self) -> &History<Arc<Project>> {
        &self.history
    }

    pub fn drag(&self) -> &DragEngine {
        &self.drag
    }

    // -- active slide -------------------------------------------------------

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_slide(&self) -> Option<&Slide> {
        self.project().slides.get(self.active).map(|s| s.as_ref())
    }

    fn active_id(&self) -> Option<String> {
        self.active_slide().map(|s| s.id.clone())
    }

    /// Switch slides. Any drag in progress is cancelled.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.project().slide_count() {
            return false;
        }
        self.drag.cancel();
        self.active = index;
        true
    }

    fn clamp_active(&mut self) {
        let len = self.project().slide_count();
        if self.active >= len {
            self.active = len.saturating_sub(1);
        }
    }

    // -- recording ----------------------------------------------------------

    fn record(&mut self, result: Option<Arc<Project>>) -> bool {
        match result {
            Some(snapshot) => {
                self.history.record(snapshot);
                log::debug!(
                    "history recorded, {} entries at {:?}",
                    self.history.len(),
                    self.history.index()
                );
                true
            }
            None => false,
        }
    }

    /// Start over with a different project. History restarts from it.
    pub fn load(&mut self, project: Project) {
        self.drag.cancel();
        let snapshot = self.store.replace(project);
        self.history.reset(snapshot);
        self.active = 0;
    }

    pub fn undo(&mut self) -> bool {
        self.drag.cancel();
        match self.history.undo() {
            Some(snapshot) => {
                self.store.restore(snapshot);
                self.clamp_active();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.drag.cancel();
        match self.history.redo() {
            Some(snapshot) => {
                self.store.restore(snapshot);
                self.clamp_active();
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // -- project and slide edits ---------------------------------------------

    pub fn replace_project(&mut self, project: Project) -> bool {
        self.drag.cancel();
        let snapshot = self.store.replace(project);
        self.clamp_active();
        self.record(Some(snapshot))
    }

    pub fn patch_project(&mut self, patch: ProjectPatch) -> bool {
        let result = self.store.patch_project(patch);
        self.record(result)
    }

    pub fn patch_slide(&mut self, slide_id: &str, patch: SlidePatch) -> bool {
        let result = self.store.patch_slide(slide_id, patch);
        self.record(result)
    }

    pub fn patch_active(&mut self, patch: SlidePatch) -> bool {
        match self.active_id() {
            Some(id) => self.patch_slide(&id, patch),
            None => false,
        }
    }

    /// Append a blank slide and select it.
    pub fn add_slide(&mut self) -> bool {
        let result = self.store.add_slide();
        if self.record(result) {
            self.active = self.project().slide_count() - 1;
            true
        } else {
            false
        }
    }

    pub fn remove_slide(&mut self, index: usize) -> bool {
        let result = self.store.remove_slide(index);
        if !self.record(result) {
            return false;
        }
        self.drag.cancel();
        if self.active > index || self.active >= self.project().slide_count() {
            self.active = self.active.saturating_sub(1);
        }
        true
    }

    /// Duplicate and select the copy.
    pub fn duplicate_slide(&mut self, index: usize) -> bool {
        let result = self.store.duplicate_slide(index);
        if self.record(result) {
            self.active = index + 1;
            true
        } else {
            false
        }
    }

    /// Move a slide; the selection follows it.
    pub fn move_slide(&mut self, index: usize, direction: MoveDirection) -> bool {
        let result = self.store.move_slide(index, direction);
        if !self.record(result) {
            return false;
        }
        let target = match direction {
            MoveDirection::Up => index - 1,
            MoveDirection::Down => index + 1,
        };
        if self.active == index {
            self.active = target;
        } else if self.active == target {
            self.active = index;
        }
        true
    }

    pub fn apply_theme(&mut self, theme: &Theme) -> bool {
        log::info!("Applying theme {}", theme.id);
        let result = self.store.apply_theme(theme);
        self.record(result)
    }

    pub fn add_icon(&mut self, icon: &str) -> bool {
        let Some(id) = self.active_id() else {
            return false;
        };
        let result = self.store.add_asset(&id, icon);
        self.record(result)
    }

    pub fn remove_asset(&mut self, asset_id: &str) -> bool {
        let Some(id) = self.active_id() else {
            return false;
        };
        let result = self.store.remove_asset(&id, asset_id);
        self.record(result)
    }

    pub fn add_extra_text(&mut self, text: &str) -> bool {
        let Some(id) = self.active_id() else {
            return false;
        };
        let result = self.store.add_extra_text(&id, text);
        self.record(result)
    }

    pub fn remove_extra_text(&mut self, text_id: &str) -> bool {
        let Some(id) = self.active_id() else {
            return false;
        };
        let result = self.store.remove_extra_text(&id, text_id);
        self.record(result)
    }

    pub fn update_text_style(&mut self, role: TextRole, patch: &TextStyle) -> bool {
        let Some(id) = self.active_id() else {
            return false;
        };
        let result = self.store.update_text_style(&id, role, patch);
        self.record(result)
    }

    // -- drag -----------------------------------------------------------------

    /// Begin dragging an element of the active slide. `pointer` is in canvas
    /// pixels.
    pub fn begin_drag(&mut self, key: ElementKey, pointer: Position) -> bool {
        let project = Arc::clone(self.project());
        let Some(slide) = project.slides.get(self.active) else {
            return false;
        };
        let snapshot = drag::snapshot_positions(slide, &project.brand_config);
        let Some(current) = snapshot.get(&key).copied() else {
            log::trace!("no element {key} on the active slide");
            return false;
        };
        self.drag.begin(key, pointer, current, snapshot)
    }

    pub fn drag_to(&mut self, pointer: Position) -> Option<Position> {
        self.drag.pointer_move(pointer)
    }

    /// Finish the drag and commit its position as one history entry. A drag
    /// that ends where it started commits nothing.
    pub fn end_drag(&mut self) -> bool {
        let Some(commit) = self.drag.end() else {
            return false;
        };
        let project = Arc::clone(self.project());
        let Some(slide) = project.slides.get(self.active) else {
            return false;
        };
        let committed = if commit.key.is_project_level() {
            project.brand_config.position
        } else {
            slide.committed_position(&commit.key)
        };
        if Position::or_origin(committed) == commit.position {
            return false;
        }
        let result = self
            .store
            .commit_position(&slide.id, &commit.key, commit.position);
        self.record(result)
    }

    /// Focus loss or a lost pointer release.
    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    // -- rendering ------------------------------------------------------------

    /// Plan for slide `index`; live drag positions apply to the active slide.
    pub fn render_plan(&self, index: usize) -> Option<RenderPlan> {
        let project = self.project();
        let slide = project.slides.get(index)?;
        let theme = self.theme_context();
        let mut settings = PresentationSettings::for_project(project, &theme);
        if index == self.active && self.drag.is_active() {
            settings = settings.with_live(self.drag.live_positions());
        }
        Some(compositor::resolve(slide, &settings))
    }

    pub fn active_plan(&self) -> Option<RenderPlan> {
        self.render_plan(self.active)
    }

    // -- helpers carried over from the editor screen ---------------------------

    pub fn active_low_contrast(&self) -> bool {
        self.active_plan().is_some_and(|p| p.low_contrast())
    }

    /// Darken and blur the active background in one step.
    pub fn fix_contrast(&mut self) -> bool {
        let Some(slide) = self.active_slide() else {
            return false;
        };
        let mut background = slide.background.clone();
        background.bg_overlay_opacity = Some(CONTRAST_FIX_OVERLAY);
        background.bg_blur = Some(CONTRAST_FIX_BLUR);
        self.patch_active(SlidePatch {
            background: Some(background),
            ..Default::default()
        })
    }

    /// Take the dominant color of a logo as the project accent.
    pub fn sync_brand_color(&mut self, logo: &image::RgbaImage) -> bool {
        let color = crate::color::dominant_color(logo);
        log::info!("Brand color extracted: {color}");
        self.patch_project(ProjectPatch {
            primary_color: Some(color),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tone;

    fn editor(n: usize) -> Editor {
        let slides = (0..n)
            .map(|i| Slide::with_text(format!("s{i}"), format!("Title {i}"), "Body"))
            .collect();
        Editor::new(Project::new("Topic", Tone::Witty, n, "English", slides))
    }

    #[test]
    fn test_refused_mutation_records_nothing() {
        let mut ed = editor(1);
        assert!(!ed.remove_slide(0));
        assert_eq!(ed.history().len(), 1);
    }

    #[test]
    fn test_undo_redo_restores_project() {
        let mut ed = editor(2);
        ed.patch_active(SlidePatch::title("Edited"));
        assert!(ed.undo());
        assert_eq!(ed.project().slides[0].title, "Title 0");
        assert!(ed.redo());
        assert_eq!(ed.project().slides[0].title, "Edited");
        assert!(!ed.redo());
    }

    #[test]
    fn test_drag_commits_once() {
        let mut ed = editor(1);
        assert!(ed.begin_drag(ElementKey::Title, Position::new(100.0, 100.0)));
        ed.drag_to(Position::new(110.0, 100.0));
        ed.drag_to(Position::new(130.0, 140.0));
        assert!(ed.end_drag());
        assert_eq!(ed.history().len(), 2);
        assert_eq!(
            ed.project().slides[0].title_position,
            Some(Position::new(30.0, 40.0))
        );
    }

    #[test]
    fn test_drag_without_movement_commits_nothing() {
        let mut ed = editor(1);
        ed.begin_drag(ElementKey::Content, Position::new(5.0, 5.0));
        assert!(!ed.end_drag());
        assert_eq!(ed.history().len(), 1);
    }

    #[test]
    fn test_brand_drag_writes_project() {
        let mut ed = editor(1);
        ed.begin_drag(ElementKey::Brand, Position::new(0.0, 0.0));
        ed.drag_to(Position::new(-10.0, -20.0));
        ed.end_drag();
        assert_eq!(
            ed.project().brand_config.position,
            Some(Position::new(-10.0, -20.0))
        );
    }

    #[test]
    fn test_live_plan_during_drag() {
        let mut ed = editor(1);
        ed.begin_drag(ElementKey::Title, Position::new(0.0, 0.0));
        ed.drag_to(Position::new(12.0, 8.0));
        let plan = ed.active_plan().unwrap();
        assert_eq!(plan.title.offset, Position::new(12.0, 8.0));
        ed.cancel_drag();
        let plan = ed.active_plan().unwrap();
        assert_eq!(plan.title.offset, Position::ORIGIN);
        assert_eq!(ed.history().len(), 1);
    }

    #[test]
    fn test_selection_follows_moves_and_deletes() {
        let mut ed = editor(3);
        ed.select(2);
        ed.move_slide(2, MoveDirection::Up);
        assert_eq!(ed.active_index(), 1);
        ed.remove_slide(0);
        assert_eq!(ed.active_index(), 0);
        assert_eq!(ed.active_slide().unwrap().title, "Title 2");
    }

    #[test]
    fn test_fix_contrast() {
        let mut ed = editor(1);
        ed.patch_active(SlidePatch {
            background_image: Some("#ffffff".into()),
            background: Some(crate::model::BackgroundSettings {
                bg_overlay_opacity: Some(0.0),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert!(ed.active_low_contrast());
        assert!(ed.fix_contrast());
        assert!(!ed.active_low_contrast());
        let bg = &ed.active_slide().unwrap().background;
        assert_eq!(bg.bg_blur, Some(10.0));
    }

    #[test]
    fn test_sync_brand_color() {
        let mut ed = editor(1);
        let logo = image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255]));
        assert!(ed.sync_brand_color(&logo));
        assert_eq!(ed.project().primary_color, "#ff0000");
    }
}
