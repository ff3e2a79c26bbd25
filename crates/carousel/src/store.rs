//! The authoritative in-memory project and its mutation operations.
//!
//! Every mutation builds a new [`Project`] value and swaps it in, so earlier
//! snapshots held by the history are never touched. Unchanged slides are
//! shared between snapshots through `Arc`. Refused mutations return `None`
//! and leave the current project in place.
//!
//! The store does not record history itself; the caller pushes each
//! returned snapshot.

use std::sync::Arc;

use crate::model::background::{BackgroundSettings, FALLBACK_BACKGROUND};
use crate::model::style::DEFAULT_FONT_FAMILY;
use crate::model::{
    AiAsset, AspectRatio, AssetKind, Border, BrandConfig, ElementKey, ExtraText, Layout,
    Position, PresetStyle, Project, Slide, TextRole, TextStyle, Tone, DEFAULT_OVERLAY_OPACITY,
};
use crate::theme::Theme;

/// Where a newly accepted icon lands.
const NEW_ASSET_POSITION: Position = Position { x: 50.0, y: 50.0 };
const NEW_ASSET_SIZE: f32 = 64.0;
const NEW_ASSET_Z_INDEX: i32 = 20;
const NEW_EXTRA_TEXT_POSITION: Position = Position { x: 40.0, y: 40.0 };
const NEW_EXTRA_TEXT_SIZE: f32 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Partial update of project-level fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub topic: Option<String>,
    pub tone: Option<Tone>,
    pub language: Option<String>,
    pub requested_slides: Option<usize>,
    pub theme_id: Option<String>,
    pub primary_color: Option<String>,
    pub preset_style: Option<PresetStyle>,
    pub aspect_ratio: Option<AspectRatio>,
    pub brand_config: Option<BrandConfig>,
}

impl ProjectPatch {
    fn apply(self, project: &mut Project) {
        if let Some(v) = self.topic {
            project.topic = v;
        }
        if let Some(v) = self.tone {
            project.tone = v;
        }
        if let Some(v) = self.language {
            project.language = v;
        }
        if let Some(v) = self.requested_slides {
            project.requested_slides = v;
        }
        if let Some(v) = self.theme_id {
            project.theme_id = v;
        }
        if let Some(v) = self.primary_color {
            project.primary_color = v;
        }
        if let Some(v) = self.preset_style {
            project.preset_style = v;
        }
        if let Some(v) = self.aspect_ratio {
            project.aspect_ratio = v;
        }
        if let Some(v) = self.brand_config {
            project.brand_config = v;
        }
    }
}

/// Partial update of one slide. Set fields replace the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlidePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub second_content: Option<String>,
    pub visual_description: Option<String>,
    pub background_image: Option<String>,
    pub layout: Option<Layout>,
    pub title_style: Option<TextStyle>,
    pub content_style: Option<TextStyle>,
    pub font_family: Option<String>,
    pub background: Option<BackgroundSettings>,
    pub enable_text_highlight: Option<bool>,
    pub highlight_color: Option<String>,
    pub highlight_opacity: Option<f32>,
    pub corner_radius: Option<f32>,
    pub border: Option<Border>,
    pub additional_assets: Option<Vec<AiAsset>>,
    pub additional_texts: Option<Vec<ExtraText>>,
    pub title_position: Option<Position>,
    pub content_position: Option<Position>,
}

impl SlidePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    fn apply(self, slide: &mut Slide) {
        if let Some(v) = self.title {
            slide.title = v;
        }
        if let Some(v) = self.content {
            slide.content = v;
        }
        if let Some(v) = self.second_content {
            slide.second_content = Some(v);
        }
        if let Some(v) = self.visual_description {
            slide.visual_description = v;
        }
        if let Some(v) = self.background_image {
            slide.background_image = v;
        }
        if let Some(v) = self.layout {
            slide.layout = v;
        }
        if let Some(v) = self.title_style {
            slide.title_style = v;
        }
        if let Some(v) = self.content_style {
            slide.content_style = v;
        }
        if let Some(v) = self.font_family {
            slide.font_family = Some(v);
        }
        if let Some(v) = self.background {
            slide.background = v;
        }
        if let Some(v) = self.enable_text_highlight {
            slide.enable_text_highlight = v;
        }
        if let Some(v) = self.highlight_color {
            slide.highlight_color = Some(v);
        }
        if let Some(v) = self.highlight_opacity {
            slide.highlight_opacity = Some(v.clamp(0.0, 1.0));
        }
        if let Some(v) = self.corner_radius {
            slide.corner_radius = Some(v);
        }
        if let Some(v) = self.border {
            slide.border = Some(v);
        }
        if let Some(v) = self.additional_assets {
            slide.additional_assets = v;
        }
        if let Some(v) = self.additional_texts {
            slide.additional_texts = v;
        }
        if let Some(v) = self.title_position {
            slide.title_position = Some(v);
        }
        if let Some(v) = self.content_position {
            slide.content_position = Some(v);
        }
    }
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Slide appended by "add slide": copies the last background and the
/// first slide's font.
pub fn blank_slide(project: &Project) -> Slide {
    let mut slide = Slide::with_text(new_id(), "New Slide", "Add your content here");
    slide.visual_description = "Empty slide".to_string();
    slide.layout = Layout::Split;
    slide.title_style = TextStyle::documented(TextRole::Title);
    slide.content_style = TextStyle::documented(TextRole::Content);
    slide.background_image = project
        .slides
        .last()
        .map(|s| s.background_image.clone())
        .filter(|bg| !bg.is_empty())
        .unwrap_or_else(|| FALLBACK_BACKGROUND.to_string());
    slide.font_family = Some(
        project
            .slides
            .first()
            .map(|s| s.font_family_or_default().to_string())
            .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string()),
    );
    slide.background.bg_overlay_opacity = Some(DEFAULT_OVERLAY_OPACITY);
    slide.background.bg_blur = Some(0.0);
    slide.enable_text_highlight = false;
    slide
}

pub struct Store {
    project: Arc<Project>,
}

impl Store {
    pub fn new(project: Project) -> Self {
        Self {
            project: Arc::new(project),
        }
    }

    pub fn project(&self) -> &Arc<Project> {
        &self.project
    }

    /// Point the store at an existing snapshot (undo/redo).
    pub fn restore(&mut self, snapshot: Arc<Project>) {
        self.project = snapshot;
    }

    /// Build the next project from a copy of the current one. `f` returns
    /// false to refuse; the current project is then kept.
    fn mutate(&mut self, f: impl FnOnce(&mut Project) -> bool) -> Option<Arc<Project>> {
        let mut next = Project::clone(&self.project);
        if !f(&mut next) {
            return None;
        }
        self.project = Arc::new(next);
        Some(Arc::clone(&self.project))
    }

    /// Edit one slide in place within the next project.
    pub fn update_slide(
        &mut self,
        slide_id: &str,
        f: impl FnOnce(&mut Slide) -> bool,
    ) -> Option<Arc<Project>> {
        self.mutate(|project| {
            let Some(index) = project.slide_index(slide_id) else {
                return false;
            };
            f(Arc::make_mut(&mut project.slides[index]))
        })
    }

    pub fn replace(&mut self, project: Project) -> Arc<Project> {
        self.project = Arc::new(project);
        Arc::clone(&self.project)
    }

    pub fn patch_project(&mut self, patch: ProjectPatch) -> Option<Arc<Project>> {
        self.mutate(|project| {
            patch.apply(project);
            true
        })
    }

    pub fn patch_slide(&mut self, slide_id: &str, patch: SlidePatch) -> Option<Arc<Project>> {
        self.update_slide(slide_id, |slide| {
            patch.apply(slide);
            true
        })
    }

    pub fn append_slide(&mut self, slide: Slide) -> Option<Arc<Project>> {
        self.mutate(|project| {
            project.slides.push(Arc::new(slide));
            true
        })
    }

    /// Append a [`blank_slide`].
    pub fn add_slide(&mut self) -> Option<Arc<Project>> {
        let slide = blank_slide(&self.project);
        self.append_slide(slide)
    }

    /// Refused when it would leave the deck empty or `index` is out of range.
    pub fn remove_slide(&mut self, index: usize) -> Option<Arc<Project>> {
        self.mutate(|project| {
            if project.slides.len() <= 1 || index >= project.slides.len() {
                return false;
            }
            project.slides.remove(index);
            true
        })
    }

    /// Insert an identity-distinct copy right after `index`.
    ///
    /// The copy owns its own `Slide`, so later edits to either never reach
    /// the other.
    pub fn duplicate_slide(&mut self, index: usize) -> Option<Arc<Project>> {
        self.mutate(|project| {
            let Some(source) = project.slides.get(index) else {
                return false;
            };
            let mut copy = Slide::clone(source);
            copy.id = new_id();
            for asset in &mut copy.additional_assets {
                asset.id = new_id();
            }
            for text in &mut copy.additional_texts {
                text.id = new_id();
            }
            project.slides.insert(index + 1, Arc::new(copy));
            true
        })
    }

    /// Swap with the neighbour. No-op at either end of the deck.
    pub fn move_slide(&mut self, index: usize, direction: MoveDirection) -> Option<Arc<Project>> {
        self.mutate(|project| {
            let len = project.slides.len();
            if index >= len {
                return false;
            }
            let target = match direction {
                MoveDirection::Up if index > 0 => index - 1,
                MoveDirection::Down if index + 1 < len => index + 1,
                _ => return false,
            };
            project.slides.swap(index, target);
            true
        })
    }

    /// Re-stamp every slide with the theme's background and font, and take
    /// its accent. One mutation for the whole deck.
    pub fn apply_theme(&mut self, theme: &Theme) -> Option<Arc<Project>> {
        self.mutate(|project| {
            for slide in &mut project.slides {
                let slide = Arc::make_mut(slide);
                slide.background_image = theme.bg_style.clone();
                slide.font_family = Some(theme.font_family.clone());
            }
            project.theme_id = theme.id.clone();
            project.primary_color = theme.primary_color.clone();
            true
        })
    }

    /// Commit a dragged element's final position. Brand writes to the
    /// project; everything else to the slide, matching assets and extra
    /// texts by identity.
    pub fn commit_position(
        &mut self,
        slide_id: &str,
        key: &ElementKey,
        position: Position,
    ) -> Option<Arc<Project>> {
        if key.is_project_level() {
            return self.mutate(|project| {
                project.brand_config.position = Some(position);
                true
            });
        }
        self.update_slide(slide_id, |slide| slide.set_position(key, position))
    }

    /// Accept a suggested icon onto a slide, colored with the accent.
    pub fn add_asset(&mut self, slide_id: &str, icon: &str) -> Option<Arc<Project>> {
        let accent = self.project.primary_color.clone();
        let icon = icon.trim().to_string();
        if icon.is_empty() {
            return None;
        }
        self.update_slide(slide_id, |slide| {
            slide.additional_assets.push(AiAsset {
                id: new_id(),
                kind: AssetKind::Icon,
                value: icon,
                position: NEW_ASSET_POSITION,
                size: NEW_ASSET_SIZE,
                color: Some(accent),
                rotation: None,
                z_index: Some(NEW_ASSET_Z_INDEX),
            });
            true
        })
    }

    pub fn remove_asset(&mut self, slide_id: &str, asset_id: &str) -> Option<Arc<Project>> {
        self.update_slide(slide_id, |slide| {
            let before = slide.additional_assets.len();
            slide.additional_assets.retain(|a| a.id != asset_id);
            slide.additional_assets.len() != before
        })
    }

    pub fn add_extra_text(&mut self, slide_id: &str, text: &str) -> Option<Arc<Project>> {
        let text = text.to_string();
        self.update_slide(slide_id, |slide| {
            slide.additional_texts.push(ExtraText {
                id: new_id(),
                text,
                position: NEW_EXTRA_TEXT_POSITION,
                font_size: NEW_EXTRA_TEXT_SIZE,
            });
            true
        })
    }

    pub fn remove_extra_text(&mut self, slide_id: &str, text_id: &str) -> Option<Arc<Project>> {
        self.update_slide(slide_id, |slide| {
            let before = slide.additional_texts.len();
            slide.additional_texts.retain(|t| t.id != text_id);
            slide.additional_texts.len() != before
        })
    }

    /// Merge a partial style into the title or body style.
    pub fn update_text_style(
        &mut self,
        slide_id: &str,
        role: TextRole,
        patch: &TextStyle,
    ) -> Option<Arc<Project>> {
        self.update_slide(slide_id, |slide| {
            slide.style_mut(role).merge(patch);
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(n: usize) -> Project {
        let slides = (0..n)
            .map(|i| Slide::with_text(format!("s{i}"), format!("Title {i}"), "Body"))
            .collect();
        Project::new("Topic", Tone::Professional, n, "English", slides)
    }

    fn titles(store: &Store) -> Vec<String> {
        store.project().slides.iter().map(|s| s.title.clone()).collect()
    }

    #[test]
    fn test_mutation_leaves_previous_snapshot_untouched() {
        let mut store = Store::new(deck(2));
        let before = Arc::clone(store.project());
        store.patch_slide("s0", SlidePatch::title("Changed")).unwrap();
        assert_eq!(before.slides[0].title, "Title 0");
        assert_eq!(store.project().slides[0].title, "Changed");
        // untouched slide is shared, not copied
        assert!(Arc::ptr_eq(&before.slides[1], &store.project().slides[1]));
    }

    #[test]
    fn test_patch_unknown_slide_is_refused() {
        let mut store = Store::new(deck(1));
        assert!(store.patch_slide("missing", SlidePatch::title("x")).is_none());
    }

    #[test]
    fn test_remove_last_slide_is_refused() {
        let mut store = Store::new(deck(1));
        assert!(store.remove_slide(0).is_none());
        assert_eq!(store.project().slide_count(), 1);
    }

    #[test]
    fn test_remove_slide() {
        let mut store = Store::new(deck(3));
        store.remove_slide(1).unwrap();
        assert_eq!(titles(&store), vec!["Title 0", "Title 2"]);
        assert!(store.remove_slide(5).is_none());
    }

    #[test]
    fn test_duplicate_inserts_after_source_with_new_identity() {
        let mut store = Store::new(deck(2));
        store.duplicate_slide(0).unwrap();
        let p = store.project();
        assert_eq!(p.slide_count(), 3);
        assert_eq!(p.slides[1].title, "Title 0");
        assert_ne!(p.slides[1].id, p.slides[0].id);
        assert_eq!(p.slides[2].title, "Title 1");
    }

    #[test]
    fn test_move_slide_boundaries_are_noops() {
        let mut store = Store::new(deck(3));
        assert!(store.move_slide(0, MoveDirection::Up).is_none());
        assert!(store.move_slide(2, MoveDirection::Down).is_none());
        store.move_slide(0, MoveDirection::Down).unwrap();
        assert_eq!(titles(&store), vec!["Title 1", "Title 0", "Title 2"]);
    }

    #[test]
    fn test_add_slide_copies_last_background_and_first_font() {
        let mut project = deck(2);
        Arc::make_mut(&mut project.slides[0]).font_family = Some("Anton".into());
        Arc::make_mut(&mut project.slides[1]).background_image = "#ff0000".into();
        let mut store = Store::new(project);
        store.add_slide().unwrap();
        let added = store.project().slides.last().unwrap();
        assert_eq!(added.title, "New Slide");
        assert_eq!(added.background_image, "#ff0000");
        assert_eq!(added.font_family.as_deref(), Some("Anton"));
        assert_eq!(added.layout, Layout::Split);
    }

    #[test]
    fn test_add_slide_without_background_uses_fallback() {
        let mut store = Store::new(deck(1));
        store.add_slide().unwrap();
        assert_eq!(store.project().slides[1].background_image, FALLBACK_BACKGROUND);
    }

    #[test]
    fn test_apply_theme_restamps_every_slide() {
        let mut store = Store::new(deck(3));
        let theme = Theme::find_or_default("luxury-dark");
        store.apply_theme(&theme).unwrap();
        let p = store.project();
        assert_eq!(p.theme_id, "luxury-dark");
        assert_eq!(p.primary_color, "#d4af37");
        assert!(p.slides.iter().all(|s| s.background_image == "#000000"
            && s.font_family.as_deref() == Some("Playfair Display")));
    }

    #[test]
    fn test_commit_brand_position_writes_project() {
        let mut store = Store::new(deck(1));
        store
            .commit_position("s0", &ElementKey::Brand, Position::new(3.0, -4.0))
            .unwrap();
        assert_eq!(
            store.project().brand_config.position,
            Some(Position::new(3.0, -4.0))
        );
    }

    #[test]
    fn test_add_and_remove_asset() {
        let mut store = Store::new(deck(1));
        store.add_asset("s0", "rocket_launch").unwrap();
        let asset = store.project().slides[0].additional_assets[0].clone();
        assert_eq!(asset.position, Position::new(50.0, 50.0));
        assert_eq!(asset.size, 64.0);
        assert_eq!(asset.color.as_deref(), Some("#135bec"));
        assert_eq!(asset.z_index, Some(20));
        assert!(store.remove_asset("s0", "other").is_none());
        store.remove_asset("s0", &asset.id).unwrap();
        assert!(store.project().slides[0].additional_assets.is_empty());
    }

    #[test]
    fn test_update_text_style_merges() {
        let mut store = Store::new(deck(1));
        let bold = TextStyle {
            bold: Some(false),
            ..Default::default()
        };
        store.update_text_style("s0", TextRole::Title, &bold).unwrap();
        let italic = TextStyle {
            italic: Some(true),
            ..Default::default()
        };
        store.update_text_style("s0", TextRole::Title, &italic).unwrap();
        let style = &store.project().slides[0].title_style;
        assert_eq!(style.bold, Some(false));
        assert_eq!(style.italic, Some(true));
    }
}
