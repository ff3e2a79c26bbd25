use std::collections::{BTreeMap, HashSet};

use super::*;
use crate::compositor::{self, FloatingKind, PresentationSettings, RenderPlan};
use crate::model::background::{BackgroundFill, BackgroundKind};
use crate::model::{AspectRatio, ElementKey, ExtraText, Layout, Position, PresetStyle};
use crate::theme::ThemeContext;

fn plan(project: &Project, index: usize) -> RenderPlan {
    let theme = ThemeContext::new(project.primary_color.clone());
    let settings = PresentationSettings::for_project(project, &theme);
    compositor::resolve(&project.slides[index], &settings)
}

fn styled_deck() -> Project {
    let mut project = deck(3);
    project.preset_style = PresetStyle::Card;
    let slide = std::sync::Arc::make_mut(&mut project.slides[1]);
    slide.background_image = "linear-gradient(135deg, #135bec 0%, #2ecc71 100%)".into();
    slide.enable_text_highlight = true;
    slide.title_position = Some(Position::new(4.0, -2.5));
    slide.additional_texts.push(ExtraText {
        id: "x".into(),
        text: "Swipe".into(),
        position: Position::new(10.0, 20.0),
        font_size: 24.0,
    });
    project
}

#[test]
fn test_resolve_is_pure() {
    let project = styled_deck();
    for index in 0..project.slide_count() {
        let first = serde_json::to_string(&plan(&project, index)).unwrap();
        let second = serde_json::to_string(&plan(&project, index)).unwrap();
        assert_eq!(first, second, "slide {index}");
    }
}

#[test]
fn test_resolve_does_not_touch_inputs() {
    let project = styled_deck();
    let before = serde_json::to_string(&project).unwrap();
    let _ = plan(&project, 1);
    assert_eq!(serde_json::to_string(&project).unwrap(), before);
}

#[test]
fn test_every_aspect_has_distinct_canvas() {
    let mut seen = HashSet::new();
    for aspect in AspectRatio::all() {
        let size = aspect.canvas_size();
        assert!(size.width > 0.0 && size.height > 0.0, "{aspect:?}");
        assert!(seen.insert((size.width as u32, size.height as u32)), "{aspect:?}");

        let mut project = deck(1);
        project.aspect_ratio = *aspect;
        assert_eq!(plan(&project, 0).canvas, size);
    }
    assert_eq!(seen.len(), 3);
}

#[test]
fn test_background_classification_reaches_plan() {
    let cases = [
        ("url('x.png')", BackgroundKind::ImageLike),
        ("linear-gradient(90deg, #000 0%, #fff 100%)", BackgroundKind::ImageLike),
        ("#111318", BackgroundKind::FlatColor),
    ];
    for (value, kind) in cases {
        let mut project = deck(1);
        std::sync::Arc::make_mut(&mut project.slides[0]).background_image = value.into();
        let layer = plan(&project, 0).background;
        assert_eq!(layer.kind, kind, "{value}");
        assert_eq!(layer.value, value);
    }

    let mut project = deck(1);
    std::sync::Arc::make_mut(&mut project.slides[0]).background_image = "url('x.png')".into();
    assert!(matches!(
        plan(&project, 0).background.fill,
        BackgroundFill::Image { ref source } if source == "x.png"
    ));
}

#[test]
fn test_title_center_has_no_body() {
    let mut project = deck(2);
    std::sync::Arc::make_mut(&mut project.slides[0]).layout = Layout::TitleCenter;
    assert!(plan(&project, 0).content.is_none());
    assert!(plan(&project, 1).content.is_some());
}

#[test]
fn test_floating_elements_paint_in_z_order() {
    let mut editor = editor(1);
    assert!(editor.add_extra_text("Swipe"));
    assert!(editor.add_icon("rocket"));
    let plan = editor.active_plan().unwrap();

    let z: Vec<i32> = plan.floating.iter().map(|f| f.z_index).collect();
    assert_eq!(z, vec![20, 30]);
    assert!(matches!(plan.floating[0].kind, FloatingKind::Icon { .. }));
    assert!(matches!(plan.floating[1].kind, FloatingKind::Text { weight: 600, .. }));
    assert!(plan.brand.as_ref().is_some_and(|b| b.z_index > 30));
}

#[test]
fn test_live_positions_override_committed() {
    let project = styled_deck();
    let theme = ThemeContext::new(project.primary_color.clone());
    let mut live = BTreeMap::new();
    live.insert(ElementKey::Title, Position::new(99.0, 1.0));
    let settings = PresentationSettings::for_project(&project, &theme).with_live(&live);
    let plan = compositor::resolve(&project.slides[1], &settings);
    assert_eq!(plan.title.offset, Position::new(99.0, 1.0));
    assert_eq!(plan.floating[0].offset, Position::new(10.0, 20.0));
}

#[test]
fn test_theme_accent_is_threaded_through() {
    let project = deck(1);
    let slide = &project.slides[0];
    let settings_for = |accent: &str| {
        let theme = ThemeContext::new(accent);
        compositor::resolve(slide, &PresentationSettings::for_project(&project, &theme))
    };
    // an empty background paints the accent
    let red = settings_for("#ff0000");
    let blue = settings_for("#0000ff");
    assert_ne!(red.background, blue.background);
    assert_ne!(red.accent, blue.accent);
}

#[test]
fn test_contrast_fix_is_one_edit() {
    let mut editor = editor(1);
    assert!(editor.patch_active(crate::store::SlidePatch {
        background_image: Some("#f5f5f5".into()),
        background: Some(crate::model::background::BackgroundSettings {
            bg_overlay_opacity: Some(0.0),
            ..Default::default()
        }),
        ..Default::default()
    }));
    assert!(editor.active_low_contrast());

    let before = editor.history().len();
    assert!(editor.fix_contrast());
    assert_eq!(editor.history().len(), before + 1);
    let slide = editor.active_slide().unwrap();
    assert_eq!(slide.background.bg_overlay_opacity, Some(0.7));
    assert_eq!(slide.background.bg_blur, Some(10.0));
}
