use super::*;
use crate::store::{MoveDirection, SlidePatch};

#[test]
fn test_single_slide_cannot_be_deleted() {
    let mut editor = editor(1);
    let before = editor.history().len();
    assert!(!editor.remove_slide(0));
    assert_eq!(editor.project().slide_count(), 1);
    assert_eq!(editor.project().slides.len(), 1);
    assert_eq!(editor.history().len(), before);
}

#[test]
fn test_delete_down_to_one_then_refuse() {
    let mut editor = editor(3);
    assert!(editor.remove_slide(2));
    assert!(editor.remove_slide(0));
    assert!(!editor.remove_slide(0));
    assert_eq!(titles(&editor), vec!["Slide 1"]);
}

#[test]
fn test_duplicate_is_independent() {
    let mut editor = editor(2);
    assert!(editor.duplicate_slide(0));
    assert_eq!(editor.project().slide_count(), 3);

    let original = editor.project().slides[0].id.clone();
    let copy = editor.project().slides[1].id.clone();
    assert_ne!(original, copy);
    assert_eq!(titles(&editor), vec!["Slide 0", "Slide 0", "Slide 1"]);

    assert!(editor.patch_slide(&copy, SlidePatch::title("Copy")));
    assert_eq!(titles(&editor), vec!["Slide 0", "Copy", "Slide 1"]);

    assert!(editor.patch_slide(&original, SlidePatch::title("Original")));
    assert_eq!(titles(&editor), vec!["Original", "Copy", "Slide 1"]);
}

#[test]
fn test_duplicate_renews_nested_identities() {
    let mut editor = editor(1);
    assert!(editor.add_icon("rocket"));
    assert!(editor.add_extra_text("Swipe"));
    assert!(editor.duplicate_slide(0));

    let project = editor.project();
    let (a, b) = (&project.slides[0], &project.slides[1]);
    assert_ne!(a.additional_assets[0].id, b.additional_assets[0].id);
    assert_ne!(a.additional_texts[0].id, b.additional_texts[0].id);
    assert_eq!(a.additional_assets[0].value, b.additional_assets[0].value);
}

#[test]
fn test_move_at_boundaries_is_noop() {
    let mut editor = editor(3);
    let before = editor.history().len();
    assert!(!editor.move_slide(0, MoveDirection::Up));
    assert!(!editor.move_slide(2, MoveDirection::Down));
    assert_eq!(editor.history().len(), before);

    assert!(editor.move_slide(0, MoveDirection::Down));
    assert_eq!(titles(&editor), vec!["Slide 1", "Slide 0", "Slide 2"]);
}

#[test]
fn test_slide_count_follows_every_structural_edit() {
    let mut editor = editor(2);
    assert!(editor.add_slide());
    assert!(editor.duplicate_slide(1));
    assert!(editor.remove_slide(0));
    let project = editor.project();
    assert_eq!(project.slide_count(), project.slides.len());
    assert_eq!(project.slide_count(), 3);
}

#[test]
fn test_new_slide_defaults() {
    let mut editor = editor(2);
    assert!(editor.add_slide());
    let slide = editor.project().slides.last().cloned().unwrap();
    assert_eq!(slide.title, "New Slide");
    assert_eq!(slide.content, "Add your content here");
    assert_eq!(slide.background_image, crate::model::background::FALLBACK_BACKGROUND);
    assert_eq!(slide.background.bg_overlay_opacity, Some(0.4));
    assert!(!slide.enable_text_highlight);
}

