//! Keyed drag-positioning protocol shared by every movable slide element.
//!
//! A session starts with [`DragEngine::begin`], which freezes the committed
//! position of every element into a live table. Pointer moves then rewrite
//! only the dragged element's live entry as `pointer - offset`, and
//! [`DragEngine::end`] hands back the single position to commit.

use std::collections::BTreeMap;

use crate::model::{BrandConfig, ElementKey, Position, Slide};

#[derive(Debug, Clone, PartialEq)]
struct DragSession {
    key: ElementKey,
    /// Pointer minus element position at the moment the drag began.
    offset: Position,
}

/// Final position of a finished drag, ready for the store.
#[derive(Debug, Clone, PartialEq)]
pub struct DragCommit {
    pub key: ElementKey,
    pub position: Position,
}

#[derive(Debug, Default)]
pub struct DragEngine {
    session: Option<DragSession>,
    live: BTreeMap<ElementKey, Position>,
}

/// Committed position of every draggable element on `slide`, brand included.
pub fn snapshot_positions(slide: &Slide, brand: &BrandConfig) -> BTreeMap<ElementKey, Position> {
    let mut positions: BTreeMap<ElementKey, Position> = slide
        .element_keys()
        .into_iter()
        .map(|key| {
            let pos = Position::or_origin(slide.committed_position(&key));
            (key, pos)
        })
        .collect();
    positions.insert(ElementKey::Brand, Position::or_origin(brand.position));
    positions
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging `key`. Ignored while another drag is active.
    ///
    /// `element` is the element's current position; `snapshot` holds the
    /// committed positions of everything on the slide.
    pub fn begin(
        &mut self,
        key: ElementKey,
        pointer: Position,
        element: Position,
        snapshot: BTreeMap<ElementKey, Position>,
    ) -> bool {
        if self.session.is_some() {
            log::trace!("drag of {key} ignored, another drag is active");
            return false;
        }
        log::debug!("drag begin {key} at ({}, {})", pointer.x, pointer.y);
        self.live = snapshot;
        self.live.insert(key.clone(), element);
        self.session = Some(DragSession {
            key,
            offset: pointer - element,
        });
        true
    }

    /// Recompute the dragged element from the latest pointer sample.
    pub fn pointer_move(&mut self, pointer: Position) -> Option<Position> {
        let session = self.session.as_ref()?;
        let position = pointer - session.offset;
        self.live.insert(session.key.clone(), position);
        Some(position)
    }

    /// Close the session and return what to commit.
    pub fn end(&mut self) -> Option<DragCommit> {
        let session = self.session.take()?;
        let position = self
            .live
            .get(&session.key)
            .copied()
            .unwrap_or(Position::ORIGIN);
        self.live.clear();
        log::debug!(
            "drag end {} at ({}, {})",
            session.key,
            position.x,
            position.y
        );
        Some(DragCommit {
            key: session.key,
            position,
        })
    }

    /// Drop the session without committing anything.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!("drag of {} cancelled", session.key);
        }
        self.live.clear();
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn dragging(&self) -> Option<&ElementKey> {
        self.session.as_ref().map(|s| &s.key)
    }

    /// Transient positions; empty when no drag is active.
    pub fn live_positions(&self) -> &BTreeMap<ElementKey, Position> {
        &self.live
    }

    /// Position to render for `key`: the live entry during a drag,
    /// otherwise the committed one.
    pub fn resolve(&self, key: &ElementKey, committed: Option<Position>) -> Position {
        if self.session.is_some() {
            if let Some(live) = self.live.get(key) {
                return *live;
            }
        }
        Position::or_origin(committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(engine: &mut DragEngine, key: ElementKey, pointer: (f32, f32), element: (f32, f32)) {
        engine.begin(
            key,
            Position::new(pointer.0, pointer.1),
            Position::new(element.0, element.1),
            BTreeMap::new(),
        );
    }

    #[test]
    fn test_commit_is_pointer_delta() {
        let mut engine = DragEngine::new();
        start(&mut engine, ElementKey::Title, (100.0, 100.0), (0.0, 0.0));
        engine.pointer_move(Position::new(130.0, 140.0));
        let commit = engine.end().unwrap();
        assert_eq!(commit.key, ElementKey::Title);
        assert_eq!(commit.position, Position::new(30.0, 40.0));
        assert!(!engine.is_active());
    }

    #[test]
    fn test_intermediate_moves_do_not_accumulate() {
        let mut engine = DragEngine::new();
        start(&mut engine, ElementKey::Content, (10.0, 10.0), (5.0, 5.0));
        for (x, y) in [(11.0, 12.0), (300.0, -50.0), (0.0, 0.0), (20.0, 30.0)] {
            engine.pointer_move(Position::new(x, y));
        }
        assert_eq!(engine.end().unwrap().position, Position::new(15.0, 25.0));
    }

    #[test]
    fn test_begin_while_active_is_ignored() {
        let mut engine = DragEngine::new();
        start(&mut engine, ElementKey::Title, (0.0, 0.0), (0.0, 0.0));
        let accepted = engine.begin(
            ElementKey::Brand,
            Position::ORIGIN,
            Position::ORIGIN,
            BTreeMap::new(),
        );
        assert!(!accepted);
        assert_eq!(engine.dragging(), Some(&ElementKey::Title));
    }

    #[test]
    fn test_end_without_session() {
        let mut engine = DragEngine::new();
        assert_eq!(engine.end(), None);
        assert_eq!(engine.pointer_move(Position::new(1.0, 1.0)), None);
    }

    #[test]
    fn test_cancel_discards_session() {
        let mut engine = DragEngine::new();
        start(&mut engine, ElementKey::Title, (0.0, 0.0), (0.0, 0.0));
        engine.pointer_move(Position::new(9.0, 9.0));
        engine.cancel();
        assert_eq!(engine.end(), None);
        assert!(engine.live_positions().is_empty());
    }

    #[test]
    fn test_resolve_prefers_live_only_during_drag() {
        let mut engine = DragEngine::new();
        let committed = Some(Position::new(7.0, 7.0));
        assert_eq!(engine.resolve(&ElementKey::Title, committed), Position::new(7.0, 7.0));
        assert_eq!(engine.resolve(&ElementKey::Title, None), Position::ORIGIN);

        let mut snapshot = BTreeMap::new();
        snapshot.insert(ElementKey::Content, Position::new(3.0, 4.0));
        engine.begin(
            ElementKey::Title,
            Position::new(50.0, 50.0),
            Position::new(7.0, 7.0),
            snapshot,
        );
        engine.pointer_move(Position::new(60.0, 50.0));
        assert_eq!(engine.resolve(&ElementKey::Title, committed), Position::new(17.0, 7.0));
        // others keep their frozen snapshot even if the store changes underneath
        assert_eq!(
            engine.resolve(&ElementKey::Content, Some(Position::new(99.0, 99.0))),
            Position::new(3.0, 4.0)
        );
    }

    #[test]
    fn test_snapshot_includes_every_element() {
        let mut slide = Slide::with_text("s", "t", "c");
        slide.title_position = Some(Position::new(1.0, 2.0));
        slide.additional_texts.push(crate::model::ExtraText {
            id: "x".into(),
            text: "hi".into(),
            position: Position::new(5.0, 6.0),
            font_size: 24.0,
        });
        let snapshot = snapshot_positions(&slide, &BrandConfig::default());
        assert_eq!(snapshot[&ElementKey::Title], Position::new(1.0, 2.0));
        assert_eq!(snapshot[&ElementKey::Content], Position::ORIGIN);
        assert_eq!(snapshot[&ElementKey::Extra("x".into())], Position::new(5.0, 6.0));
        assert_eq!(snapshot[&ElementKey::Brand], Position::ORIGIN);
    }
}
