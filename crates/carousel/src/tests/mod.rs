mod compositor;
mod store;

use std::sync::Mutex;

use crate::editor::Editor;
use crate::generate::{ContentService, GenerationError, GenerationRequest, ImageRequest, InlineImage, SlideDraft};
use crate::model::{Project, Slide, Tone};

/// Helper to create a deck of `n` slides titled `Slide 0..n`.
fn deck(n: usize) -> Project {
    let slides = (0..n)
        .map(|i| Slide::with_text(format!("s{i}"), format!("Slide {i}"), format!("Body {i}")))
        .collect();
    Project::new("Testing", Tone::Professional, n, "English", slides)
}

/// Helper to create an editor on a fresh deck.
fn editor(n: usize) -> Editor {
    Editor::new(deck(n))
}

fn titles(editor: &Editor) -> Vec<String> {
    editor
        .project()
        .slides
        .iter()
        .map(|s| s.title.clone())
        .collect()
}

fn draft(title: &str) -> SlideDraft {
    SlideDraft {
        title: title.to_string(),
        content: format!("{title} body"),
        visual_description: format!("{title} visual"),
    }
}

/// In-memory content service. Every call returns the scripted outcome and
/// bumps a counter.
#[derive(Default)]
struct ScriptedService {
    drafts: Option<Vec<SlideDraft>>,
    icons: Option<Vec<String>>,
    image: Option<InlineImage>,
    calls: Mutex<usize>,
}

impl ScriptedService {
    /// A service whose every call fails.
    fn failing() -> Self {
        Self::default()
    }

    fn with_drafts(drafts: Vec<SlideDraft>) -> Self {
        Self {
            drafts: Some(drafts),
            ..Self::default()
        }
    }

    fn with_icons(icons: &[&str]) -> Self {
        Self {
            icons: Some(icons.iter().map(|s| s.to_string()).collect()),
            ..Self::default()
        }
    }

    fn with_image(mime_type: &str, data: &str) -> Self {
        Self {
            image: Some(InlineImage {
                mime_type: mime_type.to_string(),
                data: data.to_string(),
            }),
            ..Self::default()
        }
    }

    fn bump(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            *calls += 1;
        }
    }
}

impl ContentService for ScriptedService {
    fn slide_drafts(&self, _request: &GenerationRequest) -> Result<Vec<SlideDraft>, GenerationError> {
        self.bump();
        self.drafts
            .clone()
            .ok_or_else(|| GenerationError::Transport("scripted failure".into()))
    }

    fn icon_names(&self, _title: &str, _content: &str) -> Result<Vec<String>, GenerationError> {
        self.bump();
        self.icons.clone().ok_or(GenerationError::Status(503))
    }

    fn image(&self, _request: &ImageRequest) -> Result<InlineImage, GenerationError> {
        self.bump();
        self.image.clone().ok_or(GenerationError::Empty)
    }
}
