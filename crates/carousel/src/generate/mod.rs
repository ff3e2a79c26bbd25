//! Content generation: slide copy, icon suggestions and background images
//! from an AI service, with a deterministic offline fallback.
//!
//! [`Bridge`] never fails. Any service error is logged and replaced by
//! fallback output of the same shape, so callers cannot tell the two apart.

pub mod fallback;
pub mod gemini;

use serde::Deserialize;
use thiserror::Error;

use crate::model::style::DEFAULT_FONT_FAMILY;
use crate::model::{AspectRatio, Layout, Slide, TextRole, TextStyle, Tone};

pub use gemini::GeminiClient;

/// Maximum icon names kept from one suggestion.
pub const MAX_ICON_SUGGESTIONS: usize = 5;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned HTTP {0}")]
    Status(u16),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    Schema(String),

    #[error("service returned no usable content")]
    Empty,
}

/// One slide's text as the service returns it. All three fields are
/// required; a missing one fails the whole batch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideDraft {
    pub title: String,
    pub content: String,
    pub visual_description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub topic: String,
    pub tone: Tone,
    pub count: usize,
    pub language: String,
}

impl GenerationRequest {
    pub fn new(topic: impl Into<String>, tone: Tone, count: usize, language: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            tone,
            count,
            language: language.into(),
        }
    }

    pub fn system_instruction(&self) -> String {
        format!(
            "You are a social media expert. Create a {}-slide carousel about \"{}\" in {}. Tone: {}.\n\
             Return JSON array of objects: {{ title, content, visualDescription }}.",
            self.count, self.topic, self.language, self.tone
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageKind {
    #[default]
    Background,
    /// A subject cut out on white, for use as a sticker.
    Isolated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    pub style: Option<String>,
    pub aspect: AspectRatio,
    pub kind: ImageKind,
}

impl ImageRequest {
    pub fn background(prompt: impl Into<String>, aspect: AspectRatio) -> Self {
        Self {
            prompt: prompt.into(),
            style: None,
            aspect,
            kind: ImageKind::Background,
        }
    }

    /// Prompt text sent to the image model.
    pub fn full_prompt(&self) -> String {
        let mut prompt = self.prompt.clone();
        if let Some(style) = self.style.as_deref().filter(|s| !s.trim().is_empty()) {
            prompt.push_str(". Style: ");
            prompt.push_str(style);
        }
        if self.kind == ImageKind::Isolated {
            prompt.push_str(". Isolated on white background.");
        }
        prompt
    }
}

/// Base64 image bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    /// CSS background value embedding the image.
    pub fn to_background(&self) -> String {
        format!("url('data:{};base64,{}')", self.mime_type, self.data)
    }
}

/// The external AI collaborator.
pub trait ContentService: Send + Sync {
    fn slide_drafts(&self, request: &GenerationRequest) -> Result<Vec<SlideDraft>, GenerationError>;

    fn icon_names(&self, title: &str, content: &str) -> Result<Vec<String>, GenerationError>;

    fn image(&self, request: &ImageRequest) -> Result<InlineImage, GenerationError>;
}

/// Decorate a draft into a full slide: fresh id, first slide centered,
/// round-robin gradient, documented default styles.
pub fn decorate(index: usize, draft: SlideDraft) -> Slide {
    let mut slide = Slide::with_text(crate::store::new_id(), draft.title, draft.content);
    slide.visual_description = draft.visual_description;
    slide.layout = if index == 0 {
        Layout::TitleCenter
    } else {
        Layout::Split
    };
    slide.background_image = fallback::gradient_for(index).to_string();
    slide.font_family = Some(DEFAULT_FONT_FAMILY.to_string());
    slide.title_style = TextStyle::documented(TextRole::Title);
    slide.content_style = TextStyle::documented(TextRole::Content);
    slide
}

pub struct Bridge {
    service: Option<Box<dyn ContentService>>,
}

impl Bridge {
    pub fn new(service: impl ContentService + 'static) -> Self {
        Self {
            service: Some(Box::new(service)),
        }
    }

    /// A bridge that always uses the local fallback.
    pub fn offline() -> Self {
        Self { service: None }
    }

    pub fn is_online(&self) -> bool {
        self.service.is_some()
    }

    pub fn generate_slides(&self, request: &GenerationRequest) -> Vec<Slide> {
        let count = request.count.max(1);
        let drafts = match &self.service {
            Some(service) => match service.slide_drafts(request).and_then(validate_drafts) {
                Ok(drafts) => {
                    log::info!("Generated {} slides for \"{}\"", drafts.len(), request.topic);
                    drafts
                }
                Err(e) => {
                    log::warn!("Slide generation failed, using offline copy: {e}");
                    fallback::drafts(count)
                }
            },
            None => {
                log::debug!("No content service configured, using offline copy");
                fallback::drafts(count)
            }
        };
        drafts
            .into_iter()
            .enumerate()
            .map(|(i, d)| decorate(i, d))
            .collect()
    }

    pub fn suggest_icons(&self, title: &str, content: &str) -> Vec<String> {
        let Some(service) = &self.service else {
            return fallback::icons();
        };
        match service.icon_names(title, content) {
            Ok(names) => {
                let names = clean_icon_names(names);
                if names.is_empty() {
                    log::warn!("Icon suggestion returned nothing usable, using defaults");
                    fallback::icons()
                } else {
                    names
                }
            }
            Err(e) => {
                log::warn!("Icon suggestion failed, using defaults: {e}");
                fallback::icons()
            }
        }
    }

    /// Background value for the generated image, or a seeded placeholder.
    pub fn generate_image(&self, request: &ImageRequest) -> String {
        let Some(service) = &self.service else {
            return fallback::placeholder_image(&request.prompt);
        };
        match service.image(request) {
            Ok(image) => image.to_background(),
            Err(e) => {
                log::warn!("Image generation failed, using placeholder: {e}");
                fallback::placeholder_image(&request.prompt)
            }
        }
    }
}

fn validate_drafts(drafts: Vec<SlideDraft>) -> Result<Vec<SlideDraft>, GenerationError> {
    if drafts.is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(drafts)
}

fn clean_icon_names(names: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let name = name.trim().to_string();
        if !name.is_empty() && !out.contains(&name) {
            out.push(name);
        }
    }
    out.truncate(MAX_ICON_SUGGESTIONS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_prompt() {
        let mut req = ImageRequest::background("a cat", AspectRatio::Portrait);
        assert_eq!(req.full_prompt(), "a cat");
        req.style = Some("watercolor".into());
        req.kind = ImageKind::Isolated;
        assert_eq!(
            req.full_prompt(),
            "a cat. Style: watercolor. Isolated on white background."
        );
    }

    #[test]
    fn test_decorate_alternates_layout() {
        let draft = SlideDraft {
            title: "t".into(),
            content: "c".into(),
            visual_description: "v".into(),
        };
        assert_eq!(decorate(0, draft.clone()).layout, Layout::TitleCenter);
        let second = decorate(1, draft);
        assert_eq!(second.layout, Layout::Split);
        assert_eq!(second.background_image, fallback::gradient_for(1));
        assert_eq!(second.title_style.font_size, Some(48.0));
    }

    #[test]
    fn test_clean_icon_names() {
        let names = clean_icon_names(
            ["a", " b ", "", "a", "c", "d", "e", "f"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_draft_requires_every_field() {
        let err = serde_json::from_str::<Vec<SlideDraft>>(r#"[{"title":"t","content":"c"}]"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_inline_image_background() {
        let image = InlineImage {
            mime_type: "image/png".into(),
            data: "AAAA".into(),
        };
        assert_eq!(image.to_background(), "url('data:image/png;base64,AAAA')");
    }
}
