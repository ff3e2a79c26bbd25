//! Google Gemini client over the public REST API.

use std::time::Duration;

use serde_json::{Value, json};

use super::{ContentService, GenerationError, GenerationRequest, ImageRequest, InlineImage, SlideDraft};

pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

const ICON_INSTRUCTION: &str = "Return a JSON array of 5 Material Symbol icon names \
(e.g., 'rocket_launch', 'trending_up', 'psychology') that best represent the visual concept of this slide.";

pub struct GeminiClient {
    api_key: String,
    text_model: String,
    image_model: String,
    agent: ureq::Agent,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();
        Self {
            api_key: api_key.into(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            agent: config.into(),
        }
    }

    pub fn with_models(mut self, text_model: impl Into<String>, image_model: impl Into<String>) -> Self {
        self.text_model = text_model.into();
        self.image_model = image_model.into();
        self
    }

    fn generate_content(&self, model: &str, body: &Value) -> Result<Value, GenerationError> {
        if self.api_key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }
        let url = format!("{API_BASE}/{model}:generateContent?key={}", self.api_key);
        log::debug!("POST {API_BASE}/{model}:generateContent");

        let response: Value = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json")
            .send_json(body)
            .map_err(map_transport)?
            .body_mut()
            .read_json()
            .map_err(map_transport)?;
        Ok(response)
    }
}

fn map_transport(e: ureq::Error) -> GenerationError {
    match e {
        ureq::Error::StatusCode(code) => GenerationError::Status(code),
        other => GenerationError::Transport(other.to_string()),
    }
}

/// Concatenated text parts of the first candidate.
fn response_text(response: &Value) -> Result<String, GenerationError> {
    let parts = response["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| GenerationError::Schema("no parts in response".to_string()))?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.trim().is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(text)
}

/// Drop a surrounding markdown code fence if the model added one.
fn strip_code_fence(text: &str) -> &str {
    let t = text.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub fn parse_drafts(response: &Value) -> Result<Vec<SlideDraft>, GenerationError> {
    let text = response_text(response)?;
    Ok(serde_json::from_str(strip_code_fence(&text))?)
}

pub fn parse_icon_names(response: &Value) -> Result<Vec<String>, GenerationError> {
    let text = response_text(response)?;
    Ok(serde_json::from_str(strip_code_fence(&text))?)
}

pub fn parse_inline_image(response: &Value) -> Result<InlineImage, GenerationError> {
    let parts = response["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| GenerationError::Schema("no parts in response".to_string()))?;
    for part in parts {
        if let Some(inline) = part.get("inlineData") {
            let data = inline["data"].as_str();
            let mime = inline["mimeType"].as_str().unwrap_or("image/png");
            if let Some(data) = data {
                return Ok(InlineImage {
                    mime_type: mime.to_string(),
                    data: data.to_string(),
                });
            }
        }
    }
    Err(GenerationError::Empty)
}

impl ContentService for GeminiClient {
    fn slide_drafts(&self, request: &GenerationRequest) -> Result<Vec<SlideDraft>, GenerationError> {
        let body = json!({
            "systemInstruction": { "parts": [{ "text": request.system_instruction() }] },
            "contents": [{ "parts": [{ "text": format!("Topic: {}", request.topic) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "title": { "type": "STRING" },
                            "content": { "type": "STRING" },
                            "visualDescription": { "type": "STRING" }
                        },
                        "required": ["title", "content", "visualDescription"]
                    }
                }
            }
        });
        let response = self.generate_content(&self.text_model, &body)?;
        parse_drafts(&response)
    }

    fn icon_names(&self, title: &str, content: &str) -> Result<Vec<String>, GenerationError> {
        let body = json!({
            "systemInstruction": { "parts": [{ "text": ICON_INSTRUCTION }] },
            "contents": [{ "parts": [{ "text": format!("Slide Title: {title}. Content: {content}") }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });
        let response = self.generate_content(&self.text_model, &body)?;
        parse_icon_names(&response)
    }

    fn image(&self, request: &ImageRequest) -> Result<InlineImage, GenerationError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": request.full_prompt() }] }],
            "generationConfig": {
                "responseModalities": ["TEXT", "IMAGE"],
                "imageConfig": { "aspectRatio": request.aspect.image_label() }
            }
        });
        let response = self.generate_content(&self.image_model, &body)?;
        parse_inline_image(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_response(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    #[test]
    fn test_parse_drafts() {
        let resp = text_response(
            r#"[{"title":"A","content":"B","visualDescription":"C"},{"title":"D","content":"E","visualDescription":"F"}]"#,
        );
        let drafts = parse_drafts(&resp).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[1].visual_description, "F");
    }

    #[test]
    fn test_parse_drafts_inside_code_fence() {
        let resp = text_response("```json\n[{\"title\":\"A\",\"content\":\"B\",\"visualDescription\":\"C\"}]\n```");
        assert_eq!(parse_drafts(&resp).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_field_fails_batch() {
        let resp = text_response(r#"[{"title":"A","content":"B"}]"#);
        assert!(matches!(parse_drafts(&resp), Err(GenerationError::Json(_))));
    }

    #[test]
    fn test_no_candidates_is_schema_error() {
        assert!(matches!(
            parse_drafts(&json!({})),
            Err(GenerationError::Schema(_))
        ));
    }

    #[test]
    fn test_parse_inline_image() {
        let resp = json!({ "candidates": [{ "content": { "parts": [
            { "text": "here you go" },
            { "inlineData": { "mimeType": "image/jpeg", "data": "QUJD" } }
        ] } }] });
        let image = parse_inline_image(&resp).unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, "QUJD");
        assert!(matches!(
            parse_inline_image(&text_response("no image")),
            Err(GenerationError::Empty)
        ));
    }

    #[test]
    fn test_missing_key_short_circuits() {
        let client = GeminiClient::new("");
        let req = GenerationRequest::new("t", crate::model::Tone::Witty, 3, "English");
        assert!(matches!(
            client.slide_drafts(&req),
            Err(GenerationError::MissingApiKey)
        ));
    }
}
