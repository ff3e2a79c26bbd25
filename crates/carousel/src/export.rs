//! Project JSON export/import and slide JPEG encoding.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use image::codecs::jpeg::JpegEncoder;
use regex::Regex;
use thiserror::Error;

use crate::model::Project;

/// Rasterized exports are captured at twice the canvas size.
pub const EXPORT_SCALE: f32 = 2.0;
pub const JPEG_QUALITY: u8 = 90;

static WHITESPACE: OnceLock<Regex> = OnceLock::new();
static UNSAFE_CHARS: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("captured image is empty")]
    EmptyCapture,

    #[error("project has no slides")]
    EmptyDeck,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// `"Growth Hacks  101"` + `".json"` → `Growth_Hacks_101.json`.
///
/// Path separators and other characters filesystems reject become `_`, and
/// leading dots are dropped, so the name always stays inside the target
/// directory.
pub fn export_filename(topic: &str, suffix: &str) -> String {
    let whitespace =
        WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("invalid whitespace regex"));
    let unsafe_chars = UNSAFE_CHARS.get_or_init(|| {
        Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).expect("invalid filename regex")
    });
    let stem = whitespace.replace_all(topic.trim(), "_");
    let stem = unsafe_chars.replace_all(&stem, "_");
    let stem = stem.trim_start_matches('.');
    let stem = if stem.is_empty() { "carousel" } else { stem };
    format!("{stem}{suffix}")
}

pub fn json_filename(topic: &str) -> String {
    export_filename(topic, ".json")
}

pub fn slide_filename(topic: &str) -> String {
    export_filename(topic, "_slide.jpg")
}

pub fn project_to_json(project: &Project) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(project)?)
}

/// Write the project into `dir` under its export name.
pub fn write_project(project: &Project, dir: &Path) -> Result<PathBuf, ExportError> {
    let json = project_to_json(project)?;
    std::fs::create_dir_all(dir).map_err(io_error(dir))?;
    let path = dir.join(json_filename(&project.topic));
    std::fs::write(&path, json).map_err(io_error(&path))?;
    log::info!("Saved project to {}", path.display());
    Ok(path)
}

pub fn project_from_json(json: &str) -> Result<Project, ExportError> {
    let project: Project = serde_json::from_str(json)?;
    if project.slides.is_empty() {
        return Err(ExportError::EmptyDeck);
    }
    Ok(project)
}

pub fn load_project(path: &Path) -> Result<Project, ExportError> {
    let json = std::fs::read_to_string(path).map_err(io_error(path))?;
    project_from_json(&json)
}

/// JPEG bytes of an RGBA capture, alpha flattened onto black.
pub fn encode_jpeg(capture: &image::RgbaImage, quality: u8) -> Result<Vec<u8>, ExportError> {
    if capture.width() == 0 || capture.height() == 0 {
        return Err(ExportError::EmptyCapture);
    }
    let rgb = image::RgbImage::from_fn(capture.width(), capture.height(), |x, y| {
        let [r, g, b, a] = capture.get_pixel(x, y).0;
        let k = a as u16;
        let mix = |c: u8| ((c as u16 * k + 127) / 255) as u8;
        image::Rgb([mix(r), mix(g), mix(b)])
    });
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality).encode_image(&rgb)?;
    Ok(bytes)
}

/// Encode first, then write, so a failed encode leaves no file behind.
pub fn write_slide_jpeg(
    capture: &image::RgbaImage,
    dir: &Path,
    topic: &str,
) -> Result<PathBuf, ExportError> {
    let bytes = encode_jpeg(capture, JPEG_QUALITY)?;
    std::fs::create_dir_all(dir).map_err(io_error(dir))?;
    let path = dir.join(slide_filename(topic));
    std::fs::write(&path, bytes).map_err(io_error(&path))?;
    log::info!("Saved slide image to {}", path.display());
    Ok(path)
}
