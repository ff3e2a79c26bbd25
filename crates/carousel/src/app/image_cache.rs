//! Texture cache for backgrounds and brand avatars.
//!
//! Sources are `data:` URIs, http(s) URLs or file paths relative to the
//! project file. Decoding happens on worker threads; the painter asks every
//! frame and gets `None` until the texture is ready.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{Context, Result};
use base64::Engine;
use eframe::egui;

type Decoded = (String, Result<image::RgbaImage>);

pub struct ImageCache {
    base_path: PathBuf,
    textures: RefCell<HashMap<String, Option<egui::TextureHandle>>>,
    pending: RefCell<HashSet<String>>,
    tx: Sender<Decoded>,
    rx: Receiver<Decoded>,
}

impl ImageCache {
    pub fn new(base_path: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            base_path,
            textures: RefCell::new(HashMap::new()),
            pending: RefCell::new(HashSet::new()),
            tx,
            rx,
        }
    }

    /// Texture for `source`, starting a load on first sight.
    pub fn get_or_load(&self, ctx: &egui::Context, source: &str) -> Option<egui::TextureHandle> {
        self.poll(ctx);
        if let Some(entry) = self.textures.borrow().get(source) {
            return entry.clone();
        }
        if self.pending.borrow_mut().insert(source.to_string()) {
            let tx = self.tx.clone();
            let source = source.to_string();
            let base = self.base_path.clone();
            let repaint = ctx.clone();
            std::thread::spawn(move || {
                let result = decode_source(&source, &base);
                let _ = tx.send((source, result));
                repaint.request_repaint();
            });
        }
        None
    }

    /// Whether every requested source has finished loading.
    pub fn is_idle(&self, ctx: &egui::Context) -> bool {
        self.poll(ctx);
        self.pending.borrow().is_empty()
    }

    fn poll(&self, ctx: &egui::Context) {
        while let Ok((source, result)) = self.rx.try_recv() {
            self.pending.borrow_mut().remove(&source);
            let texture = match result {
                Ok(rgba) => {
                    let size = [rgba.width() as usize, rgba.height() as usize];
                    let color = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
                    Some(ctx.load_texture(short_name(&source), color, egui::TextureOptions::LINEAR))
                }
                Err(e) => {
                    log::warn!("Failed to load image {}: {e:#}", short_name(&source));
                    None
                }
            };
            self.textures.borrow_mut().insert(source, texture);
        }
    }
}

/// Load and decode an image source into RGBA pixels.
pub fn decode_source(source: &str, base_path: &Path) -> Result<image::RgbaImage> {
    let bytes = read_source(source, base_path)?;
    let img = image::load_from_memory(&bytes).context("Unsupported image data")?;
    Ok(img.into_rgba8())
}

fn read_source(source: &str, base_path: &Path) -> Result<Vec<u8>> {
    if let Some(rest) = source.strip_prefix("data:") {
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("Malformed data URI"))?;
        if !meta.ends_with(";base64") {
            anyhow::bail!("Only base64 data URIs are supported");
        }
        return base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .context("Invalid base64 image data");
    }
    if source.starts_with("http://") || source.starts_with("https://") {
        let bytes = ureq::get(source)
            .call()
            .with_context(|| format!("Failed to fetch {source}"))?
            .body_mut()
            .read_to_vec()
            .context("Failed to read image body")?;
        return Ok(bytes);
    }
    let path = Path::new(source);
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_path.join(path)
    };
    std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Log- and debug-friendly name for a source; data URIs are long.
fn short_name(source: &str) -> String {
    if source.starts_with("data:") {
        let mime = source
            .split(';')
            .next()
            .unwrap_or("data:")
            .trim_start_matches("data:");
        format!("inline {mime}")
    } else {
        source.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_data_uri() {
        let b64 = base64::engine::general_purpose::STANDARD.encode(tiny_png());
        let uri = format!("data:image/png;base64,{b64}");
        let img = decode_source(&uri, Path::new(".")).unwrap();
        assert_eq!(img.dimensions(), (2, 3));
        assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_relative_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logo.png"), tiny_png()).unwrap();
        let img = decode_source("logo.png", dir.path()).unwrap();
        assert_eq!(img.width(), 2);
    }

    #[test]
    fn test_decode_errors() {
        assert!(decode_source("data:image/png,notbase64", Path::new(".")).is_err());
        assert!(decode_source("data:image/png;base64,!!!", Path::new(".")).is_err());
        assert!(decode_source("missing.png", Path::new("/nonexistent")).is_err());
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("data:image/jpeg;base64,AAAA"), "inline image/jpeg");
        assert_eq!(short_name("bg.png"), "bg.png");
    }
}
