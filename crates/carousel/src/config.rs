use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::generate::gemini::{DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
use crate::generate::{Bridge, GeminiClient};
use crate::model::{AspectRatio, PresetStyle, Tone};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "carousel";

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

pub const MIN_SLIDES: usize = 3;
pub const MAX_SLIDES: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slides: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiConfig {
    /// Gemini API key. If not set, falls back to GEMINI_API_KEY, then API_KEY.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_model: Option<String>,
}

impl AiConfig {
    /// Resolve API key from config or environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_api_key_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        if let Some(key) = &self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        API_KEY_ENV_VARS
            .iter()
            .find_map(|name| env(name).filter(|v| !v.is_empty()))
    }

    pub fn text_model(&self) -> &str {
        self.text_model.as_deref().unwrap_or(DEFAULT_TEXT_MODEL)
    }

    pub fn image_model(&self) -> &str {
        self.image_model.as_deref().unwrap_or(DEFAULT_IMAGE_MODEL)
    }

    /// Gemini-backed bridge when a key is available, offline otherwise.
    pub fn bridge(&self) -> Bridge {
        match self.resolve_api_key() {
            Some(key) => Bridge::new(
                GeminiClient::new(key).with_models(self.text_model(), self.image_model()),
            ),
            None => {
                log::info!("No Gemini API key configured, generation runs offline");
                Bridge::offline()
            }
        }
    }
}

/// Resolved generation defaults, config values over built-ins.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationDefaults {
    pub tone: Tone,
    pub language: String,
    pub slides: usize,
    pub aspect: AspectRatio,
    pub preset: PresetStyle,
    pub export_dir: PathBuf,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            tone: Tone::Professional,
            language: "English".to_string(),
            slides: 5,
            aspect: AspectRatio::Portrait,
            preset: PresetStyle::Standard,
            export_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `carousel config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# Carousel configuration - https://github.com/mklab-se/carousel\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn ai_or_default(&self) -> AiConfig {
        self.ai.clone().unwrap_or_default()
    }

    /// Generation defaults with invalid stored values ignored.
    pub fn generation_defaults(&self) -> GenerationDefaults {
        let mut out = GenerationDefaults::default();
        let Some(d) = &self.defaults else {
            return out;
        };
        if let Some(tone) = d.tone.as_deref().and_then(|t| t.parse().ok()) {
            out.tone = tone;
        }
        if let Some(language) = d.language.as_ref().filter(|l| !l.trim().is_empty()) {
            out.language = language.clone();
        }
        if let Some(slides) = d.slides {
            out.slides = slides.clamp(MIN_SLIDES, MAX_SLIDES);
        }
        if let Some(aspect) = d.aspect.as_deref().and_then(|a| a.parse().ok()) {
            out.aspect = aspect;
        }
        if let Some(preset) = d.preset.as_deref().and_then(|p| p.parse().ok()) {
            out.preset = preset;
        }
        if let Some(dir) = &d.export_dir {
            out.export_dir = dir.clone();
        }
        out
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.tone" => {
                let tone: Tone = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .tone = Some(tone.to_string());
            }
            "defaults.language" => {
                if value.trim().is_empty() {
                    anyhow::bail!("Invalid language: must not be empty.");
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .language = Some(value.trim().to_string());
            }
            "defaults.slides" => {
                let n: usize = value
                    .parse()
                    .ok()
                    .filter(|n| (MIN_SLIDES..=MAX_SLIDES).contains(n))
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "Invalid slide count: {value}. Must be a number from {MIN_SLIDES} to {MAX_SLIDES}."
                        )
                    })?;
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .slides = Some(n);
            }
            "defaults.aspect" => {
                let aspect: AspectRatio = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .aspect = Some(aspect.to_string());
            }
            "defaults.preset" => {
                let preset: PresetStyle = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .preset = Some(preset.to_string());
            }
            "defaults.export_dir" => {
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .export_dir = Some(PathBuf::from(value));
            }
            "ai.api_key" => {
                self.ai.get_or_insert_with(AiConfig::default).api_key = Some(value.to_string());
            }
            "ai.text_model" => {
                self.ai.get_or_insert_with(AiConfig::default).text_model = Some(value.to_string());
            }
            "ai.image_model" => {
                self.ai.get_or_insert_with(AiConfig::default).image_model = Some(value.to_string());
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: defaults.tone, defaults.language, defaults.slides, \
                 defaults.aspect, defaults.preset, defaults.export_dir, ai.api_key, ai.text_model, ai.image_model"
            ),
        }
        Ok(())
    }
}
