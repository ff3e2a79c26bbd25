use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Config, MAX_SLIDES, MIN_SLIDES};
use crate::export;
use crate::generate::GenerationRequest;
use crate::model::{Project, Tone};

pub struct GenerateArgs {
    pub topic: String,
    pub tone: Option<Tone>,
    pub slides: Option<usize>,
    pub language: Option<String>,
    pub output: Option<PathBuf>,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let topic = args.topic.trim().to_string();
    if topic.is_empty() {
        anyhow::bail!("Topic must not be empty.");
    }

    let config = Config::load_or_default();
    let defaults = config.generation_defaults();
    let slides = args.slides.unwrap_or(defaults.slides);
    if !(MIN_SLIDES..=MAX_SLIDES).contains(&slides) {
        anyhow::bail!("Invalid slide count: {slides}. Must be from {MIN_SLIDES} to {MAX_SLIDES}.");
    }
    let request = GenerationRequest::new(
        topic,
        args.tone.unwrap_or(defaults.tone),
        slides,
        args.language.unwrap_or(defaults.language),
    );

    let bridge = config.ai_or_default().bridge();
    if !bridge.is_online() {
        eprintln!(
            "{}",
            "No Gemini API key configured; writing placeholder copy. Run `carousel ai init`.".yellow()
        );
    }
    eprintln!(
        "Generating {} {} slides about \"{}\" in {}...",
        request.count, request.tone, request.topic, request.language
    );

    let generated = bridge.generate_slides(&request);
    let mut project = Project::new(
        request.topic.clone(),
        request.tone,
        request.count,
        request.language.clone(),
        generated,
    );
    project.aspect_ratio = defaults.aspect;
    project.preset_style = defaults.preset;

    let dir = args.output.unwrap_or(defaults.export_dir);
    let path = export::write_project(&project, &dir)
        .with_context(|| format!("Failed to save project to {}", dir.display()))?;

    for (i, slide) in project.slides.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, slide.title.bold());
    }
    println!("{} {}", "Saved".green().bold(), path.display());
    Ok(())
}
