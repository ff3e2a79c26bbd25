use anyhow::Result;
use colored::Colorize;
use inquire::{Confirm, Password, PasswordDisplayMode};

use crate::cli::AiCommands;
use crate::config::{AiConfig, Config, API_KEY_ENV_VARS};

pub fn run(command: AiCommands) -> Result<()> {
    match command {
        AiCommands::Init => init(),
        AiCommands::Status => status(),
        AiCommands::Remove => remove(),
    }
}

fn init() -> Result<()> {
    let mut config = Config::load_or_default();

    if let Some(existing) = config.ai.as_ref().and_then(|a| a.api_key.as_ref()) {
        if !existing.is_empty() {
            let replace = Confirm::new("An API key is already configured. Replace it?")
                .with_default(false)
                .prompt()?;
            if !replace {
                println!("Keeping the existing key.");
                return Ok(());
            }
        }
    }

    println!("Carousel uses Google Gemini to write slide copy, suggest icons and paint backgrounds.");
    println!(
        "Get a key at {}",
        "https://aistudio.google.com/app/apikey".underline()
    );
    let key = Password::new("Gemini API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    let key = key.trim().to_string();
    if key.is_empty() {
        anyhow::bail!("No API key entered.");
    }

    config.ai.get_or_insert_with(AiConfig::default).api_key = Some(key);
    let path = config.save()?;
    println!("{} Saved to {}", "AI configured.".green().bold(), path.display());
    Ok(())
}

fn status() -> Result<()> {
    let config = Config::load_or_default();
    let ai = config.ai_or_default();
    match ai.resolve_api_key() {
        Some(_) => {
            let source = if ai.api_key.as_deref().is_some_and(|k| !k.is_empty()) {
                "config file".to_string()
            } else {
                API_KEY_ENV_VARS
                    .iter()
                    .find(|v| std::env::var(v).is_ok_and(|k| !k.is_empty()))
                    .map(|v| format!("${v}"))
                    .unwrap_or_else(|| "environment".to_string())
            };
            println!("{} (key from {source})", "Gemini: configured".green().bold());
        }
        None => {
            println!("{}", "Gemini: not configured".yellow().bold());
            println!("Generation runs offline with placeholder copy. Run `carousel ai init` to set a key.");
        }
    }
    println!("Text model:  {}", ai.text_model());
    println!("Image model: {}", ai.image_model());
    Ok(())
}

fn remove() -> Result<()> {
    let mut config = Config::load_or_default();
    if config.ai.is_none() {
        println!("No AI configuration to remove.");
        return Ok(());
    }
    let confirm = Confirm::new("Remove the AI configuration?")
        .with_default(false)
        .prompt()?;
    if !confirm {
        return Ok(());
    }
    config.ai = None;
    let path = config.save()?;
    println!("{} ({})", "AI configuration removed.".green(), path.display());
    Ok(())
}
