use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();
    println!("{} {}", "Config file:".bold(), path.display());
    println!();

    let defaults = config.generation_defaults();
    println!("{}", "defaults".bold());
    println!("  tone:       {}", defaults.tone);
    println!("  language:   {}", defaults.language);
    println!("  slides:     {}", defaults.slides);
    println!("  aspect:     {}", defaults.aspect);
    println!("  preset:     {}", defaults.preset);
    println!("  export_dir: {}", defaults.export_dir.display());
    println!();

    let ai = config.ai_or_default();
    println!("{}", "ai".bold());
    let key_state = match ai.resolve_api_key() {
        Some(_) if ai.api_key.is_some() => "set in config".green(),
        Some(_) => "from environment".green(),
        None => "not set (offline generation)".yellow(),
    };
    println!("  api_key:     {key_state}");
    println!("  text_model:  {}", ai.text_model());
    println!("  image_model: {}", ai.image_model());
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    let shown = if key == "ai.api_key" { "********" } else { value };
    println!("{} {key} = {shown}", "Set".green().bold());
    println!("Saved to {}", path.display());
    Ok(())
}
