use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::model::Tone;

#[derive(Parser)]
#[command(name = "carousel")]
#[command(author, version, about)]
#[command(long_about = "An AI-assisted editor for social-media carousel slide decks.\n\n\
    Generate slide copy for a topic, then arrange, style and export it.\n\n\
    Examples:\n  \
    carousel                                Open the editor on the create screen\n  \
    carousel Growth_Hacks.json              Open a saved project\n  \
    carousel generate --topic \"Growth Hacks\" --slides 5\n  \
    carousel export Growth_Hacks.json --slide 2")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Project JSON file to open
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure the Gemini API key for content generation
    Ai {
        #[command(subcommand)]
        command: AiCommands,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate a carousel project and save it as JSON
    Generate {
        /// What the carousel is about
        #[arg(short, long)]
        topic: String,

        /// Writing tone (Professional, Witty, Inspirational, Educational)
        #[arg(long)]
        tone: Option<Tone>,

        /// Number of slides (3-10)
        #[arg(short = 'n', long)]
        slides: Option<usize>,

        /// Content language
        #[arg(short, long)]
        language: Option<String>,

        /// Output directory for the project file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export one slide of a project as a JPEG image
    Export {
        /// Project JSON file
        file: PathBuf,

        /// Slide to export (1-indexed)
        #[arg(short, long, default_value = "1")]
        slide: usize,

        /// Output directory for the image
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the built-in themes
    Themes,

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum AiCommands {
    /// Set up the Gemini API key
    Init,

    /// Show current AI configuration
    Status,

    /// Remove AI configuration
    Remove,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.tone, defaults.slides, ai.text_model)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    /// Default log filter for the verbosity flags.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Ai { command }) => crate::commands::ai::run(command),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Generate {
                topic,
                tone,
                slides,
                language,
                output,
            }) => crate::commands::generate::run(crate::commands::generate::GenerateArgs {
                topic,
                tone,
                slides,
                language,
                output,
            }),
            Some(Commands::Export {
                file,
                slide,
                output,
            }) => {
                if !file.exists() {
                    anyhow::bail!("File not found: {}", file.display());
                }
                crate::commands::export::run(file, slide, output)
            }
            Some(Commands::Themes) => {
                crate::commands::themes::run();
                Ok(())
            }
            Some(Commands::Version) => {
                println!("carousel {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                if let Some(file) = &self.file {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                }
                crate::app::run(self.file)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "carousel", "generate", "--topic", "Growth", "--tone", "Witty", "-n", "4",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Generate { topic, tone, slides, .. }) => {
                assert_eq!(topic, "Growth");
                assert_eq!(tone, Some(Tone::Witty));
                assert_eq!(slides, Some(4));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_log_level_from_flags() {
        let cli = Cli::try_parse_from(["carousel", "-vv", "themes"]).unwrap();
        assert_eq!(cli.log_level(), log::LevelFilter::Trace);
        let cli = Cli::try_parse_from(["carousel", "-q", "themes"]).unwrap();
        assert_eq!(cli.log_level(), log::LevelFilter::Error);
    }
}
