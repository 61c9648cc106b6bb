//! Command-line argument parsing
//!
//! Supports:
//! - Highlighting one markdown file and printing its annotations
//! - Source or rendered display mode, with a simulated cursor
//! - Overriding config values (theme, inline highlighting) per run

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::HighlightConfig;
use crate::model::DisplayMode;

/// Highlight code embedded in a markdown file
#[derive(Parser, Debug)]
#[command(
    name = "fenced",
    version,
    about = "Highlight fenced and inline-tagged code in markdown"
)]
pub struct CliArgs {
    /// Markdown file to highlight
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Source mode: never hide inline language tags
    #[arg(long)]
    pub raw: bool,

    /// Place the cursor at this character offset
    #[arg(long, value_name = "OFFSET")]
    pub cursor: Option<usize>,

    /// Disable `{lang} code` inline highlighting
    #[arg(long)]
    pub no_inline: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::List)]
    pub format: OutputFormat,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Theme id, overrides the config
    #[arg(long, value_name = "ID")]
    pub theme: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One annotation per line with the text it covers
    List,
    /// The annotation set as JSON
    Json,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub file: PathBuf,
    pub mode: DisplayMode,
    pub cursor: Option<usize>,
    pub format: OutputFormat,
    pub config_path: Option<PathBuf>,
    pub theme: Option<String>,
    pub inline_highlighting: Option<bool>,
}

impl CliArgs {
    /// Convert parsed CLI args into a run configuration
    pub fn into_config(self) -> Result<RunConfig, String> {
        if self.file.is_dir() {
            return Err(format!("{} is a directory", self.file.display()));
        }

        Ok(RunConfig {
            file: self.file,
            mode: if self.raw {
                DisplayMode::Source
            } else {
                DisplayMode::Rendered
            },
            cursor: self.cursor,
            format: self.format,
            config_path: self.config,
            theme: self.theme,
            inline_highlighting: self.no_inline.then_some(false),
        })
    }
}

impl RunConfig {
    /// Apply per-run overrides on top of a loaded config
    pub fn apply_overrides(&self, config: &mut HighlightConfig) {
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
        if let Some(inline) = self.inline_highlighting {
            config.inline_highlighting = inline;
        }
    }
}
