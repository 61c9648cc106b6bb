//! Highlighting configuration
//!
//! Read from `config.yaml` in the fenced config directory, which also holds
//! user palettes (`themes/`) and log files (`logs/`). The core only reads
//! the config: the owner pushes a loaded config into the controller and
//! asks for a refresh.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// User-facing settings for embedded code highlighting
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HighlightConfig {
    /// Highlight inline spans written as `` `{lang} code` ``
    #[serde(default = "default_inline_highlighting")]
    pub inline_highlighting: bool,
    /// Palette id (e.g., "default-dark", "github-light")
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Tokenization results kept per view, 0 disables the cache
    #[serde(default = "default_token_cache_capacity")]
    pub token_cache_capacity: usize,
    /// Filter for the rolling log file, in `RUST_LOG` syntax ("off" disables it)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_inline_highlighting() -> bool {
    true
}

fn default_theme() -> String {
    "default-dark".to_string()
}

fn default_token_cache_capacity() -> usize {
    64
}

fn default_log_level() -> String {
    "debug".to_string()
}

pub const CONFIG_FILE: &str = "config.yaml";
pub const THEMES_DIR: &str = "themes";
pub const LOGS_DIR: &str = "logs";

/// `$XDG_CONFIG_HOME/fenced` or `~/.config/fenced`; `%APPDATA%\fenced` on Windows
pub fn config_dir() -> Option<PathBuf> {
    let base = if cfg!(windows) {
        dirs::config_dir()
    } else {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
    };
    base.map(|dir| dir.join("fenced"))
}

/// `name` inside the config directory
pub fn config_path(name: &str) -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(name))
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            inline_highlighting: default_inline_highlighting(),
            theme: default_theme(),
            token_cache_capacity: default_token_cache_capacity(),
            log_level: default_log_level(),
        }
    }
}

impl HighlightConfig {
    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = config_path(CONFIG_FILE) else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse config at {}: {}", path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HighlightConfig::default();
        assert!(config.inline_highlighting);
        assert_eq!(config.theme, "default-dark");
        assert_eq!(config.token_cache_capacity, 64);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: HighlightConfig = serde_yaml::from_str("inline_highlighting: false\n").unwrap();
        assert!(!config.inline_highlighting);
        assert_eq!(config.theme, "default-dark");
    }
}
