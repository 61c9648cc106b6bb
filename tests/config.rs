//! Configuration and palette tests
//!
//! Tests for config paths, highlight config loading and palette loading.

use fenced::config::{self, HighlightConfig, CONFIG_FILE, LOGS_DIR, THEMES_DIR};
use fenced::theme::{self, StylePalette, BUILTIN_THEMES, GITHUB_LIGHT_YAML};

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_ends_with_app_name() {
    if let Some(dir) = config::config_dir() {
        assert!(dir.ends_with("fenced"));
    }
}

#[test]
fn test_paths_live_under_config_dir() {
    let Some(dir) = config::config_dir() else {
        return;
    };
    assert_eq!(config::config_path(CONFIG_FILE).unwrap(), dir.join("config.yaml"));
    assert_eq!(config::config_path(THEMES_DIR).unwrap(), dir.join("themes"));
    assert_eq!(config::config_path(LOGS_DIR).unwrap(), dir.join("logs"));
}

// ========================================================================
// HighlightConfig Tests
// ========================================================================

#[test]
fn test_full_file_loads_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        "inline_highlighting: false\ntheme: github-light\ntoken_cache_capacity: 0\nlog_level: fenced=trace\n",
    )
    .unwrap();

    let config = HighlightConfig::load_from(&path).unwrap();
    assert_eq!(
        config,
        HighlightConfig {
            inline_highlighting: false,
            theme: "github-light".to_string(),
            token_cache_capacity: 0,
            log_level: "fenced=trace".to_string(),
        }
    );
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "theme: github-light\n").unwrap();

    let config = HighlightConfig::load_from(&path).unwrap();
    assert!(config.inline_highlighting);
    assert_eq!(config.theme, "github-light");
    assert_eq!(config.token_cache_capacity, 64);
}

#[test]
fn test_invalid_yaml_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "inline_highlighting: [not a bool\n").unwrap();

    let err = HighlightConfig::load_from(&path).unwrap_err();
    assert!(err.contains("config.yaml"));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(HighlightConfig::load_from(&dir.path().join("absent.yaml")).is_err());
}

// ========================================================================
// Palette Tests
// ========================================================================

#[test]
fn test_builtin_palettes_parse() {
    for builtin in BUILTIN_THEMES {
        let palette = StylePalette::from_builtin(builtin.id).unwrap();
        assert!(!palette.name.is_empty(), "{} has no name", builtin.id);
    }
}

#[test]
fn test_unknown_builtin_is_an_error() {
    assert!(StylePalette::from_builtin("no-such-theme").is_err());
}

#[test]
fn test_palette_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("light.yaml");
    std::fs::write(&path, GITHUB_LIGHT_YAML).unwrap();

    let palette = theme::from_file(&path).unwrap();
    assert_eq!(palette.name, "GitHub Light");
    let style = palette.style_for("keyword");
    assert_eq!(style.style, "color: #cf222e");
    assert_eq!(style.classes, vec!["fenced-hl", "fenced-hl-keyword"]);
}

#[test]
fn test_dotted_classification_falls_back() {
    let palette = StylePalette::from_yaml(GITHUB_LIGHT_YAML).unwrap();
    let style = palette.style_for("keyword.control.import");
    assert_eq!(style.style, "color: #cf222e");
    assert_eq!(style.classes[1], "fenced-hl-keyword-control-import");
}
