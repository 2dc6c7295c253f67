//! Integration tests for Settings loading
//!
//! Precedence: defaults < config file < COURSESITE_* environment variables.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use coursesite::config::Settings;

#[test]
fn given_config_file_when_load_from_then_overrides_defaults() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("coursesite.toml");
    fs::write(
        &path,
        r#"
base_dir = "/srv/coursesite"
bundle_dir = "/srv/bundles"
author = "registrar"
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load_from(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(settings.base_dir, PathBuf::from("/srv/coursesite"));
    assert_eq!(settings.bundle_dir, Some(PathBuf::from("/srv/bundles")));
    assert_eq!(settings.author.as_deref(), Some("registrar"));
    assert_eq!(settings.sites_dir(), PathBuf::from("/srv/coursesite/sites"));
}

#[test]
fn given_missing_config_file_when_load_from_then_defaults() {
    let temp = TempDir::new().unwrap();

    let settings = Settings::load_from(Some(&temp.path().join("absent.toml"))).unwrap();

    assert!(settings.base_dir.to_string_lossy().contains(".coursesite"));
}

#[test]
fn given_malformed_config_file_when_load_from_then_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("coursesite.toml");
    fs::write(&path, "base_dir = [").unwrap();

    assert!(Settings::load_from(Some(&path)).is_err());
}

#[test]
fn given_env_override_when_load_then_env_wins_over_file() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("coursesite.toml");
    fs::write(&path, "default_locale = \"pt-PT\"\n").unwrap();
    std::env::set_var("COURSESITE_DEFAULT_LOCALE", "pt-BR");

    // Act
    let settings = Settings::load_from(Some(&path));
    std::env::remove_var("COURSESITE_DEFAULT_LOCALE");

    // Assert
    assert_eq!(settings.unwrap().default_locale, "pt-BR");
}

#[test]
fn given_template_when_parsed_then_valid_toml_with_defaults() {
    let template = Settings::template();

    let parsed: Settings = toml::from_str(&template).expect("template parses");

    assert_eq!(parsed.default_locale, "en-GB");
}
