//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/coursesite/coursesite.toml`
//! 3. Environment variables: `COURSESITE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::User;

/// Unified configuration for coursesite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base directory (default: ~/.coursesite); sites live in base_dir/sites
    pub base_dir: PathBuf,
    /// Directory of localization bundle files; built-in labels when unset
    pub bundle_dir: Option<PathBuf>,
    /// Locale label fallbacks are filed under
    pub default_locale: String,
    /// Username recorded as page author (default: $USER)
    pub author: Option<String>,
}

/// Raw settings for intermediate parsing; `None` means "not specified".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub base_dir: Option<PathBuf>,
    pub bundle_dir: Option<PathBuf>,
    pub default_locale: Option<String>,
    pub author: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: dirs_default_base_dir(),
            bundle_dir: None,
            default_locale: "en-GB".to_string(),
            author: std::env::var("USER").ok().filter(|u| !u.is_empty()),
        }
    }
}

/// Get the default base directory (~/.coursesite).
fn dirs_default_base_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".coursesite"))
        .unwrap_or_else(|| PathBuf::from("~/.coursesite"))
}

/// Get the XDG config directory for coursesite.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "coursesite").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("coursesite.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn expand(value: &str) -> String {
    shellexpand::full(value)
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

impl Settings {
    /// Get the sites directory (base_dir/sites).
    pub fn sites_dir(&self) -> PathBuf {
        self.base_dir.join("sites")
    }

    /// Configured author as a user, if any.
    pub fn author_user(&self) -> Option<User> {
        self.author.as_deref().map(User::new)
    }

    /// Expand shell variables and tilde in path-like fields.
    ///
    /// Handles `~`, `$VAR`, and `${VAR}` syntax.
    fn expand_paths(&mut self) {
        self.base_dir = PathBuf::from(expand(&self.base_dir.to_string_lossy()));
        self.bundle_dir = self
            .bundle_dir
            .as_ref()
            .map(|dir| PathBuf::from(expand(&dir.to_string_lossy())));
    }

    /// Overlay values the raw settings specify.
    fn apply(&self, overlay: &RawSettings) -> Self {
        Self {
            base_dir: overlay
                .base_dir
                .clone()
                .unwrap_or_else(|| self.base_dir.clone()),
            bundle_dir: overlay.bundle_dir.clone().or_else(|| self.bundle_dir.clone()),
            default_locale: overlay
                .default_locale
                .clone()
                .unwrap_or_else(|| self.default_locale.clone()),
            author: overlay.author.clone().or_else(|| self.author.clone()),
        }
    }

    /// Load settings with layered precedence from the global config file.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings using `config_file` in place of the global config.
    ///
    /// A missing file is skipped.
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = config_file {
            if path.exists() {
                debug!("loading config {}", path.display());
                let raw = load_raw_settings(path)?;
                current = current.apply(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply COURSESITE_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("COURSESITE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        let raw = RawSettings {
            base_dir: config.get_string("base_dir").ok().map(PathBuf::from),
            bundle_dir: config.get_string("bundle_dir").ok().map(PathBuf::from),
            default_locale: config.get_string("default_locale").ok(),
            author: config.get_string("author").ok(),
        };
        Ok(settings.apply(&raw))
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# coursesite configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/coursesite/coursesite.toml
#   Env:    COURSESITE_* environment variables (explicit overrides)

# Base directory (published sites stored in base_dir/sites)
# base_dir = "~/.coursesite"

# Directory holding localization bundles, e.g. resources.FenixEduLearningResources.toml
# bundle_dir = "~/.coursesite/bundles"

# Locale built-in labels are filed under
# default_locale = "en-GB"

# Username recorded as page author (defaults to $USER)
# author = "admin"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
