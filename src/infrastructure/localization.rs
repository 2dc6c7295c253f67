//! TOML-backed localization bundles
//!
//! A bundle named `resources.FenixEduLearningResources` is read from
//! `<bundle_dir>/resources.FenixEduLearningResources.toml`, one table per locale:
//!
//! ```toml
//! [en-GB]
//! "label.marks" = "Marks"
//!
//! [pt-PT]
//! "label.marks" = "Notas"
//! ```
//!
//! Keys missing from every bundle file fall back to the compiled-in English
//! labels, and unknown keys resolve to `!key!`.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, Label};
use crate::domain::LocalizedText;
use crate::infrastructure::traits::{FileSystem, LocalizationResolver};

/// locale -> key -> text
type BundleTable = BTreeMap<String, BTreeMap<String, String>>;

/// Localization bundles loaded from a directory of TOML files.
pub struct BundleCatalog {
    default_locale: String,
    bundles: HashMap<String, BundleTable>,
}

impl BundleCatalog {
    /// Catalog with no bundle files; only compiled-in labels resolve.
    pub fn builtin(default_locale: impl Into<String>) -> Self {
        Self {
            default_locale: default_locale.into(),
            bundles: HashMap::new(),
        }
    }

    /// Load every `*.toml` bundle file in `dir`.
    pub fn load(
        fs: Arc<dyn FileSystem>,
        dir: &Path,
        default_locale: impl Into<String>,
    ) -> ApplicationResult<Self> {
        let mut catalog = Self::builtin(default_locale);
        if !fs.exists(dir) {
            warn!("bundle directory {} not found, using built-in labels", dir.display());
            return Ok(catalog);
        }

        let files: Vec<PathBuf> = fs
            .list_dir(dir)
            .with_path_context("list bundles", dir)?
            .into_iter()
            .filter(|f| f.extension().is_some_and(|ext| ext == "toml"))
            .collect();

        for file in files {
            let Some(name) = file.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            let content = fs
                .read_to_string(&file)
                .with_path_context("read bundle", &file)?;
            catalog.insert_bundle(&name, &content)?;
            debug!("loaded bundle {} from {}", name, file.display());
        }
        Ok(catalog)
    }

    /// Add (or replace) a bundle from its TOML source.
    pub fn insert_bundle(&mut self, name: &str, content: &str) -> ApplicationResult<()> {
        let table: BundleTable = toml::from_str(content).map_err(|e| ApplicationError::Config {
            message: format!("parse bundle {name}: {}", e.message()),
        })?;
        self.bundles.insert(name.to_string(), table);
        Ok(())
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }
}

impl LocalizationResolver for BundleCatalog {
    fn resolve(&self, bundle: &str, key: &str) -> LocalizedText {
        let mut text = LocalizedText::new();
        if let Some(table) = self.bundles.get(bundle) {
            for (locale, entries) in table {
                if let Some(value) = entries.get(key) {
                    text = text.with(locale.clone(), value.clone());
                }
            }
        }

        if text.get(&self.default_locale).is_none() {
            match Label::from_key(key) {
                Some(label) => {
                    text = text.with(self.default_locale.clone(), label.default_text());
                }
                None if text.is_empty() => {
                    warn!("missing localization {bundle}:{key}");
                    text = text.with(self.default_locale.clone(), format!("!{key}!"));
                }
                None => {}
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::BUNDLE;

    #[test]
    fn given_no_bundles_when_resolving_known_label_then_builtin_text() {
        let catalog = BundleCatalog::builtin("en-GB");
        let text = catalog.resolve(BUNDLE, "label.marks");
        assert_eq!(text.get("en-GB"), Some("Marks"));
    }

    #[test]
    fn given_unknown_key_when_resolving_then_marked_missing() {
        let catalog = BundleCatalog::builtin("en-GB");
        let text = catalog.resolve(BUNDLE, "label.nope");
        assert_eq!(text.get("en-GB"), Some("!label.nope!"));
    }

    #[test]
    fn given_bundle_with_translations_when_resolving_then_all_locales_present() {
        let mut catalog = BundleCatalog::builtin("en-GB");
        catalog
            .insert_bundle(
                BUNDLE,
                r#"
[en-GB]
"label.marks" = "Grades"

[pt-PT]
"label.marks" = "Notas"
"#,
            )
            .unwrap();

        let text = catalog.resolve(BUNDLE, "label.marks");

        assert_eq!(text.get("en-GB"), Some("Grades"));
        assert_eq!(text.get("pt-PT"), Some("Notas"));
    }

    #[test]
    fn given_bundle_without_default_locale_when_resolving_then_builtin_fills_gap() {
        let mut catalog = BundleCatalog::builtin("en-GB");
        catalog
            .insert_bundle(BUNDLE, "[pt-PT]\n\"label.shifts\" = \"Turnos\"\n")
            .unwrap();

        let text = catalog.resolve(BUNDLE, "label.shifts");

        assert_eq!(text.get("pt-PT"), Some("Turnos"));
        assert_eq!(text.get("en-GB"), Some("Shifts"));
    }
}
