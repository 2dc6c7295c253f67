//! Service container for dependency injection
//!
//! Wires the scaffolder to its collaborators.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::{BuilderRegistry, CourseSiteBuilder};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::content_store::SiteStore;
use crate::infrastructure::localization::BundleCatalog;
use crate::infrastructure::traits::{
    AcademicGroups, AuthContext, ContentSubstrate, FileSystem, GroupResolution,
    LocalizationResolver, OverlayFileSystem, RealFileSystem, SessionAuth,
};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Site store backing the content substrate
    pub store: Arc<SiteStore>,

    pub groups: Arc<dyn GroupResolution>,
    pub auth: Arc<dyn AuthContext>,
    pub localization: Arc<dyn LocalizationResolver>,

    /// Registry the course site builder is obtained from
    pub registry: Arc<BuilderRegistry>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> ApplicationResult<Self> {
        Self::for_filesystem(settings, Arc::new(RealFileSystem))
    }

    /// Container whose writes never reach the disk.
    ///
    /// Published sites and bundles are still read from the real filesystem,
    /// so slugs taken on disk are rejected as in a real run.
    pub fn dry_run(settings: Settings) -> ApplicationResult<Self> {
        Self::for_filesystem(settings, Arc::new(OverlayFileSystem::new(Arc::new(RealFileSystem))))
    }

    fn for_filesystem(settings: Settings, fs: Arc<dyn FileSystem>) -> ApplicationResult<Self> {
        let localization = Self::load_catalog(&settings, Arc::clone(&fs))?;
        let store = SiteStore::new(Arc::clone(&fs), &settings.sites_dir());
        let auth = SessionAuth::new(settings.author_user());
        debug!("for_filesystem: sites_dir={}", store.sites_dir().display());
        Ok(Self::with_deps(
            settings,
            fs,
            Arc::new(store),
            Arc::new(AcademicGroups),
            Arc::new(auth),
            Arc::new(localization),
        ))
    }

    fn load_catalog(settings: &Settings, fs: Arc<dyn FileSystem>) -> ApplicationResult<BundleCatalog> {
        match &settings.bundle_dir {
            Some(dir) => BundleCatalog::load(fs, dir, settings.default_locale.clone()),
            None => Ok(BundleCatalog::builtin(settings.default_locale.clone())),
        }
    }

    /// Create a service container with custom dependencies (for testing).
    ///
    /// The container gets its own registry, so its builder is wired to these
    /// collaborators and no others.
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        store: Arc<SiteStore>,
        groups: Arc<dyn GroupResolution>,
        auth: Arc<dyn AuthContext>,
        localization: Arc<dyn LocalizationResolver>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            store,
            groups,
            auth,
            localization,
            registry: Arc::new(BuilderRegistry::new()),
        }
    }

    /// Use `registry` instead of the container's private one.
    pub fn with_registry(mut self, registry: Arc<BuilderRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// The course site builder, constructed on first use.
    pub fn course_site_builder(&self) -> ApplicationResult<Arc<CourseSiteBuilder>> {
        self.registry.course_site_builder(|| {
            debug!("wiring course site builder");
            let substrate: Arc<dyn ContentSubstrate> = self.store.clone();
            CourseSiteBuilder::new(
                substrate,
                Arc::clone(&self.groups),
                Arc::clone(&self.auth),
                self.localization.as_ref(),
            )
        })
    }
}
