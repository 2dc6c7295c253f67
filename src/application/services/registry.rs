//! Process-wide registry of site builders
//!
//! At most one builder exists per builder kind. Lookup and registration run
//! under a single lock, so concurrent first calls still construct exactly one
//! instance.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use tracing::{debug, info};

use crate::application::{ApplicationError, ApplicationResult};

use super::scaffold::{CourseSiteBuilder, COURSE_SITE_BUILDER_SLUG};

static GLOBAL_REGISTRY: OnceLock<Arc<BuilderRegistry>> = OnceLock::new();

/// Kinds of site builders the registry knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuilderKind {
    CourseSite,
}

impl BuilderKind {
    /// Slug recorded on sites created by this kind of builder.
    pub fn slug(&self) -> &'static str {
        match self {
            BuilderKind::CourseSite => COURSE_SITE_BUILDER_SLUG,
        }
    }
}

impl fmt::Display for BuilderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// A registered builder.
#[derive(Debug, Clone)]
pub enum BuilderInstance {
    CourseSite(Arc<CourseSiteBuilder>),
}

impl BuilderInstance {
    pub fn kind(&self) -> BuilderKind {
        match self {
            BuilderInstance::CourseSite(_) => BuilderKind::CourseSite,
        }
    }
}

/// Registry mapping each builder kind to its single instance.
#[derive(Debug, Default)]
pub struct BuilderRegistry {
    instances: Mutex<BTreeMap<BuilderKind, BuilderInstance>>,
}

impl BuilderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry shared by the whole process.
    pub fn global() -> Arc<BuilderRegistry> {
        Arc::clone(GLOBAL_REGISTRY.get_or_init(|| Arc::new(BuilderRegistry::new())))
    }

    fn lock(&self) -> ApplicationResult<MutexGuard<'_, BTreeMap<BuilderKind, BuilderInstance>>> {
        self.instances
            .lock()
            .map_err(|_| ApplicationError::RegistryUnavailable {
                message: "builder registry lock poisoned".to_string(),
            })
    }

    /// The course site builder, constructed with `init` on first use.
    ///
    /// `init` runs while the registry is locked and must not call back into it.
    pub fn course_site_builder<F>(&self, init: F) -> ApplicationResult<Arc<CourseSiteBuilder>>
    where
        F: FnOnce() -> CourseSiteBuilder,
    {
        let mut instances = self.lock()?;
        let instance = instances.entry(BuilderKind::CourseSite).or_insert_with(|| {
            info!("registering builder {}", BuilderKind::CourseSite);
            BuilderInstance::CourseSite(Arc::new(init()))
        });
        match instance {
            BuilderInstance::CourseSite(builder) => {
                debug!("course_site_builder: {:p}", Arc::as_ptr(builder));
                Ok(Arc::clone(builder))
            }
        }
    }

    /// Registered instance of `kind`, if any.
    pub fn get(&self, kind: BuilderKind) -> ApplicationResult<Option<BuilderInstance>> {
        Ok(self.lock()?.get(&kind).cloned())
    }

    /// Registered kinds, in order.
    pub fn kinds(&self) -> ApplicationResult<Vec<BuilderKind>> {
        Ok(self.lock()?.keys().copied().collect())
    }

    pub fn len(&self) -> ApplicationResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> ApplicationResult<bool> {
        Ok(self.lock()?.is_empty())
    }
}
