//! Collaborator boundary traits
//!
//! The scaffolder talks to the content substrate, the academic access groups,
//! the authentication context and the localization bundles only through these
//! traits, so each can be swapped for a test double.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::application::ApplicationResult;
use crate::domain::{
    AcademicOperation, CategoryId, Component, ComponentKind, Course, Group, LocalizedText, MenuId,
    NewPage, PageId, Site, User,
};

/// Content management substrate: allocates and persists site graphs.
pub trait ContentSubstrate: Send + Sync {
    /// Allocate an empty site.
    fn create_site(&self, name: LocalizedText, description: LocalizedText) -> ApplicationResult<Site>;

    /// Assign `slug` to `site`; fails when the slug is invalid or taken by another site.
    fn assign_slug(&self, site: &mut Site, slug: &str) -> ApplicationResult<()>;

    /// Append a menu to `site`.
    fn create_menu(&self, site: &mut Site, title: LocalizedText) -> ApplicationResult<MenuId>;

    /// Set a menu's ordinal and privileged flag.
    fn configure_menu(
        &self,
        site: &mut Site,
        menu: MenuId,
        order: u32,
        privileged: bool,
    ) -> ApplicationResult<()>;

    /// Create a page bound to its components.
    fn create_page(&self, site: &mut Site, page: NewPage) -> ApplicationResult<PageId>;

    /// Category addressed by `slug`, created with `title` when absent.
    fn get_or_create_category(
        &self,
        site: &mut Site,
        slug: &str,
        title: LocalizedText,
    ) -> ApplicationResult<CategoryId>;

    /// Component instance registered for `kind`.
    fn component_for_type(&self, kind: ComponentKind) -> Arc<Component>;

    /// Persist a finished site.
    fn publish(&self, site: &Site) -> ApplicationResult<()>;
}

/// Role-derived access groups of the academic domain.
pub trait GroupResolution: Send + Sync {
    fn teacher_group(&self, course: &Course) -> Option<Group>;

    fn student_group(&self, course: &Course) -> Option<Group>;

    fn authorization_group(&self, operation: AcademicOperation) -> Option<Group>;
}

/// Source of the acting user.
pub trait AuthContext: Send + Sync {
    fn current_user(&self) -> Option<User>;
}

/// Turns a `(bundle, key)` pair into localized text.
pub trait LocalizationResolver: Send + Sync {
    fn resolve(&self, bundle: &str, key: &str) -> LocalizedText;
}

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Files directly inside `dir`.
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Filesystem kept in memory; backs dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, BTreeMap<PathBuf, String>>> {
        self.files
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory filesystem lock poisoned"))
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.lock()?.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.lock()?.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock()
            .map(|files| {
                files.contains_key(path) || files.keys().any(|f| f.starts_with(path))
            })
            .unwrap_or(false)
    }

    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .lock()?
            .keys()
            .filter(|f| f.parent() == Some(dir))
            .cloned()
            .collect())
    }
}

/// Reads fall through to `base`; writes stay in memory.
///
/// Lets a dry run see what is already published without touching it.
pub struct OverlayFileSystem {
    base: Arc<dyn FileSystem>,
    overlay: MemoryFileSystem,
}

impl OverlayFileSystem {
    pub fn new(base: Arc<dyn FileSystem>) -> Self {
        Self {
            base,
            overlay: MemoryFileSystem::new(),
        }
    }
}

impl std::fmt::Debug for OverlayFileSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayFileSystem")
            .field("overlay", &self.overlay)
            .finish_non_exhaustive()
    }
}

impl FileSystem for OverlayFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        match self.overlay.read_to_string(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => self.base.read_to_string(path),
            other => other,
        }
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.overlay.write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        self.overlay.exists(path) || self.base.exists(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.overlay.create_dir_all(path)
    }

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = self.overlay.list_dir(dir)?;
        if self.base.exists(dir) {
            files.extend(self.base.list_dir(dir)?);
        }
        files.sort();
        files.dedup();
        Ok(files)
    }
}

/// Academic access groups: course teachers, course students, authorized staff.
#[derive(Debug, Default)]
pub struct AcademicGroups;

impl GroupResolution for AcademicGroups {
    fn teacher_group(&self, course: &Course) -> Option<Group> {
        Some(Group::teachers(course.reference()))
    }

    fn student_group(&self, course: &Course) -> Option<Group> {
        Some(Group::students(course.reference()))
    }

    fn authorization_group(&self, operation: AcademicOperation) -> Option<Group> {
        Some(Group::authorized(operation))
    }
}

/// Authentication context fixed for the lifetime of the process.
#[derive(Debug, Default, Clone)]
pub struct SessionAuth {
    user: Option<User>,
}

impl SessionAuth {
    pub fn new(user: Option<User>) -> Self {
        Self { user }
    }

    pub fn for_user(username: impl Into<String>) -> Self {
        Self::new(Some(User::new(username)))
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }
}

impl AuthContext for SessionAuth {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}
