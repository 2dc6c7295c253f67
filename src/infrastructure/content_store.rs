//! File-backed content substrate
//!
//! Sites are published as TOML documents under `<sites_dir>/<slug>.toml`.
//! Slug uniqueness is checked against both published documents and slugs
//! reserved by this process, under one lock.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    validate_slug, CategoryId, Component, ComponentKind, CourseRef, DomainError, LocalizedText,
    MenuId, NewPage, PageId, Site,
};
use crate::infrastructure::traits::{ContentSubstrate, FileSystem, MemoryFileSystem};

const DOCUMENT_EXTENSION: &str = "toml";

/// Content substrate persisting sites through a [`FileSystem`].
pub struct SiteStore {
    fs: Arc<dyn FileSystem>,
    sites_dir: PathBuf,
    reserved: Mutex<HashSet<String>>,
}

impl SiteStore {
    /// Create a store keeping its documents in `sites_dir`.
    pub fn new(fs: Arc<dyn FileSystem>, sites_dir: &Path) -> Self {
        Self {
            fs,
            sites_dir: sites_dir.to_path_buf(),
            reserved: Mutex::new(HashSet::new()),
        }
    }

    /// Store that never touches the disk.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryFileSystem::new()), Path::new("/coursesite/sites"))
    }

    pub fn sites_dir(&self) -> &Path {
        &self.sites_dir
    }

    fn document_path(&self, slug: &str) -> PathBuf {
        self.sites_dir.join(format!("{slug}.{DOCUMENT_EXTENSION}"))
    }

    /// Slugs of all published sites, sorted.
    pub fn list(&self) -> ApplicationResult<Vec<String>> {
        if !self.fs.exists(&self.sites_dir) {
            return Ok(Vec::new());
        }
        let files = self
            .fs
            .list_dir(&self.sites_dir)
            .with_path_context("list sites", &self.sites_dir)?;
        let mut slugs: Vec<String> = files
            .iter()
            .filter(|f| f.extension().is_some_and(|ext| ext == DOCUMENT_EXTENSION))
            .filter_map(|f| f.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        slugs.sort();
        Ok(slugs)
    }

    /// Read back a published site.
    pub fn load(&self, slug: &str) -> ApplicationResult<SiteDocument> {
        let path = self.document_path(slug);
        let content = self
            .fs
            .read_to_string(&path)
            .with_path_context("read site document", &path)?;
        toml::from_str(&content).map_err(|e| ApplicationError::OperationFailed {
            context: format!("parse site document {}", path.display()),
            source: Box::new(e),
        })
    }

    fn reserve(&self, slug: &str) -> ApplicationResult<()> {
        let mut reserved = self
            .reserved
            .lock()
            .map_err(|_| ApplicationError::OperationFailed {
                context: "reserve site slug".to_string(),
                source: "slug reservation lock poisoned".into(),
            })?;
        if reserved.contains(slug) || self.fs.exists(&self.document_path(slug)) {
            return Err(DomainError::SlugTaken(slug.to_string()).into());
        }
        reserved.insert(slug.to_string());
        Ok(())
    }
}

impl ContentSubstrate for SiteStore {
    fn create_site(&self, name: LocalizedText, description: LocalizedText) -> ApplicationResult<Site> {
        let site = Site::new(name, description);
        debug!("create_site: id={}", site.id);
        Ok(site)
    }

    #[instrument(level = "debug", skip(self, site))]
    fn assign_slug(&self, site: &mut Site, slug: &str) -> ApplicationResult<()> {
        validate_slug(slug)?;
        self.reserve(slug)?;
        site.set_slug(slug);
        Ok(())
    }

    fn create_menu(&self, site: &mut Site, title: LocalizedText) -> ApplicationResult<MenuId> {
        Ok(site.add_menu(title))
    }

    fn configure_menu(
        &self,
        site: &mut Site,
        menu: MenuId,
        order: u32,
        privileged: bool,
    ) -> ApplicationResult<()> {
        site.set_menu_order(menu, order)?;
        site.set_menu_privileged(menu, privileged)?;
        Ok(())
    }

    fn create_page(&self, site: &mut Site, page: NewPage) -> ApplicationResult<PageId> {
        Ok(site.add_page(page, Utc::now())?)
    }

    fn get_or_create_category(
        &self,
        site: &mut Site,
        slug: &str,
        title: LocalizedText,
    ) -> ApplicationResult<CategoryId> {
        validate_slug(slug)?;
        Ok(site.get_or_create_category(slug, title))
    }

    fn component_for_type(&self, kind: ComponentKind) -> Arc<Component> {
        Arc::new(Component::Typed(kind))
    }

    #[instrument(level = "debug", skip(self, site))]
    fn publish(&self, site: &Site) -> ApplicationResult<()> {
        let document = SiteDocument::from_site(site)?;
        let content = toml::to_string_pretty(&document).map_err(|e| {
            ApplicationError::OperationFailed {
                context: format!("serialize site {}", document.slug),
                source: Box::new(e),
            }
        })?;

        self.fs
            .create_dir_all(&self.sites_dir)
            .with_path_context("create sites directory", &self.sites_dir)?;
        let path = self.document_path(&document.slug);
        self.fs
            .write(&path, &content)
            .with_path_context("write site document", &path)?;

        info!("published site {} to {}", document.slug, path.display());
        Ok(())
    }
}

/// Serialized form of a published site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteDocument {
    pub id: String,
    pub slug: String,
    pub builder: Option<String>,
    pub initial_page: Option<String>,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub course: Option<CourseRef>,
    #[serde(default)]
    pub categories: Vec<CategoryDocument>,
    #[serde(default)]
    pub menus: Vec<MenuDocument>,
    #[serde(default)]
    pub pages: Vec<PageDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDocument {
    pub slug: String,
    pub title: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuDocument {
    pub order: u32,
    pub privileged: bool,
    pub system: bool,
    /// Slugs of the top-level entries.
    pub pages: Vec<String>,
    pub title: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDocument {
    pub slug: String,
    pub visible: bool,
    /// Ordinal of the menu the page sits in.
    pub menu: Option<u32>,
    pub parent: Option<String>,
    pub author: String,
    pub components: Vec<String>,
    pub can_view: Option<String>,
    pub created_at: String,
    pub title: LocalizedText,
}

impl SiteDocument {
    pub fn from_site(site: &Site) -> ApplicationResult<Self> {
        let slug = site.slug().ok_or_else(|| DomainError::InvalidSlug {
            slug: String::new(),
            reason: "site has no slug".to_string(),
        })?;
        let page_slug = |id: PageId| site.page(id).map(|p| p.slug.clone());
        let menu_order = |id: MenuId| site.menu(id).map(|m| m.order);

        let menus = site
            .menus()
            .into_iter()
            .map(|(id, menu)| MenuDocument {
                order: menu.order,
                privileged: menu.privileged,
                system: site.system_menu() == Some(id),
                pages: menu.items.iter().filter_map(|p| page_slug(*p)).collect(),
                title: menu.title.clone(),
            })
            .collect();

        let pages = site
            .pages()
            .map(|(_, page)| PageDocument {
                slug: page.slug.clone(),
                visible: page.visible,
                menu: page.menu.and_then(menu_order),
                parent: page.parent.and_then(page_slug),
                author: page.author.username.clone(),
                components: page.components.iter().map(|c| c.describe(site)).collect(),
                can_view: page.can_view.as_ref().map(ToString::to_string),
                created_at: page.created_at.to_rfc3339(),
                title: page.title.clone(),
            })
            .collect();

        let categories = site
            .categories()
            .iter()
            .map(|c| CategoryDocument {
                slug: c.slug.clone(),
                title: c.title.clone(),
            })
            .collect();

        Ok(Self {
            id: site.id.to_string(),
            slug: slug.to_string(),
            builder: site.builder().map(str::to_string),
            initial_page: site.initial_page().and_then(page_slug),
            name: site.name.clone(),
            description: site.description.clone(),
            course: site.course().cloned(),
            categories,
            menus,
            pages,
        })
    }
}
