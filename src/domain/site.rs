//! Site graph: menus, pages, categories and the components pages render.
//!
//! Pages live in a generational arena owned by the [`Site`]; menus and parents
//! refer to them by [`PageId`]. Components are held as `Arc<Component>`: two
//! pages holding the same `Arc` deliberately share one immutable component
//! configuration (e.g. the announcements feed on the initial page and on the
//! announcements listing page).

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use generational_arena::{Arena, Index};
use uuid::Uuid;

use crate::domain::entities::{CourseRef, LocalizedText, User};
use crate::domain::error::DomainError;
use crate::domain::group::Group;
use crate::domain::slug::unique_slug;

/// Handle to a page inside its site's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(Index);

/// Position of a menu in its site's menu list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MenuId(usize);

/// Position of a category in its site's category list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CategoryId(usize);

/// Rendering components known to course sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentKind {
    InitialPage,
    Groups,
    Evaluations,
    BibliographicReferences,
    Schedule,
    EvaluationMethods,
    Objectives,
    LessonPlan,
    Shifts,
    Marks,
    ViewPost,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 11] = [
        ComponentKind::InitialPage,
        ComponentKind::Groups,
        ComponentKind::Evaluations,
        ComponentKind::BibliographicReferences,
        ComponentKind::Schedule,
        ComponentKind::EvaluationMethods,
        ComponentKind::Objectives,
        ComponentKind::LessonPlan,
        ComponentKind::Shifts,
        ComponentKind::Marks,
        ComponentKind::ViewPost,
    ];

    /// Registry name the rendering side looks the component up by.
    pub fn type_name(&self) -> &'static str {
        match self {
            ComponentKind::InitialPage => "course.initial-page",
            ComponentKind::Groups => "course.groups",
            ComponentKind::Evaluations => "course.evaluations",
            ComponentKind::BibliographicReferences => "course.bibliographic-references",
            ComponentKind::Schedule => "course.schedule",
            ComponentKind::EvaluationMethods => "course.evaluation-methods",
            ComponentKind::Objectives => "course.objectives",
            ComponentKind::LessonPlan => "course.lesson-plan",
            ComponentKind::Shifts => "course.shifts",
            ComponentKind::Marks => "course.marks",
            ComponentKind::ViewPost => "cms.view-post",
        }
    }
}

/// What a page renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Component {
    Typed(ComponentKind),
    /// Feed of the posts in a category.
    CategoryListing { category: CategoryId },
}

impl Component {
    pub fn describe(&self, site: &Site) -> String {
        match self {
            Component::Typed(kind) => kind.type_name().to_string(),
            Component::CategoryListing { category } => match site.category(*category) {
                Some(c) => format!("cms.list-category-posts({})", c.slug),
                None => "cms.list-category-posts(?)".to_string(),
            },
        }
    }
}

/// Ordered container of pages.
#[derive(Debug, Clone)]
pub struct Menu {
    pub title: LocalizedText,
    pub order: u32,
    /// Whether seeing the menu itself is restricted.
    pub privileged: bool,
    /// Top-level entries; children hang off their parent page.
    pub items: Vec<PageId>,
}

#[derive(Debug, Clone)]
pub struct Category {
    pub slug: String,
    pub title: LocalizedText,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub title: LocalizedText,
    /// URL path segment, unique within the site.
    pub slug: String,
    pub visible: bool,
    pub menu: Option<MenuId>,
    pub parent: Option<PageId>,
    pub children: Vec<PageId>,
    pub author: User,
    /// Primary component first, hosted components after it. Never empty.
    pub components: Vec<Arc<Component>>,
    /// Who may view the page; `None` leaves it unrestricted.
    pub can_view: Option<Group>,
    pub created_at: DateTime<Utc>,
}

impl Page {
    pub fn primary_component(&self) -> &Arc<Component> {
        // components is non-empty by construction in Site::add_page
        &self.components[0]
    }

    pub fn hosted_components(&self) -> &[Arc<Component>] {
        &self.components[1..]
    }
}

/// Request to create a page.
#[derive(Debug, Clone)]
pub struct NewPage {
    pub menu: Option<MenuId>,
    pub parent: Option<PageId>,
    pub title: LocalizedText,
    pub visible: bool,
    pub path_segment: String,
    pub author: User,
    pub components: Vec<Arc<Component>>,
}

/// A generated content site.
#[derive(Debug, Clone)]
pub struct Site {
    pub id: Uuid,
    pub name: LocalizedText,
    pub description: LocalizedText,
    slug: Option<String>,
    menus: Vec<Menu>,
    system_menu: Option<MenuId>,
    initial_page: Option<PageId>,
    pages: Arena<Page>,
    page_order: Vec<PageId>,
    categories: Vec<Category>,
    course: Option<CourseRef>,
    builder: Option<String>,
}

impl Site {
    pub fn new(name: LocalizedText, description: LocalizedText) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            slug: None,
            menus: Vec::new(),
            system_menu: None,
            initial_page: None,
            pages: Arena::new(),
            page_order: Vec::new(),
            categories: Vec::new(),
            course: None,
            builder: None,
        }
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.slug = Some(slug.into());
    }

    pub fn course(&self) -> Option<&CourseRef> {
        self.course.as_ref()
    }

    pub fn set_course(&mut self, course: CourseRef) {
        self.course = Some(course);
    }

    /// Slug of the builder that generated this site.
    pub fn builder(&self) -> Option<&str> {
        self.builder.as_deref()
    }

    pub fn set_builder(&mut self, builder: impl Into<String>) {
        self.builder = Some(builder.into());
    }

    // --- menus ---

    /// Append a menu at the next free ordinal.
    pub fn add_menu(&mut self, title: LocalizedText) -> MenuId {
        let order = self
            .menus
            .iter()
            .map(|m| m.order + 1)
            .max()
            .unwrap_or(0);
        self.menus.push(Menu {
            title,
            order,
            privileged: false,
            items: Vec::new(),
        });
        MenuId(self.menus.len() - 1)
    }

    pub fn menu(&self, id: MenuId) -> Option<&Menu> {
        self.menus.get(id.0)
    }

    /// Menus sorted by ordinal.
    pub fn menus(&self) -> Vec<(MenuId, &Menu)> {
        let mut menus: Vec<_> = self
            .menus
            .iter()
            .enumerate()
            .map(|(i, m)| (MenuId(i), m))
            .collect();
        menus.sort_by_key(|(_, m)| m.order);
        menus
    }

    pub fn set_menu_order(&mut self, id: MenuId, order: u32) -> Result<(), DomainError> {
        if self
            .menus
            .iter()
            .enumerate()
            .any(|(i, m)| i != id.0 && m.order == order)
        {
            return Err(DomainError::DuplicateMenuOrder { order });
        }
        self.menu_mut(id)?.order = order;
        Ok(())
    }

    pub fn set_menu_privileged(&mut self, id: MenuId, privileged: bool) -> Result<(), DomainError> {
        self.menu_mut(id)?.privileged = privileged;
        Ok(())
    }

    fn menu_mut(&mut self, id: MenuId) -> Result<&mut Menu, DomainError> {
        self.menus
            .get_mut(id.0)
            .ok_or(DomainError::MenuNotFound(id.0))
    }

    pub fn system_menu(&self) -> Option<MenuId> {
        self.system_menu
    }

    pub fn set_system_menu(&mut self, id: MenuId) -> Result<(), DomainError> {
        self.menu_mut(id)?;
        self.system_menu = Some(id);
        Ok(())
    }

    // --- pages ---

    /// Create a page, placing it in its menu (or under its parent).
    ///
    /// The requested path segment is made unique within the site by appending
    /// `-1`, `-2`, ... when already taken.
    pub fn add_page(&mut self, request: NewPage, created_at: DateTime<Utc>) -> Result<PageId, DomainError> {
        if request.components.is_empty() {
            return Err(DomainError::PageWithoutComponent(request.path_segment));
        }
        if let Some(menu) = request.menu {
            self.menu_mut(menu)?;
        }
        if let Some(parent) = request.parent {
            self.page(parent).ok_or(DomainError::PageNotFound)?;
        }

        let slug = unique_slug(&request.path_segment, |candidate| {
            self.pages.iter().any(|(_, p)| p.slug == candidate)
        });
        let page = Page {
            title: request.title,
            slug,
            visible: request.visible,
            menu: request.menu,
            parent: request.parent,
            children: Vec::new(),
            author: request.author,
            components: request.components,
            can_view: None,
            created_at,
        };
        let id = PageId(self.pages.insert(page));
        self.page_order.push(id);

        match (request.parent, request.menu) {
            (Some(parent), _) => {
                if let Some(parent) = self.pages.get_mut(parent.0) {
                    parent.children.push(id);
                }
            }
            (None, Some(menu)) => self.menu_mut(menu)?.items.push(id),
            (None, None) => {}
        }
        Ok(id)
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.get(id.0)
    }

    /// Pages in creation order.
    pub fn pages(&self) -> impl Iterator<Item = (PageId, &Page)> {
        self.page_order
            .iter()
            .filter_map(|id| self.pages.get(id.0).map(|p| (*id, p)))
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_by_slug(&self, slug: &str) -> Option<(PageId, &Page)> {
        self.pages().find(|(_, p)| p.slug == slug)
    }

    pub fn set_can_view(&mut self, id: PageId, group: Group) -> Result<(), DomainError> {
        let page = self.pages.get_mut(id.0).ok_or(DomainError::PageNotFound)?;
        page.can_view = Some(group);
        Ok(())
    }

    pub fn initial_page(&self) -> Option<PageId> {
        self.initial_page
    }

    pub fn set_initial_page(&mut self, id: PageId) -> Result<(), DomainError> {
        self.page(id).ok_or(DomainError::PageNotFound)?;
        self.initial_page = Some(id);
        Ok(())
    }

    /// Whether `page` is reachable from `menu`, directly or through a parent.
    pub fn menu_contains(&self, menu: MenuId, page: PageId) -> bool {
        let Some(menu) = self.menu(menu) else {
            return false;
        };
        let mut stack: Vec<PageId> = menu.items.clone();
        while let Some(current) = stack.pop() {
            if current == page {
                return true;
            }
            if let Some(p) = self.page(current) {
                stack.extend(p.children.iter().copied());
            }
        }
        false
    }

    // --- categories ---

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(id.0)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_by_slug(&self, slug: &str) -> Option<CategoryId> {
        self.categories
            .iter()
            .position(|c| c.slug == slug)
            .map(CategoryId)
    }

    /// Existing category with `slug`, or a new one titled `title`.
    pub fn get_or_create_category(&mut self, slug: &str, title: LocalizedText) -> CategoryId {
        if let Some(id) = self.category_by_slug(slug) {
            return id;
        }
        self.categories.push(Category {
            slug: slug.to_string(),
            title,
        });
        CategoryId(self.categories.len() - 1)
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.slug().unwrap_or("<no slug>"))
    }
}
