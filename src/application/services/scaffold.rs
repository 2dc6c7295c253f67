//! Course site scaffolding
//!
//! Builds the site graph for a course: system and auxiliary menus, the
//! announcement and summary categories, the initial page, the fixed sequence
//! of course pages, and the detached post view page.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, Label, SiteLabels};
use crate::domain::{
    course_site_slug, AcademicOperation, Component, ComponentKind, Course, Group, LocalizedText,
    MenuId, NewPage, Site, User,
};
use crate::infrastructure::traits::{
    AuthContext, ContentSubstrate, GroupResolution, LocalizationResolver,
};

/// Slug the course site builder registers under.
pub const COURSE_SITE_BUILDER_SLUG: &str = "CourseSiteBuilder";

pub const SUMMARY_CATEGORY: &str = "summary";
pub const ANNOUNCEMENT_CATEGORY: &str = "announcement";

pub const INITIAL_PAGE_SEGMENT: &str = "firstPage";
pub const VIEW_POST_SEGMENT: &str = "view";

/// Ordinal of the system menu.
pub const SYSTEM_MENU_ORDER: u32 = 0;
/// Ordinal of the auxiliary ("extra pages") menu.
pub const EXTRA_MENU_ORDER: u32 = 1;

/// Where a page's component comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentSource {
    /// A component of its own.
    Fresh(ComponentKind),
    /// The references component shared across the site.
    References,
    /// The evaluation methods component shared across the site.
    EvaluationMethods,
    /// The objectives-style component; every page using it differs only by title and slug.
    Objectives,
    /// The announcements feed, also hosted by the initial page.
    Announcements,
    /// The summaries feed.
    Summaries,
}

/// One entry of the fixed course page sequence.
#[derive(Debug, Clone, Copy)]
pub struct PagePlan {
    pub title: Label,
    pub segment: &'static str,
    pub component: ComponentSource,
    /// Restrict viewing to course members.
    pub members_only: bool,
}

const fn plan(title: Label, segment: &'static str, component: ComponentSource) -> PagePlan {
    PagePlan {
        title,
        segment,
        component,
        members_only: false,
    }
}

const fn members_only(title: Label, segment: &'static str, component: ComponentSource) -> PagePlan {
    PagePlan {
        title,
        segment,
        component,
        members_only: true,
    }
}

/// System menu pages created after the initial page, in menu order.
pub const PAGE_PLAN: [PagePlan; 17] = [
    members_only(Label::Groups, "groupings", ComponentSource::Fresh(ComponentKind::Groups)),
    plan(Label::Evaluations, "evaluations", ComponentSource::Fresh(ComponentKind::Evaluations)),
    plan(Label::BibliographicReferences, "bibliographicReferences", ComponentSource::References),
    plan(Label::Schedule, "calendarEvents", ComponentSource::Fresh(ComponentKind::Schedule)),
    plan(Label::EvaluationMethods, "evaluationMethods", ComponentSource::EvaluationMethods),
    plan(Label::Objectives, "objectives", ComponentSource::Objectives),
    plan(Label::LessonPlan, "lessonPlan", ComponentSource::Fresh(ComponentKind::LessonPlan)),
    plan(Label::Program, "program", ComponentSource::Objectives),
    plan(Label::Shifts, "shifts", ComponentSource::Fresh(ComponentKind::Shifts)),
    plan(Label::Announcements, "category", ComponentSource::Announcements),
    plan(Label::Summaries, "category", ComponentSource::Summaries),
    plan(Label::Prerequisites, "prerequisites", ComponentSource::Objectives),
    plan(Label::LaboratorialComponent, "laboratorialComponent", ComponentSource::Objectives),
    plan(
        Label::ProgrammingAndComputingComponent,
        "programmingAndComputingComponent",
        ComponentSource::Objectives,
    ),
    plan(Label::CrossCompetenceComponent, "crossCompetenceComponent", ComponentSource::Objectives),
    plan(Label::EthicalPrinciples, "ethicalPrinciples", ComponentSource::Objectives),
    members_only(Label::Marks, "marks", ComponentSource::Fresh(ComponentKind::Marks)),
];

/// Components instantiated once per site and attached to several pages.
struct SharedComponents {
    home: Arc<Component>,
    references: Arc<Component>,
    evaluation_methods: Arc<Component>,
    objectives: Arc<Component>,
    announcements: Arc<Component>,
    summaries: Arc<Component>,
}

impl SharedComponents {
    fn resolve(&self, source: ComponentSource, substrate: &dyn ContentSubstrate) -> Arc<Component> {
        match source {
            ComponentSource::Fresh(kind) => substrate.component_for_type(kind),
            ComponentSource::References => Arc::clone(&self.references),
            ComponentSource::EvaluationMethods => Arc::clone(&self.evaluation_methods),
            ComponentSource::Objectives => Arc::clone(&self.objectives),
            ComponentSource::Announcements => Arc::clone(&self.announcements),
            ComponentSource::Summaries => Arc::clone(&self.summaries),
        }
    }
}

/// Scaffolds course sites.
pub struct CourseSiteBuilder {
    slug: String,
    labels: SiteLabels,
    substrate: Arc<dyn ContentSubstrate>,
    groups: Arc<dyn GroupResolution>,
    auth: Arc<dyn AuthContext>,
}

impl fmt::Debug for CourseSiteBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CourseSiteBuilder")
            .field("slug", &self.slug)
            .finish_non_exhaustive()
    }
}

impl CourseSiteBuilder {
    /// Create a builder; labels are resolved once, here.
    pub fn new(
        substrate: Arc<dyn ContentSubstrate>,
        groups: Arc<dyn GroupResolution>,
        auth: Arc<dyn AuthContext>,
        localization: &dyn LocalizationResolver,
    ) -> Self {
        Self {
            slug: COURSE_SITE_BUILDER_SLUG.to_string(),
            labels: SiteLabels::resolve(localization),
            substrate,
            groups,
            auth,
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn labels(&self) -> &SiteLabels {
        &self.labels
    }

    fn label(&self, label: Label) -> LocalizedText {
        self.labels.get(label).clone()
    }

    /// Site description: the course objectives for its period, else its name.
    pub fn description_for(course: &Course) -> LocalizedText {
        course
            .objectives()
            .cloned()
            .unwrap_or_else(|| course.name.clone())
    }

    /// Teachers, students and authorization managers of `course`.
    pub fn course_members_group(&self, course: &Course) -> Group {
        Group::any_of([
            self.groups.teacher_group(course),
            self.groups.student_group(course),
            self.groups
                .authorization_group(AcademicOperation::ManageAuthorizations),
        ])
    }

    /// Build the complete site for `course`.
    ///
    /// Substrate failures (e.g. a taken slug) propagate as they are; pages and
    /// menus created before the failure are not cleaned up.
    #[instrument(level = "debug", skip(self, course), fields(course = %course.reference()))]
    pub fn create(&self, course: &Course) -> ApplicationResult<Site> {
        let substrate = self.substrate.as_ref();

        let name = course.name.clone();
        let description = Self::description_for(course);
        let mut site = substrate.create_site(name, description)?;
        site.set_builder(self.slug.clone());

        let slug = course_site_slug(course);
        substrate.assign_slug(&mut site, &slug)?;
        debug!("create: slug={}", slug);

        let menu = substrate.create_menu(&mut site, self.label(Label::Menu))?;
        substrate.configure_menu(&mut site, menu, SYSTEM_MENU_ORDER, true)?;
        site.set_system_menu(menu)?;

        let extra = substrate.create_menu(&mut site, self.label(Label::ExtraMenu))?;
        substrate.configure_menu(&mut site, extra, EXTRA_MENU_ORDER, false)?;

        let author = self
            .auth
            .current_user()
            .ok_or(ApplicationError::NotAuthenticated)?;

        let summaries = substrate.get_or_create_category(
            &mut site,
            SUMMARY_CATEGORY,
            self.label(Label::Summaries),
        )?;
        let announcements = substrate.get_or_create_category(
            &mut site,
            ANNOUNCEMENT_CATEGORY,
            self.label(Label::Announcements),
        )?;

        let shared = SharedComponents {
            home: substrate.component_for_type(ComponentKind::InitialPage),
            references: substrate.component_for_type(ComponentKind::BibliographicReferences),
            evaluation_methods: substrate.component_for_type(ComponentKind::EvaluationMethods),
            objectives: substrate.component_for_type(ComponentKind::Objectives),
            announcements: Arc::new(Component::CategoryListing {
                category: announcements,
            }),
            summaries: Arc::new(Component::CategoryListing {
                category: summaries,
            }),
        };

        let initial_page = substrate.create_page(
            &mut site,
            self.new_page(
                Some(menu),
                Label::InitialPage,
                INITIAL_PAGE_SEGMENT,
                &author,
                vec![Arc::clone(&shared.home), Arc::clone(&shared.announcements)],
            ),
        )?;
        site.set_initial_page(initial_page)?;

        let members = self.course_members_group(course);
        debug!("create: course members group = {}", members);

        for entry in &PAGE_PLAN {
            let component = shared.resolve(entry.component, substrate);
            let page = substrate.create_page(
                &mut site,
                self.new_page(Some(menu), entry.title, entry.segment, &author, vec![component]),
            )?;
            if entry.members_only {
                site.set_can_view(page, members.clone())?;
            }
        }

        substrate.create_page(
            &mut site,
            self.new_page(
                None,
                Label::ViewPost,
                VIEW_POST_SEGMENT,
                &author,
                vec![substrate.component_for_type(ComponentKind::ViewPost)],
            ),
        )?;

        site.set_course(course.reference());

        info!(
            "scaffolded site {} with {} pages",
            slug,
            site.page_count()
        );
        Ok(site)
    }

    fn new_page(
        &self,
        menu: Option<MenuId>,
        title: Label,
        segment: &str,
        author: &User,
        components: Vec<Arc<Component>>,
    ) -> NewPage {
        NewPage {
            menu,
            parent: None,
            title: self.label(title),
            visible: true,
            path_segment: segment.to_string(),
            author: author.clone(),
            components,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_page_plan_then_only_groupings_and_marks_are_members_only() {
        let restricted: Vec<&str> = PAGE_PLAN
            .iter()
            .filter(|p| p.members_only)
            .map(|p| p.segment)
            .collect();
        assert_eq!(restricted, vec!["groupings", "marks"]);
    }

    #[test]
    fn given_page_plan_then_titles_are_distinct() {
        let mut titles: Vec<Label> = PAGE_PLAN.iter().map(|p| p.title).collect();
        titles.sort();
        titles.dedup();
        assert_eq!(titles.len(), PAGE_PLAN.len());
    }
}
