//! Application services
//!
//! Concrete services that orchestrate domain logic. They depend on the
//! collaborator boundary traits (ContentSubstrate, GroupResolution, ...) but
//! are themselves concrete structs, not traits.

mod registry;
mod scaffold;

pub use registry::{BuilderInstance, BuilderKind, BuilderRegistry};
pub use scaffold::{
    ComponentSource, CourseSiteBuilder, PagePlan, ANNOUNCEMENT_CATEGORY, COURSE_SITE_BUILDER_SLUG,
    EXTRA_MENU_ORDER, INITIAL_PAGE_SEGMENT, PAGE_PLAN, SUMMARY_CATEGORY, SYSTEM_MENU_ORDER,
    VIEW_POST_SEGMENT,
};
