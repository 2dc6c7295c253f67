//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent constraint violations in the site graph.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("site slug already taken: {0}")]
    SlugTaken(String),

    #[error("invalid slug '{slug}': {reason}")]
    InvalidSlug { slug: String, reason: String },

    #[error("menu ordinal already in use: {order}")]
    DuplicateMenuOrder { order: u32 },

    #[error("menu not found: #{0}")]
    MenuNotFound(usize),

    #[error("page not found in site")]
    PageNotFound,

    #[error("page has no component: {0}")]
    PageWithoutComponent(String),

    #[error("invalid course record: {message}")]
    InvalidCourse { message: String },
}
