//! Slug derivation and validation

use std::sync::OnceLock;

use itertools::Itertools;
use regex::Regex;

use crate::domain::entities::Course;
use crate::domain::error::DomainError;

/// Separator between slug parts.
pub const SLUG_SEPARATOR: &str = "-";

/// Slug of the site generated for `course`: `<code>-<id>`.
pub fn course_site_slug(course: &Course) -> String {
    format_slug(&course.code, &course.id)
}

/// Join a course code and identifier into a site slug.
pub fn format_slug(code: &str, id: &str) -> String {
    [code, id].iter().join(SLUG_SEPARATOR)
}

fn slug_regex() -> &'static Regex {
    static SLUG: OnceLock<Regex> = OnceLock::new();
    SLUG.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._~-]*$").expect("slug pattern is a valid regex")
    })
}

/// Reject slugs that are not URL-safe.
pub fn validate_slug(slug: &str) -> Result<(), DomainError> {
    if slug_regex().is_match(slug) {
        Ok(())
    } else {
        Err(DomainError::InvalidSlug {
            slug: slug.to_string(),
            reason: "must start with a letter or digit and contain only [A-Za-z0-9._~-]"
                .to_string(),
        })
    }
}

/// First of `base`, `base-1`, `base-2`, ... not rejected by `taken`.
pub fn unique_slug(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}{SLUG_SEPARATOR}{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}
