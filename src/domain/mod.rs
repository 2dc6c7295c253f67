//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod group;
pub mod site;
pub mod slug;

pub use entities::*;
pub use error::DomainError;
pub use group::{Group, MembershipOracle};
pub use site::{
    Category, CategoryId, Component, ComponentKind, Menu, MenuId, NewPage, Page, PageId, Site,
};
pub use slug::{course_site_slug, format_slug, validate_slug};
