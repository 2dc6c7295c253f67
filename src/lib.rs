//! Course site scaffolding
//!
//! Turns a course record into a fully populated content site: menus,
//! announcement and summary categories, the standard course pages with their
//! components, and access restrictions on the member-only pages.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
