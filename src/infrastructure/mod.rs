//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements the collaborator traits and wires up services.

pub mod content_store;
pub mod di;
pub mod error;
pub mod localization;
pub mod traits;

pub use content_store::{SiteDocument, SiteStore};
pub use error::InfraError;
pub use localization::BundleCatalog;
