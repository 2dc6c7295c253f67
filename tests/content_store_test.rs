//! Tests for SiteStore on a real filesystem
//!
//! Published sites land in `<base_dir>/sites/<slug>.toml`; a slug with a
//! published document cannot be assigned again, even by a fresh store.

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use coursesite::application::services::CourseSiteBuilder;
use coursesite::application::ApplicationError;
use coursesite::domain::{Course, DomainError};
use coursesite::infrastructure::traits::{
    AcademicGroups, ContentSubstrate, RealFileSystem, SessionAuth,
};
use coursesite::infrastructure::{BundleCatalog, SiteStore};

fn fixture_course() -> Course {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/course.toml");
    let content = std::fs::read_to_string(path).unwrap();
    Course::from_toml(&content).unwrap()
}

fn builder_for(store: Arc<SiteStore>) -> CourseSiteBuilder {
    CourseSiteBuilder::new(
        store,
        Arc::new(AcademicGroups),
        Arc::new(SessionAuth::for_user("admin")),
        &BundleCatalog::builtin("en-GB"),
    )
}

fn disk_store(temp: &TempDir) -> Arc<SiteStore> {
    Arc::new(SiteStore::new(Arc::new(RealFileSystem), &temp.path().join("sites")))
}

#[test]
fn given_scaffolded_site_when_publish_then_document_written_and_listed() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let store = disk_store(&temp);
    let site = builder_for(Arc::clone(&store)).create(&fixture_course()).unwrap();

    // Act
    store.publish(&site).unwrap();

    // Assert
    assert!(temp.path().join("sites/ABC-42.toml").exists());
    assert_eq!(store.list().unwrap(), vec!["ABC-42".to_string()]);

    let document = store.load("ABC-42").unwrap();
    assert_eq!(document.slug, "ABC-42");
    assert_eq!(document.builder.as_deref(), Some("CourseSiteBuilder"));
    assert_eq!(document.initial_page.as_deref(), Some("firstPage"));
    assert_eq!(document.pages.len(), 19);
    assert_eq!(
        document.description.get("pt-PT"),
        Some("Desenhar e analisar algoritmos elementares.")
    );

    let system = document.menus.iter().find(|m| m.system).unwrap();
    assert_eq!(system.order, 0);
    assert!(system.privileged);
    assert_eq!(system.pages.len(), 18);

    let marks = document.pages.iter().find(|p| p.slug == "marks").unwrap();
    assert_eq!(
        marks.can_view.as_deref(),
        Some("teachers(ABC-42) | students(ABC-42) | authorized(MANAGE_AUTHORIZATIONS)")
    );
    assert_eq!(marks.components, vec!["course.marks".to_string()]);
}

#[test]
fn given_published_site_when_fresh_store_scaffolds_same_course_then_slug_taken() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let store = disk_store(&temp);
    let site = builder_for(Arc::clone(&store)).create(&fixture_course()).unwrap();
    store.publish(&site).unwrap();

    // Act
    let result = builder_for(disk_store(&temp)).create(&fixture_course());

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::SlugTaken(_)))
    ));
}

#[test]
fn given_empty_base_dir_when_list_then_no_sites() {
    let temp = TempDir::new().unwrap();

    assert!(disk_store(&temp).list().unwrap().is_empty());
}

#[test]
fn given_missing_document_when_load_then_operation_failed() {
    let temp = TempDir::new().unwrap();

    let result = disk_store(&temp).load("XYZ-1");

    assert!(matches!(result, Err(ApplicationError::OperationFailed { .. })));
}
