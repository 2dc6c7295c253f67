//! Tests for ServiceContainer wiring
//!
//! - a real container publishes under `<base_dir>/sites`
//! - a dry-run container sees published sites but never writes them
//! - each container's builder uses that container's store and author

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use coursesite::application::ApplicationError;
use coursesite::application::services::BuilderRegistry;
use coursesite::config::Settings;
use coursesite::domain::{Course, DomainError};
use coursesite::infrastructure::di::ServiceContainer;
use coursesite::infrastructure::traits::{
    ContentSubstrate, FileSystem, OverlayFileSystem, RealFileSystem,
};

fn fixture_course() -> Course {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/course.toml");
    let content = std::fs::read_to_string(path).unwrap();
    Course::from_toml(&content).unwrap()
}

fn settings_for(base_dir: &Path, author: &str) -> Settings {
    Settings {
        base_dir: base_dir.to_path_buf(),
        bundle_dir: None,
        default_locale: "en-GB".to_string(),
        author: Some(author.to_string()),
    }
}

fn authors(site: &coursesite::domain::Site) -> Vec<String> {
    let mut names: Vec<String> = site
        .pages()
        .map(|(_, page)| page.author.username.clone())
        .collect();
    names.dedup();
    names
}

#[test]
fn given_real_container_when_scaffold_and_publish_then_document_under_sites_dir() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let container = ServiceContainer::new(settings_for(temp.path(), "admin")).unwrap();

    // Act
    let site = container
        .course_site_builder()
        .unwrap()
        .create(&fixture_course())
        .unwrap();
    container.store.publish(&site).unwrap();

    // Assert
    assert_eq!(container.store.sites_dir(), temp.path().join("sites"));
    assert_eq!(container.settings.sites_dir(), temp.path().join("sites"));
    assert!(temp.path().join("sites/ABC-42.toml").exists());
    assert_eq!(container.store.list().unwrap(), vec!["ABC-42".to_string()]);
    assert_eq!(authors(&site), vec!["admin".to_string()]);
}

#[test]
fn given_published_site_when_dry_run_scaffold_then_slug_taken() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let real = ServiceContainer::new(settings_for(temp.path(), "admin")).unwrap();
    let site = real
        .course_site_builder()
        .unwrap()
        .create(&fixture_course())
        .unwrap();
    real.store.publish(&site).unwrap();

    // Act
    let dry = ServiceContainer::dry_run(settings_for(temp.path(), "admin")).unwrap();
    let result = dry.course_site_builder().unwrap().create(&fixture_course());

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::SlugTaken(ref slug))) if slug == "ABC-42"
    ));
    assert_eq!(dry.store.list().unwrap(), vec!["ABC-42".to_string()]);
}

#[test]
fn given_dry_run_container_when_publish_then_nothing_written_to_disk() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let dry = ServiceContainer::dry_run(settings_for(temp.path(), "admin")).unwrap();
    let site = dry
        .course_site_builder()
        .unwrap()
        .create(&fixture_course())
        .unwrap();

    // Act
    dry.store.publish(&site).unwrap();

    // Assert
    assert!(!temp.path().join("sites").exists());
    assert_eq!(dry.store.load("ABC-42").unwrap().slug, "ABC-42");
}

#[test]
fn given_two_containers_when_scaffold_then_each_uses_own_store_and_author() {
    // Arrange
    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();
    let first = ServiceContainer::new(settings_for(first_dir.path(), "alice")).unwrap();
    let second = ServiceContainer::new(settings_for(second_dir.path(), "bob")).unwrap();

    // Act
    let first_site = first
        .course_site_builder()
        .unwrap()
        .create(&fixture_course())
        .unwrap();
    let second_site = second
        .course_site_builder()
        .unwrap()
        .create(&fixture_course())
        .unwrap();
    first.store.publish(&first_site).unwrap();
    second.store.publish(&second_site).unwrap();

    // Assert
    assert!(!Arc::ptr_eq(
        &first.course_site_builder().unwrap(),
        &second.course_site_builder().unwrap()
    ));
    assert_eq!(authors(&first_site), vec!["alice".to_string()]);
    assert_eq!(authors(&second_site), vec!["bob".to_string()]);
    assert!(first_dir.path().join("sites/ABC-42.toml").exists());
    assert!(second_dir.path().join("sites/ABC-42.toml").exists());
    assert_eq!(first.store.load("ABC-42").unwrap().pages[0].author, "alice");
    assert_eq!(second.store.load("ABC-42").unwrap().pages[0].author, "bob");
}

#[test]
fn given_shared_registry_when_second_container_asks_then_first_builder_reused() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let registry = Arc::new(BuilderRegistry::new());
    let first = ServiceContainer::new(settings_for(temp.path(), "alice"))
        .unwrap()
        .with_registry(Arc::clone(&registry));
    let second = ServiceContainer::new(settings_for(temp.path(), "bob"))
        .unwrap()
        .with_registry(Arc::clone(&registry));

    // Act
    let from_first = first.course_site_builder().unwrap();
    let from_second = second.course_site_builder().unwrap();

    // Assert
    assert!(Arc::ptr_eq(&from_first, &from_second));
    assert_eq!(registry.len().unwrap(), 1);
}

#[test]
fn given_overlay_when_writing_then_base_untouched_and_reads_see_both() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let on_disk = temp.path().join("published.toml");
    std::fs::write(&on_disk, "slug = \"published\"").unwrap();
    let overlay = OverlayFileSystem::new(Arc::new(RealFileSystem));
    let pending = temp.path().join("pending.toml");

    // Act
    overlay.write(&pending, "slug = \"pending\"").unwrap();

    // Assert
    assert!(!pending.exists());
    assert!(overlay.exists(&pending));
    assert!(overlay.exists(&on_disk));
    assert_eq!(overlay.read_to_string(&on_disk).unwrap(), "slug = \"published\"");
    assert_eq!(overlay.read_to_string(&pending).unwrap(), "slug = \"pending\"");
    assert_eq!(overlay.list_dir(temp.path()).unwrap(), vec![pending, on_disk]);
}
