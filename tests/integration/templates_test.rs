//! Template store integration tests: default-flag invariant, resolution
//! fallback order, and the directory import surface.

use std::fs;

use copyforge::models::{TemplateCategory, TemplateCreateRequest};
use copyforge::services::templates::TemplateService;
use copyforge::storage::database::Database;
use copyforge::AppError;

fn service() -> TemplateService {
    TemplateService::new(Database::new_in_memory().expect("in-memory db"))
}

fn req(category: TemplateCategory, name: &str, is_default: bool) -> TemplateCreateRequest {
    TemplateCreateRequest {
        category,
        name: name.to_string(),
        description: None,
        content: format!("{} {}", name, category.placeholder()),
        is_default,
        source_path: None,
    }
}

#[test]
fn at_most_one_default_per_category() {
    let service = service();
    let a = service.create(req(TemplateCategory::Title, "a", true)).unwrap();
    let b = service.create(req(TemplateCategory::Title, "b", true)).unwrap();
    let c = service.create(req(TemplateCategory::Title, "c", false)).unwrap();

    // A default in another category is untouched
    let other = service.create(req(TemplateCategory::Article, "d", true)).unwrap();

    let defaults: Vec<i64> = service
        .list(TemplateCategory::Title)
        .unwrap()
        .into_iter()
        .filter(|t| t.is_default)
        .map(|t| t.id)
        .collect();
    assert_eq!(defaults, vec![b.id]);
    assert!(!service.get(a.id).unwrap().unwrap().is_default);
    assert!(!service.get(c.id).unwrap().unwrap().is_default);
    assert!(service.get(other.id).unwrap().unwrap().is_default);
}

#[test]
fn resolution_fallback_order() {
    let service = service();

    // Empty category: nothing to resolve (no legacy file in the test cwd)
    assert!(matches!(
        service.resolve(TemplateCategory::Article, None),
        Err(AppError::NotFound(_))
    ));

    // Earliest-created wins while nothing is flagged
    let first = service.create(req(TemplateCategory::Article, "first", false)).unwrap();
    let second = service.create(req(TemplateCategory::Article, "second", false)).unwrap();
    assert_eq!(
        service.resolve(TemplateCategory::Article, None).unwrap().template_id,
        Some(first.id)
    );

    // A flagged default takes precedence over creation order
    let flagged = service.create(req(TemplateCategory::Article, "flagged", true)).unwrap();
    assert_eq!(
        service.resolve(TemplateCategory::Article, None).unwrap().template_id,
        Some(flagged.id)
    );

    // An explicit id beats every flag
    let resolved = service
        .resolve(TemplateCategory::Article, Some(second.id))
        .unwrap();
    assert_eq!(resolved.template_id, Some(second.id));
    assert_eq!(resolved.content, service.get(second.id).unwrap().unwrap().content);
}

#[test]
fn deleting_default_promotes_survivor() {
    let service = service();
    let default = service.create(req(TemplateCategory::Html, "default", true)).unwrap();
    let survivor = service.create(req(TemplateCategory::Html, "survivor", false)).unwrap();

    assert!(service.delete(default.id).unwrap());

    let promoted = service.get_default(TemplateCategory::Html).unwrap().unwrap();
    assert_eq!(promoted.id, survivor.id);
    assert!(promoted.is_default);

    // Deleting the last template leaves the category empty
    assert!(service.delete(survivor.id).unwrap());
    assert!(service.get_default(TemplateCategory::Html).unwrap().is_none());
}

#[test]
fn import_populates_all_categories_and_skips_existing() {
    let service = service();
    let tmp = tempfile::tempdir().unwrap();

    for category in TemplateCategory::ALL {
        let dir = tmp.path().join(category.as_str());
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("base.txt"),
            format!("base {}", category.placeholder()),
        )
        .unwrap();
    }
    fs::write(tmp.path().join("title").join("extra.txt"), "extra {{topic}}").unwrap();

    let imported = service.import_dir(tmp.path()).unwrap();
    assert_eq!(imported, 4);

    // Every category got a default
    for category in TemplateCategory::ALL {
        let default = service.get_default(category).unwrap().unwrap();
        assert!(default.is_default);
    }

    // Second run: same files, nothing new
    assert_eq!(service.import_dir(tmp.path()).unwrap(), 0);

    // A new file lands without disturbing the existing default
    fs::write(tmp.path().join("title").join("late.txt"), "late {{topic}}").unwrap();
    assert_eq!(service.import_dir(tmp.path()).unwrap(), 1);
    let default = service.get_default(TemplateCategory::Title).unwrap().unwrap();
    assert_ne!(default.name, "late");
}

#[test]
fn import_tolerates_missing_category_dirs() {
    let service = service();
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("title")).unwrap();
    fs::write(tmp.path().join("title").join("only.txt"), "t {{topic}}").unwrap();

    // article/ and html/ directories absent
    assert_eq!(service.import_dir(tmp.path()).unwrap(), 1);
    assert!(service.get_default(TemplateCategory::Article).unwrap().is_none());
}
