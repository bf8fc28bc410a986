//! File-backed store integration tests

use app_lib::app::{create_and_save_person, find_person_by_id};
use app_lib::config::{AppConfig, DbLocation};
use app_lib::domain::NewPerson;
use app_lib::infra::{connect, init_db};

#[test]
fn documents_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("people.db");

    let id = {
        let pool = init_db(&path).unwrap();
        create_and_save_person(&pool, NewPerson::sample()).unwrap().id
    };

    let pool = init_db(&path).unwrap();
    let p = find_person_by_id(&pool, &id).unwrap().unwrap();
    assert_eq!(p.name, "John");
    assert_eq!(p.favorite_foods, vec!["fruit", "veggies", "eggs"]);
}

#[test]
fn connect_follows_configured_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.db");
    let url = format!("sqlite://{}", path.display());

    let cfg = AppConfig::from_value(Some(url)).unwrap();
    assert_eq!(cfg.db_location(), DbLocation::File(path.clone()));

    let pool = connect(&cfg.db_location()).unwrap();
    create_and_save_person(&pool, NewPerson::new("Eve", Some(40), &[])).unwrap();
    assert!(path.exists());
}

#[test]
fn in_memory_location_opens_empty_store() {
    let cfg = AppConfig::from_value(Some(":memory:".into())).unwrap();
    let pool = connect(&cfg.db_location()).unwrap();
    assert!(find_person_by_id(&pool, "anything").unwrap().is_none());
}
