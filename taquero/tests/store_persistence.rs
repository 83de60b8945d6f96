//! Record stores over the file-backed key-value store

use std::sync::Arc;

use chrono::NaiveDate;
use shared::models::{Allergen, AllergenRecord, Event, Record, RecordStatus};
use shared::ErrorCode;
use taquero::wizards::{AllergenForm, EventForm, Wizard};
use taquero::{FileStore, KeyValueStore, RecordStore};

fn file_store(dir: &std::path::Path) -> Arc<dyn KeyValueStore> {
    Arc::new(FileStore::open(dir).unwrap())
}

fn event(name: &str) -> Event {
    Wizard::new(EventForm {
        name: name.into(),
        date: NaiveDate::from_ymd_opt(2024, 6, 1),
        location: "Market square".into(),
        ..Default::default()
    })
    .submit("ana")
    .unwrap()
}

#[test]
fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::<Event>::open(file_store(dir.path()), None).unwrap();
    let created = store.create(event("Saturday market")).unwrap();
    store.create(event("Food festival")).unwrap();

    let reopened = RecordStore::<Event>::open(file_store(dir.path()), None).unwrap();
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.get(created.id()).unwrap().name, "Saturday market");
    assert!(dir.path().join("events.json").exists());
}

#[test]
fn test_soft_deleted_record_does_not_reappear() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::<Event>::open(file_store(dir.path()), None).unwrap();
    let keep = store.create(event("Keep")).unwrap();
    let gone = store.create(event("Gone")).unwrap();
    store.delete(gone.id(), "ben").unwrap();

    let reopened = RecordStore::<Event>::open(file_store(dir.path()), None).unwrap();
    let listed: Vec<_> = reopened.list().into_iter().map(|e| e.meta.id).collect();
    assert_eq!(listed, vec![keep.meta.id.clone()]);

    // the row is kept with its status for the audit trail
    let tombstone = reopened.all().into_iter().find(|e| e.meta.id == gone.meta.id).unwrap();
    assert_eq!(tombstone.meta.status, RecordStatus::Deleted);
    assert_eq!(tombstone.meta.updated_by.as_deref(), Some("ben"));

    let err = reopened.update(gone.id(), "ben", |_| Ok(())).unwrap_err();
    assert_eq!(err.code, ErrorCode::RecordDeleted);
    let err = reopened.delete(gone.id(), "ben").unwrap_err();
    assert_eq!(err.code, ErrorCode::RecordNotFound);
}

#[test]
fn test_hard_deleted_allergen_is_removed() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::<AllergenRecord>::open(file_store(dir.path()), None).unwrap();
    let mut form = AllergenForm {
        dish_name: "Churros".into(),
        ingredients: vec!["flour".into(), "sugar".into()],
        ..Default::default()
    };
    form.toggle_contains(Allergen::Gluten);
    let record = store.create(Wizard::new(form).submit("ana").unwrap()).unwrap();
    store.delete(record.id(), "ana").unwrap();

    let reopened = RecordStore::<AllergenRecord>::open(file_store(dir.path()), None).unwrap();
    assert!(reopened.is_empty());
    assert!(reopened.all().is_empty());
}

#[test]
fn test_update_stamps_audit_fields() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::<Event>::open(file_store(dir.path()), None).unwrap();
    let created = store.create(event("Pop-up")).unwrap();
    assert!(created.meta.updated_at.is_none());

    let updated = store
        .update(created.id(), "carla", |e| {
            e.expected_covers = Some(150);
            Ok(())
        })
        .unwrap();
    assert_eq!(updated.meta.id, created.meta.id);
    assert_eq!(updated.meta.created_by, "ana");
    assert_eq!(updated.meta.updated_by.as_deref(), Some("carla"));
    assert!(updated.meta.updated_at.is_some());

    // a failing edit leaves the stored record alone
    let err = store
        .update(created.id(), "carla", |e| {
            e.name = "half-edited".into();
            Err(shared::AppError::validation("nope"))
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
    assert_eq!(store.get(created.id()).unwrap().name, "Pop-up");
}

#[test]
fn test_corrupted_domain_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("events.json"), "[{\"broken\":").unwrap();
    let err = RecordStore::<Event>::open(file_store(dir.path()), None).err().unwrap();
    assert_eq!(err.code, ErrorCode::StorageCorrupted);
}
