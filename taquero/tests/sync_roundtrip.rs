//! Stores, sync worker and a remote sheet double

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;
use shared::models::{CheckKind, Event, Method, Record};
use shared::{AppError, AppResult, ErrorCode, SyncAction};
use taquero::safety::record_batch;
use taquero::wizards::{EventForm, MethodForm, Wizard};
use taquero::{AppState, Config, KeyValueStore, MemorySheet, MemoryStore, RemoteSheet, RetryPolicy};

fn quick_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 2,
        initial_delay: Duration::from_millis(1),
    }
}

fn online(sheet: &Arc<MemorySheet>) -> AppState {
    let remote: Arc<dyn RemoteSheet> = sheet.clone();
    AppState::with_remote(
        Config::local("unused"),
        Arc::new(MemoryStore::new()),
        Some(remote),
        quick_retry(),
    )
    .unwrap()
}

/// Memory storage whose next `n` writes fail (disk full, read-only card)
#[derive(Default)]
struct FlakyStorage {
    inner: MemoryStore,
    failing_writes: AtomicUsize,
}

impl KeyValueStore for FlakyStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        if self
            .failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(AppError::storage("disk full"));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.inner.remove(key)
    }

    fn keys(&self) -> AppResult<Vec<String>> {
        self.inner.keys()
    }
}

fn event(name: &str) -> Event {
    Wizard::new(EventForm {
        name: name.into(),
        date: NaiveDate::from_ymd_opt(2024, 7, 20),
        location: "Harbour".into(),
        ..Default::default()
    })
    .submit("ana")
    .unwrap()
}

#[tokio::test]
async fn test_mutations_reach_sheet_in_order() {
    let sheet = Arc::new(MemorySheet::new());
    let state = online(&sheet);

    let e = state.stores.events.create(event("Harbour fest")).unwrap();
    for covers in [100, 200, 300] {
        state
            .stores
            .events
            .update(e.id(), "ana", |ev| {
                ev.expected_covers = Some(covers);
                Ok(())
            })
            .unwrap();
    }
    assert!(state.settle().await);

    let log = sheet.log();
    let actions: Vec<_> = log.iter().map(|r| r.action).collect();
    assert_eq!(
        actions,
        vec![SyncAction::Create, SyncAction::Update, SyncAction::Update, SyncAction::Update]
    );
    let rows = sheet.rows("events");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["expectedCovers"], 300);
    assert_eq!(rows[0]["createdBy"], "ana");

    state.stores.events.delete(e.id(), "ana").unwrap();
    assert!(state.settle().await);
    assert!(sheet.rows("events").is_empty());
    state.shutdown().await;
}

#[tokio::test]
async fn test_failed_push_keeps_local_change() {
    let sheet = Arc::new(MemorySheet::new());
    let state = online(&sheet);
    // initial try + 2 retries
    sheet.fail_next(3);

    let e = state.stores.events.create(event("Rainy market")).unwrap();
    assert!(state.settle().await);

    assert!(state.stores.events.get(e.id()).is_some());
    assert!(sheet.rows("events").is_empty());
    let sync = state.sync().unwrap();
    let failures = sync.status().failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].request.id, e.meta.id);
    assert_eq!(failures[0].error.code, ErrorCode::RemoteRequestFailed);

    // the next write goes through
    state.stores.events.create(event("Sunny market")).unwrap();
    assert!(state.settle().await);
    assert_eq!(sheet.rows("events").len(), 1);
    state.shutdown().await;
}

#[tokio::test]
async fn test_pull_replaces_local_cache() {
    let sheet = Arc::new(MemorySheet::new());
    let state = online(&sheet);
    let local = state.stores.events.create(event("Local only")).unwrap();
    assert!(state.settle().await);

    // someone edits the spreadsheet by hand
    let mut edited = sheet.rows("events");
    edited[0]["location"] = json!("Pier 4");
    edited.push(json!({ "id": "garbage-row", "name": 12 }));
    sheet.seed("events", edited);

    let count = state.pull("events").await.unwrap();
    assert_eq!(count, 1);
    assert_eq!(state.stores.events.get(local.id()).unwrap().location, "Pier 4");

    let err = state.pull("recipes").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    state.shutdown().await;
}

#[tokio::test]
async fn test_method_validation_syncs_batches() {
    let sheet = Arc::new(MemorySheet::new());
    let state = online(&sheet);
    let method: Method = Wizard::new(MethodForm {
        name: "Pulled pork".into(),
        kind: Some(CheckKind::Cooking),
        ..Default::default()
    })
    .submit("chef")
    .unwrap();
    let method = state.stores.methods.create(method).unwrap();

    for (n, celsius) in [(1, 71.0), (2, 60.0), (3, 68.0), (4, 66.5)] {
        state
            .stores
            .methods
            .update(method.id(), "chef", |m| {
                record_batch(m, n, shared::models::TemperatureReading::new(celsius), "chef", None, chrono::Utc::now())
                    .map(|_| ())
            })
            .unwrap();
    }
    let validated = state.stores.methods.get(method.id()).unwrap();
    assert!(validated.is_validated());
    assert_eq!(validated.progress(), (3, 3));

    let err = state
        .stores
        .methods
        .update(method.id(), "chef", |m| {
            record_batch(m, 5, shared::models::TemperatureReading::new(70.0), "chef", None, chrono::Utc::now())
                .map(|_| ())
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MethodAlreadyValidated);

    assert!(state.settle().await);
    let rows = sheet.rows("methods");
    assert_eq!(rows[0]["batches"].as_array().unwrap().len(), 4);
    state.shutdown().await;
}

#[tokio::test]
async fn test_offline_state_works_locally() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::initialize(&Config::local(dir.path())).await.unwrap();
    assert!(!state.is_online());
    state.stores.events.create(event("Offline")).unwrap();
    assert!(state.settle().await);
    assert_eq!(state.stores.list_json("events").unwrap().len(), 1);
    let err = state.pull("events").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::RemoteNotConfigured);
    state.shutdown().await;
}

#[tokio::test]
async fn test_failed_local_write_changes_nothing() {
    let sheet = Arc::new(MemorySheet::new());
    let storage = Arc::new(FlakyStorage::default());
    let remote: Arc<dyn RemoteSheet> = sheet.clone();
    let state = AppState::with_remote(Config::local("unused"), storage.clone(), Some(remote), quick_retry()).unwrap();

    let draft = event("Night market");
    storage.failing_writes.store(1, Ordering::SeqCst);
    let err = state.stores.events.create(draft.clone()).unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageError);
    assert!(state.stores.events.get(draft.id()).is_none());
    assert!(state.settle().await);
    assert!(sheet.log().is_empty());

    // retrying the same record sends a create, then updates follow it
    let e = state.stores.events.create(draft).unwrap();
    storage.failing_writes.store(1, Ordering::SeqCst);
    let err = state
        .stores
        .events
        .update(e.id(), "ana", |ev| {
            ev.location = "Old Square".into();
            Ok(())
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageError);
    assert_eq!(state.stores.events.get(e.id()).unwrap().location, "Harbour");

    storage.failing_writes.store(1, Ordering::SeqCst);
    assert!(state.stores.events.delete(e.id(), "ana").is_err());
    assert!(state.stores.events.get(e.id()).is_some());

    assert!(state.settle().await);
    let actions: Vec<_> = sheet.log().iter().map(|r| r.action).collect();
    assert_eq!(actions, vec![SyncAction::Create]);
    assert_eq!(state.sync().unwrap().status().failure_count(), 0);
    state.shutdown().await;
}

#[tokio::test]
async fn test_pull_keeps_records_the_sheet_never_got() {
    let sheet = Arc::new(MemorySheet::new());
    let state = online(&sheet);
    sheet.fail_next(3);
    let unsynced = state.stores.events.create(event("Rainy market")).unwrap();
    assert!(state.settle().await);
    assert_eq!(state.sync().unwrap().status().failure_count(), 1);

    // a row added in the spreadsheet meanwhile
    let remote_row = serde_json::to_value(event("Spreadsheet fair")).unwrap();
    sheet.seed("events", vec![remote_row]);

    let count = state.pull("events").await.unwrap();
    assert_eq!(count, 2);
    assert!(state.stores.events.get(unsynced.id()).is_some());
    let names: Vec<_> = state.stores.events.list().into_iter().map(|e| e.name).collect();
    assert!(names.contains(&"Spreadsheet fair".to_string()));
    state.shutdown().await;
}
