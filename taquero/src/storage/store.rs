//! Per-domain record store
//!
//! Records live in memory and the whole domain is written back to the local
//! key-value store after every mutation. When a [`SyncHandle`] is attached
//! the mutation is then queued for the sheet.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use shared::models::{DeleteMode, Record, RecordStatus};
use shared::{AppError, AppResult, ErrorCode, SyncAction, SyncRequest};

use super::KeyValueStore;
use crate::sync::{RemoteSheet, SyncHandle};

pub struct RecordStore<T: Record> {
    records: RwLock<Vec<T>>,
    storage: Arc<dyn KeyValueStore>,
    sync: Option<SyncHandle>,
}

impl<T: Record> RecordStore<T> {
    /// Load the domain blob from local storage
    ///
    /// A missing blob is an empty domain; an unreadable one is an error rather
    /// than silently starting empty and overwriting it on the next save.
    pub fn open(storage: Arc<dyn KeyValueStore>, sync: Option<SyncHandle>) -> AppResult<Self> {
        let records = match storage.get(T::DOMAIN)? {
            Some(blob) => serde_json::from_str::<Vec<T>>(&blob).map_err(|e| {
                AppError::storage_corrupted(format!("{} data is corrupted: {e}", T::DOMAIN))
                    .with_detail("domain", T::DOMAIN)
            })?,
            None => Vec::new(),
        };
        tracing::debug!(domain = T::DOMAIN, count = records.len(), "Store opened");
        Ok(Self {
            records: RwLock::new(records),
            storage,
            sync,
        })
    }

    pub fn domain(&self) -> &'static str {
        T::DOMAIN
    }

    /// Visible records (not soft-deleted), in insertion order
    pub fn list(&self) -> Vec<T> {
        self.records
            .read()
            .iter()
            .filter(|r| !r.meta().is_deleted())
            .cloned()
            .collect()
    }

    /// Every record including soft-deleted ones
    pub fn all(&self) -> Vec<T> {
        self.records.read().clone()
    }

    /// Visible records matching a predicate
    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.records
            .read()
            .iter()
            .filter(|r| !r.meta().is_deleted() && pred(r))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.records
            .read()
            .iter()
            .find(|r| r.id() == id && !r.meta().is_deleted())
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .iter()
            .filter(|r| !r.meta().is_deleted())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a new record
    pub fn create(&self, record: T) -> AppResult<T> {
        {
            let mut records = self.records.write();
            if records.iter().any(|r| r.id() == record.id()) {
                return Err(AppError::already_exists(format!("{} {}", T::DOMAIN, record.id())));
            }
            let mut next = records.clone();
            next.push(record.clone());
            self.persist(&next)?;
            *records = next;
        }
        tracing::info!(domain = T::DOMAIN, id = record.id(), "Record created");
        self.queue(SyncAction::Create, &record);
        Ok(record)
    }

    /// Mutate a record and stamp `updatedBy` / `updatedAt`
    ///
    /// The closure works on a copy; nothing changes unless it succeeds and
    /// the domain is written.
    pub fn update(&self, id: &str, author: &str, apply: impl FnOnce(&mut T) -> AppResult<()>) -> AppResult<T> {
        let updated = {
            let mut records = self.records.write();
            let idx = records
                .iter()
                .position(|r| r.id() == id)
                .ok_or_else(|| AppError::record_not_found(T::DOMAIN, id))?;
            if records[idx].meta().is_deleted() {
                return Err(AppError::new(ErrorCode::RecordDeleted).with_detail("id", id));
            }

            let mut draft = records[idx].clone();
            apply(&mut draft)?;
            draft.meta_mut().id = id.to_string();
            draft.meta_mut().touch(author);

            let mut next = records.clone();
            next[idx] = draft.clone();
            self.persist(&next)?;
            *records = next;
            draft
        };
        tracing::info!(domain = T::DOMAIN, id, "Record updated");
        self.queue(SyncAction::Update, &updated);
        Ok(updated)
    }

    /// Set the status flag (archive / restore)
    ///
    /// Deleting goes through [`RecordStore::delete`] so the domain's
    /// [`DeleteMode`] applies and the sheet gets a delete.
    pub fn set_status(&self, id: &str, author: &str, status: RecordStatus) -> AppResult<T> {
        if status == RecordStatus::Deleted {
            return Err(AppError::invalid(format!("Use delete to remove {} {id}", T::DOMAIN)));
        }
        self.update(id, author, |r| {
            r.meta_mut().status = status;
            Ok(())
        })
    }

    /// Remove a record according to the domain's [`DeleteMode`]
    pub fn delete(&self, id: &str, author: &str) -> AppResult<()> {
        let removed = {
            let mut records = self.records.write();
            let idx = records
                .iter()
                .position(|r| r.id() == id && !r.meta().is_deleted())
                .ok_or_else(|| AppError::record_not_found(T::DOMAIN, id))?;

            let mut next = records.clone();
            let removed = match T::DELETE_MODE {
                DeleteMode::Soft => {
                    let record = &mut next[idx];
                    record.meta_mut().status = RecordStatus::Deleted;
                    record.meta_mut().touch(author);
                    record.clone()
                }
                DeleteMode::Hard => next.remove(idx),
            };
            self.persist(&next)?;
            *records = next;
            removed
        };
        tracing::info!(domain = T::DOMAIN, id, mode = ?T::DELETE_MODE, "Record deleted");
        self.queue(SyncAction::Delete, &removed);
        Ok(())
    }

    /// Replace the whole domain (no sync requests are queued)
    pub fn replace_all(&self, records: Vec<T>) -> AppResult<()> {
        let mut guard = self.records.write();
        self.persist(&records)?;
        *guard = records;
        Ok(())
    }

    /// Reload the domain from the sheet
    ///
    /// Rows that do not parse as `T` are skipped with a warning. Records whose
    /// push was given up on keep their local state: a local copy wins over the
    /// sheet row, and a failed hard delete keeps the row out. On a remote
    /// failure the local cache is left as is and the error is returned.
    pub async fn reload_from_remote(&self, remote: &dyn RemoteSheet) -> AppResult<usize> {
        let rows = remote.fetch(T::DOMAIN).await?;
        let total = rows.len();
        let mut records = parse_rows::<T>(rows);
        if records.len() < total {
            tracing::warn!(
                domain = T::DOMAIN,
                skipped = total - records.len(),
                "Skipped unreadable rows from sheet"
            );
        }

        let unsynced = self.unsynced_ids();
        if !unsynced.is_empty() {
            let local = self.all();
            records.retain(|r| !unsynced.contains(r.id()));
            records.extend(local.into_iter().filter(|r| unsynced.contains(r.id())));
            tracing::warn!(domain = T::DOMAIN, kept = unsynced.len(), "Kept local records not yet on the sheet");
        }

        let count = records.len();
        self.replace_all(records)?;
        tracing::info!(domain = T::DOMAIN, count, "Reloaded from sheet");
        Ok(count)
    }

    /// Ids of this domain whose sync request was given up on
    fn unsynced_ids(&self) -> HashSet<String> {
        let Some(sync) = &self.sync else {
            return HashSet::new();
        };
        sync.status()
            .failures()
            .into_iter()
            .filter(|f| f.request.sheet == T::DOMAIN)
            .map(|f| f.request.id)
            .collect()
    }

    fn persist(&self, records: &[T]) -> AppResult<()> {
        let blob = serde_json::to_string(records)
            .map_err(|e| AppError::internal(format!("Failed to serialize {}: {e}", T::DOMAIN)))?;
        self.storage.set(T::DOMAIN, &blob)
    }

    fn queue(&self, action: SyncAction, record: &T) {
        let Some(sync) = &self.sync else { return };
        let body = match serde_json::to_value(record) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(domain = T::DOMAIN, id = record.id(), "Cannot serialize for sync: {e}");
                return;
            }
        };
        let request = SyncRequest::new(action, T::DOMAIN, record.id(), body);
        if let Err(e) = sync.enqueue(request) {
            tracing::warn!(domain = T::DOMAIN, id = record.id(), "Sync not queued, local change kept: {e}");
        }
    }
}

fn parse_rows<T: Record>(rows: Vec<Value>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<T>(row) {
            Ok(r) => Some(r),
            Err(e) => {
                tracing::debug!(domain = T::DOMAIN, "Unreadable row: {e}");
                None
            }
        })
        .collect()
}
