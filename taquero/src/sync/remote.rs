//! Remote sheet seam
//!
//! The stores and the worker only see [`RemoteSheet`]; production uses the
//! HTTP client, tests use [`MemorySheet`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use shared::{AppError, AppResult, ErrorCode, SyncAction, SyncRequest};
use taquero_client::{ClientError, SheetsClient};

#[async_trait]
pub trait RemoteSheet: Send + Sync {
    /// Apply one mutation on the sheet
    async fn push(&self, request: &SyncRequest) -> AppResult<()>;

    /// Read every row of a sheet
    async fn fetch(&self, sheet: &str) -> AppResult<Vec<Value>>;
}

/// Map client errors onto sync error codes
///
/// Transient failures become `RemoteRequestFailed` (worth retrying), everything
/// else `RemoteRejected`.
pub fn map_client_error(err: ClientError) -> AppError {
    let code = if err.is_transient() {
        ErrorCode::RemoteRequestFailed
    } else {
        ErrorCode::RemoteRejected
    };
    AppError::with_message(code, err.to_string())
}

#[async_trait]
impl RemoteSheet for SheetsClient {
    async fn push(&self, request: &SyncRequest) -> AppResult<()> {
        SheetsClient::push(self, request)
            .await
            .map(|_| ())
            .map_err(map_client_error)
    }

    async fn fetch(&self, sheet: &str) -> AppResult<Vec<Value>> {
        SheetsClient::fetch(self, sheet)
            .await
            .map_err(map_client_error)
    }
}

/// In-process sheet: applies requests to per-sheet row maps
///
/// Rows keep insertion order. `fail_next(n)` makes the next `n` pushes fail
/// with a transient error.
#[derive(Debug, Default)]
pub struct MemorySheet {
    sheets: Mutex<HashMap<String, Vec<Value>>>,
    log: Mutex<Vec<SyncRequest>>,
    failures: AtomicUsize,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` pushes with `RemoteRequestFailed`
    pub fn fail_next(&self, n: usize) {
        self.failures.store(n, Ordering::SeqCst);
    }

    /// Every request that was applied, in order
    pub fn log(&self) -> Vec<SyncRequest> {
        self.log.lock().clone()
    }

    pub fn rows(&self, sheet: &str) -> Vec<Value> {
        self.sheets.lock().get(sheet).cloned().unwrap_or_default()
    }

    /// Seed rows directly (simulates edits made in the spreadsheet)
    pub fn seed(&self, sheet: &str, rows: Vec<Value>) {
        self.sheets.lock().insert(sheet.to_string(), rows);
    }
}

#[async_trait]
impl RemoteSheet for MemorySheet {
    async fn push(&self, request: &SyncRequest) -> AppResult<()> {
        let should_fail = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(AppError::remote("simulated network failure"));
        }

        let mut row = Value::Object(request.fields.clone());
        row["id"] = Value::from(request.id.clone());

        let mut sheets = self.sheets.lock();
        let rows = sheets.entry(request.sheet.clone()).or_default();
        let pos = rows.iter().position(|r| r["id"] == request.id.as_str());
        match (request.action, pos) {
            (SyncAction::Create, None) => rows.push(row),
            (SyncAction::Create | SyncAction::Update, Some(i)) => rows[i] = row,
            (SyncAction::Update, None) => {
                return Err(AppError::with_message(
                    ErrorCode::RemoteRejected,
                    format!("row {} not found", request.id),
                ));
            }
            (SyncAction::Delete, Some(i)) => {
                rows.remove(i);
            }
            (SyncAction::Delete, None) => {}
        }
        drop(sheets);

        self.log.lock().push(request.clone());
        Ok(())
    }

    async fn fetch(&self, sheet: &str) -> AppResult<Vec<Value>> {
        Ok(self.rows(sheet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn req(action: SyncAction, id: &str, name: &str) -> SyncRequest {
        SyncRequest::new(action, "events", id, json!({ "name": name }))
    }

    #[tokio::test]
    async fn test_memory_sheet_applies_actions() {
        let sheet = MemorySheet::new();
        sheet.push(&req(SyncAction::Create, "1", "a")).await.unwrap();
        sheet.push(&req(SyncAction::Create, "2", "b")).await.unwrap();
        sheet.push(&req(SyncAction::Update, "1", "a2")).await.unwrap();
        sheet.push(&req(SyncAction::Delete, "2", "")).await.unwrap();

        let rows = sheet.fetch("events").await.unwrap();
        assert_eq!(rows, vec![json!({"id": "1", "name": "a2"})]);
        assert_eq!(sheet.log().len(), 4);
    }

    #[tokio::test]
    async fn test_memory_sheet_update_missing_row_rejected() {
        let sheet = MemorySheet::new();
        let err = sheet.push(&req(SyncAction::Update, "9", "x")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RemoteRejected);
    }

    #[tokio::test]
    async fn test_memory_sheet_simulated_failures() {
        let sheet = MemorySheet::new();
        sheet.fail_next(2);
        assert!(sheet.push(&req(SyncAction::Create, "1", "a")).await.is_err());
        assert!(sheet.push(&req(SyncAction::Create, "1", "a")).await.is_err());
        assert!(sheet.push(&req(SyncAction::Create, "1", "a")).await.is_ok());
        assert_eq!(sheet.rows("events").len(), 1);
    }

    #[test]
    fn test_map_client_error() {
        let err = map_client_error(ClientError::Rejected("locked".into()));
        assert_eq!(err.code, ErrorCode::RemoteRejected);
        let err = map_client_error(ClientError::Status { status: 502, body: String::new() });
        assert_eq!(err.code, ErrorCode::RemoteRequestFailed);
    }
}
