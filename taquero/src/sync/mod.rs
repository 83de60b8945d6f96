//! Remote sync — mirror local mutations to the spreadsheet
//!
//! ```text
//! RecordStore::create/update/delete
//!   └── SyncHandle::enqueue   (returns immediately)
//!         └── SyncWorker      (one request at a time, retries, failure log)
//!               └── RemoteSheet::push  (SheetsClient in production)
//! ```

mod remote;
mod worker;

pub use remote::{MemorySheet, RemoteSheet, map_client_error};
pub use worker::{FailedSync, RetryPolicy, SyncHandle, SyncStatus, SyncWorker};
