//! Shared types for Taquero
//!
//! Record models, sync wire types, id generation and the unified error
//! system used by both the client and the application crate.

pub mod error;
pub mod models;
pub mod sync;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{DeleteMode, Record, RecordMeta, RecordStatus};
pub use sync::{SheetResponse, SyncAction, SyncRequest, SyncResponse};
