//! Taquero Client - HTTP client for the spreadsheet web app
//!
//! The sheet is the system of record: every record mutation is posted to a
//! single web-app endpoint and whole domains can be read back from it.

pub mod config;
pub mod error;
pub mod http;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::SheetsClient;

// Re-export shared wire types for convenience
pub use shared::sync::{SheetResponse, SyncAction, SyncRequest, SyncResponse};
