//! Taquero - food safety and business records for a food truck
//!
//! # Overview
//!
//! - **Wizards** (`wizards`): multi-step forms gated step by step
//! - **Safety rules** (`safety`): temperature thresholds, method validation, training
//! - **Storage** (`storage`): per-domain record stores over a key-value store
//! - **Sync** (`sync`): ordered, retried writes to the spreadsheet web app
//! - **Finance** (`finance`): POS and bank CSV import, period totals, health score
//!
//! # Layout
//!
//! ```text
//! taquero/src/
//! ├── core/       # config, state
//! ├── finance/    # CSV import and reports
//! ├── safety/     # thresholds and rules
//! ├── storage/    # key-value and record stores
//! ├── sync/       # remote sheet and sync worker
//! ├── utils/      # logger, validation, dates
//! └── wizards/    # form state machines
//! ```

pub mod core;
pub mod finance;
pub mod safety;
pub mod storage;
pub mod sync;
pub mod utils;
pub mod wizards;

pub use core::{AppState, Config, DOMAINS, Stores};
pub use storage::{FileStore, KeyValueStore, MemoryStore, RecordStore};
pub use sync::{MemorySheet, RemoteSheet, RetryPolicy, SyncHandle, SyncWorker};
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use wizards::{FieldIssue, Wizard, WizardForm};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env`, read the configuration and start logging
pub fn setup_environment() -> Config {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_json, config.log_dir.as_deref());
    config
}
