//! Local persistence
//!
//! - [`KeyValueStore`]: one JSON blob per key ([`FileStore`], [`MemoryStore`])
//! - [`RecordStore`]: in-memory record list per domain, persisted on every change

mod local;
mod store;

pub use local::{FileStore, KeyValueStore, MemoryStore};
pub use store::RecordStore;
