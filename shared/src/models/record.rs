//! Record metadata shared by every domain
//!
//! Every record carries the same header: generated id, audit trail and a
//! status flag. The header is flattened into the record body so the sheet
//! sees `id`, `createdBy`, `createdAt`, `updatedBy`, `updatedAt`, `status`
//! as ordinary columns.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::util::record_id;

/// Record lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Active,
    Archived,
    Deleted,
}

/// How a domain removes records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Flip `status` to [`RecordStatus::Deleted`], keep the row
    Soft,
    /// Filter the record out of the domain list
    Hard,
}

/// Id + audit trail + status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    pub id: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: RecordStatus,
}

impl RecordMeta {
    /// Fresh header for a record created now by `author`
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            id: record_id(),
            created_by: author.into(),
            created_at: Utc::now(),
            updated_by: None,
            updated_at: None,
            status: RecordStatus::Active,
        }
    }

    /// Stamp an update
    pub fn touch(&mut self, author: impl Into<String>) {
        self.updated_by = Some(author.into());
        self.updated_at = Some(Utc::now());
    }

    pub fn is_deleted(&self) -> bool {
        self.status == RecordStatus::Deleted
    }
}

/// A persisted, synced record type
///
/// `DOMAIN` doubles as the local storage key and the remote sheet name.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const DOMAIN: &'static str;
    const DELETE_MODE: DeleteMode;

    fn meta(&self) -> &RecordMeta;
    fn meta_mut(&mut self) -> &mut RecordMeta;

    fn id(&self) -> &str {
        &self.meta().id
    }
}

/// Implement [`Record`] for a struct with a flattened `meta: RecordMeta` field
#[macro_export]
macro_rules! impl_record {
    ($ty:ty, $domain:literal, $mode:ident) => {
        impl $crate::models::Record for $ty {
            const DOMAIN: &'static str = $domain;
            const DELETE_MODE: $crate::models::DeleteMode = $crate::models::DeleteMode::$mode;

            fn meta(&self) -> &$crate::models::RecordMeta {
                &self.meta
            }

            fn meta_mut(&mut self) -> &mut $crate::models::RecordMeta {
                &mut self.meta
            }
        }
    };
}
