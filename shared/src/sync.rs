//! Spreadsheet sync wire types
//!
//! Writes are `POST {action, sheet, id, ...record fields}`; reads are
//! `GET ?sheet=<domain>` answered with `{status, events: [...]}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mutation kind sent to the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Create,
    Update,
    Delete,
}

impl SyncAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncAction::Create => "create",
            SyncAction::Update => "update",
            SyncAction::Delete => "delete",
        }
    }
}

impl std::fmt::Display for SyncAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a write request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRequest {
    pub action: SyncAction,
    /// Target sheet (record domain)
    pub sheet: String,
    pub id: String,
    /// Record fields, flattened next to `action`/`sheet`
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl SyncRequest {
    /// Build a request from a serialized record
    ///
    /// Non-object values are sent with no fields (delete only needs the id).
    pub fn new(action: SyncAction, sheet: impl Into<String>, id: impl Into<String>, record: Value) -> Self {
        let mut fields = match record {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        // `id` travels as its own field
        fields.remove("id");
        fields.remove("action");
        fields.remove("sheet");
        Self {
            action,
            sheet: sheet.into(),
            id: id.into(),
            fields,
        }
    }
}

/// Response to a write request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SyncResponse {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

/// Response to a read request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetResponse {
    pub status: String,
    #[serde(default, alias = "records", alias = "data")]
    pub events: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SheetResponse {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}
