//! Change-stream records
//!
//! [`ChangeRecord`] is the raw event as delivered by the shared stream,
//! labeled with a physical table name. [`TenantRecord`] is the same event
//! after translation: the physical name is replaced by the owning tenant and
//! virtual table, carried as explicit fields. Translation copies the payload
//! verbatim and is pure per record.

use mtkv_common::TenantId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Row-level change kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventName {
    /// A new row was written
    Insert,
    /// An existing row was changed
    Modify,
    /// A row was removed
    Remove,
}

/// Key and row images of one change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangePayload {
    /// Primary key of the changed row
    pub keys: Map<String, Value>,
    /// Row image before the change, when captured
    pub old_image: Option<Map<String, Value>>,
    /// Row image after the change, when captured
    pub new_image: Option<Map<String, Value>>,
}

/// Event fields carried verbatim through translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPayload {
    /// Region the event originated in
    pub region: String,
    /// Unique event ID
    pub event_id: String,
    /// Change kind
    pub event_name: EventName,
    /// Event source
    pub event_source: String,
    /// Event schema version
    pub event_version: String,
    /// The change itself
    pub change: ChangePayload,
}

/// Raw change event from the shared stream, labeled with a physical name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Physical table name as embedded in the event
    pub table_name: String,
    /// Event payload
    pub payload: RecordPayload,
}

/// Change event re-labeled with the identity recovered at discovery time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantRecord {
    /// Owning tenant
    pub tenant_id: TenantId,
    /// Virtual table name
    pub table_name: String,
    /// Event payload, copied unchanged from the raw record
    pub payload: RecordPayload,
}
