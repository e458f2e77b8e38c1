//! Backing-store contract
//!
//! Abstract collaborator interface over the shared key-value store. The
//! store's own read/write/query semantics are assumed correct and are not
//! re-specified here; mtkv only rewrites table identifiers on the way in
//! and out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Attribute map used for items, keys, and update payloads
pub type AttributeMap = HashMap<String, Value>;

/// Store result type
pub type StoreResult<T> = Result<T, StoreError>;

/// Backing-store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Table does not exist
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// Table already exists
    #[error("table already exists: {0}")]
    TableExists(String),

    /// Any other backend failure
    #[error("backend error: {0}")]
    Backend(String),
}

/// Opaque handle to a table's native change stream
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamHandle(String);

impl StreamHandle {
    /// Wrap a native stream identifier
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// The native identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Per-table change-stream settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSpecification {
    /// Whether the table emits a change stream
    pub stream_enabled: bool,
    /// Native handle of the most recent stream, when one exists
    pub latest_stream_handle: Option<StreamHandle>,
}

impl StreamSpecification {
    /// Settings for a table with streaming enabled
    pub fn enabled(handle: impl Into<String>) -> Self {
        Self {
            stream_enabled: true,
            latest_stream_handle: Some(StreamHandle::new(handle)),
        }
    }

    /// Settings for a table with streaming switched off
    pub fn disabled() -> Self {
        Self {
            stream_enabled: false,
            latest_stream_handle: None,
        }
    }
}

/// Table metadata as reported by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescription {
    /// Table name; physical at the store boundary, rewritten to the virtual
    /// name before being echoed back to application code
    pub table_name: String,
    /// Stream settings; absence means streaming is disabled
    pub stream: Option<StreamSpecification>,
}

/// Table creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTableRequest {
    /// Table name
    pub table_name: String,
    /// Attributes forming the primary key
    pub key_attributes: Vec<String>,
    /// Optional stream settings for the new table
    pub stream: Option<StreamSpecification>,
}

impl CreateTableRequest {
    /// Request a table keyed on `"id"` with no change stream
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            key_attributes: vec!["id".to_string()],
            stream: None,
        }
    }

    /// Override the key attributes
    pub fn with_key_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Attach stream settings
    pub fn with_stream(mut self, stream: StreamSpecification) -> Self {
        self.stream = Some(stream);
        self
    }
}

/// Query request: equality match on one attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Table name
    pub table_name: String,
    /// Attribute to match
    pub key_attribute: String,
    /// Value the attribute must equal
    pub key_value: Value,
}

/// Query results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutput {
    /// Matching items
    pub items: Vec<AttributeMap>,
}

/// Scan request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Table name
    pub table_name: String,
    /// Maximum number of items to return
    pub limit: Option<usize>,
}

/// Scan results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOutput {
    /// Scanned items
    pub items: Vec<AttributeMap>,
}

/// Backing key-value store
///
/// `list_table_names` and `describe_table` feed stream discovery; the item
/// and table operations back the tenant-scoped client. `describe_table` must
/// not fail for a name just returned by `list_table_names`.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// All physical table names visible to the current credentials
    async fn list_table_names(&self) -> StoreResult<Vec<String>>;

    /// Per-table metadata, including stream settings
    async fn describe_table(&self, table_name: &str) -> StoreResult<TableDescription>;

    /// Create a table
    async fn create_table(&self, request: CreateTableRequest) -> StoreResult<TableDescription>;

    /// Delete a table, returning its final description
    async fn delete_table(&self, table_name: &str) -> StoreResult<TableDescription>;

    /// Read a single item by key
    async fn get_item(&self, table_name: &str, key: &AttributeMap)
        -> StoreResult<Option<AttributeMap>>;

    /// Write a single item
    async fn put_item(&self, table_name: &str, item: AttributeMap) -> StoreResult<()>;

    /// Delete a single item by key
    async fn delete_item(&self, table_name: &str, key: &AttributeMap) -> StoreResult<()>;

    /// Merge attributes into an item, creating it if absent
    async fn update_item(
        &self,
        table_name: &str,
        key: &AttributeMap,
        updates: AttributeMap,
    ) -> StoreResult<AttributeMap>;

    /// Query items by attribute equality
    async fn query(&self, request: QueryRequest) -> StoreResult<QueryOutput>;

    /// Scan items
    async fn scan(&self, request: ScanRequest) -> StoreResult<ScanOutput>;
}
