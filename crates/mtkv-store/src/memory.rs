//! In-memory table store
//!
//! Backing-store implementation for tests and development. Listing order is
//! lexicographic, so repeated discovery passes over an unchanged store see
//! the same sequence.

use crate::store::{
    AttributeMap, CreateTableRequest, QueryOutput, QueryRequest, ScanOutput, ScanRequest,
    StoreError, StoreResult, StreamSpecification, TableDescription, TableStore,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct TableState {
    key_attributes: Vec<String>,
    stream: Option<StreamSpecification>,
    items: BTreeMap<String, AttributeMap>,
}

impl TableState {
    fn new(key_attributes: Vec<String>, stream: Option<StreamSpecification>) -> Self {
        Self {
            key_attributes,
            stream,
            items: BTreeMap::new(),
        }
    }

    /// Fingerprint of an item or key map, projected onto the key schema
    fn fingerprint(&self, attributes: &AttributeMap) -> String {
        let mut out = String::new();
        for name in &self.key_attributes {
            out.push_str(name);
            out.push('=');
            if let Some(value) = attributes.get(name) {
                out.push_str(&value.to_string());
            }
            out.push(';');
        }
        out
    }
}

/// In-memory [`TableStore`]
#[derive(Debug, Default)]
pub struct InMemoryTableStore {
    tables: RwLock<BTreeMap<String, TableState>>,
}

impl InMemoryTableStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table keyed on `"id"`; handy when seeding test fixtures
    pub fn add_table(&self, table_name: impl Into<String>, stream: Option<StreamSpecification>) {
        self.tables.write().insert(
            table_name.into(),
            TableState::new(vec!["id".to_string()], stream),
        );
    }

    fn describe(state: &TableState, table_name: &str) -> TableDescription {
        TableDescription {
            table_name: table_name.to_string(),
            stream: state.stream.clone(),
        }
    }
}

#[async_trait]
impl TableStore for InMemoryTableStore {
    async fn list_table_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.tables.read().keys().cloned().collect())
    }

    async fn describe_table(&self, table_name: &str) -> StoreResult<TableDescription> {
        let tables = self.tables.read();
        let state = tables
            .get(table_name)
            .ok_or_else(|| StoreError::TableNotFound(table_name.to_string()))?;
        Ok(Self::describe(state, table_name))
    }

    async fn create_table(&self, request: CreateTableRequest) -> StoreResult<TableDescription> {
        let mut tables = self.tables.write();
        if tables.contains_key(&request.table_name) {
            return Err(StoreError::TableExists(request.table_name));
        }
        let state = TableState::new(request.key_attributes, request.stream);
        let description = Self::describe(&state, &request.table_name);
        tables.insert(request.table_name, state);
        Ok(description)
    }

    async fn delete_table(&self, table_name: &str) -> StoreResult<TableDescription> {
        let mut tables = self.tables.write();
        let state = tables
            .remove(table_name)
            .ok_or_else(|| StoreError::TableNotFound(table_name.to_string()))?;
        Ok(Self::describe(&state, table_name))
    }

    async fn get_item(
        &self,
        table_name: &str,
        key: &AttributeMap,
    ) -> StoreResult<Option<AttributeMap>> {
        let tables = self.tables.read();
        let state = tables
            .get(table_name)
            .ok_or_else(|| StoreError::TableNotFound(table_name.to_string()))?;
        Ok(state.items.get(&state.fingerprint(key)).cloned())
    }

    async fn put_item(&self, table_name: &str, item: AttributeMap) -> StoreResult<()> {
        let mut tables = self.tables.write();
        let state = tables
            .get_mut(table_name)
            .ok_or_else(|| StoreError::TableNotFound(table_name.to_string()))?;
        let fingerprint = state.fingerprint(&item);
        state.items.insert(fingerprint, item);
        Ok(())
    }

    async fn delete_item(&self, table_name: &str, key: &AttributeMap) -> StoreResult<()> {
        let mut tables = self.tables.write();
        let state = tables
            .get_mut(table_name)
            .ok_or_else(|| StoreError::TableNotFound(table_name.to_string()))?;
        let fingerprint = state.fingerprint(key);
        state.items.remove(&fingerprint);
        Ok(())
    }

    async fn update_item(
        &self,
        table_name: &str,
        key: &AttributeMap,
        updates: AttributeMap,
    ) -> StoreResult<AttributeMap> {
        let mut tables = self.tables.write();
        let state = tables
            .get_mut(table_name)
            .ok_or_else(|| StoreError::TableNotFound(table_name.to_string()))?;
        let fingerprint = state.fingerprint(key);
        let entry = state
            .items
            .entry(fingerprint)
            .or_insert_with(|| key.clone());
        entry.extend(updates);
        Ok(entry.clone())
    }

    async fn query(&self, request: QueryRequest) -> StoreResult<QueryOutput> {
        let tables = self.tables.read();
        let state = tables
            .get(&request.table_name)
            .ok_or_else(|| StoreError::TableNotFound(request.table_name.clone()))?;
        let items = state
            .items
            .values()
            .filter(|item| item.get(&request.key_attribute) == Some(&request.key_value))
            .cloned()
            .collect();
        Ok(QueryOutput { items })
    }

    async fn scan(&self, request: ScanRequest) -> StoreResult<ScanOutput> {
        let tables = self.tables.read();
        let state = tables
            .get(&request.table_name)
            .ok_or_else(|| StoreError::TableNotFound(request.table_name.clone()))?;
        let limit = request.limit.unwrap_or(usize::MAX);
        let items = state.items.values().take(limit).cloned().collect();
        Ok(ScanOutput { items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn attrs(pairs: &[(&str, Value)]) -> AttributeMap {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_item_lifecycle() {
        let store = InMemoryTableStore::new();
        store.add_table("acme.orders", None);

        let key = attrs(&[("id", json!("o-1"))]);
        let item = attrs(&[("id", json!("o-1")), ("total", json!(42))]);

        store.put_item("acme.orders", item.clone()).await.unwrap();
        let read = store.get_item("acme.orders", &key).await.unwrap();
        assert_eq!(read, Some(item));

        store.delete_item("acme.orders", &key).await.unwrap();
        let read = store.get_item("acme.orders", &key).await.unwrap();
        assert_eq!(read, None);
    }

    #[tokio::test]
    async fn test_update_upserts_and_merges() {
        let store = InMemoryTableStore::new();
        store.add_table("acme.orders", None);

        let key = attrs(&[("id", json!("o-1"))]);
        let updated = store
            .update_item("acme.orders", &key, attrs(&[("status", json!("open"))]))
            .await
            .unwrap();
        assert_eq!(updated.get("status"), Some(&json!("open")));
        assert_eq!(updated.get("id"), Some(&json!("o-1")));

        let updated = store
            .update_item("acme.orders", &key, attrs(&[("status", json!("closed"))]))
            .await
            .unwrap();
        assert_eq!(updated.get("status"), Some(&json!("closed")));
    }

    #[tokio::test]
    async fn test_query_matches_on_key_attribute() {
        let store = InMemoryTableStore::new();
        store.add_table("acme.orders", None);
        for (id, customer) in [("o-1", "c-1"), ("o-2", "c-2"), ("o-3", "c-1")] {
            store
                .put_item(
                    "acme.orders",
                    attrs(&[("id", json!(id)), ("customer", json!(customer))]),
                )
                .await
                .unwrap();
        }

        let out = store
            .query(QueryRequest {
                table_name: "acme.orders".into(),
                key_attribute: "customer".into(),
                key_value: json!("c-1"),
            })
            .await
            .unwrap();
        assert_eq!(out.items.len(), 2);
    }

    #[tokio::test]
    async fn test_listing_is_sorted() {
        let store = InMemoryTableStore::new();
        store.add_table("b", None);
        store.add_table("a", None);
        store.add_table("c", None);
        assert_eq!(store.list_table_names().await.unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_missing_table_errors() {
        let store = InMemoryTableStore::new();
        let err = store.describe_table("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::TableNotFound(_)));
    }
}
