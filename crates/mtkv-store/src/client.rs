//! Tenant-scoped table client
//!
//! Request-path counterpart of the naming scheme. Every operation takes the
//! active tenant context, rewrites the virtual table name into the tenant's
//! physical name before delegating to the backing store, and rewrites any
//! table name echoed in a response back to the virtual name. Backing-store
//! failures pass through unchanged.

use crate::store::{
    AttributeMap, CreateTableRequest, QueryOutput, QueryRequest, ScanOutput, ScanRequest,
    StoreResult, TableDescription, TableStore,
};
use mtkv_common::{TableNaming, TenantContext, DEFAULT_DELIMITER};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Client construction errors
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// No backing store was supplied
    #[error("config error: a backing store is required")]
    MissingStore,
}

/// Table client bound to a naming scheme
///
/// Holds no per-tenant state; the tenant is supplied per call.
#[derive(Clone)]
pub struct TenantTableClient {
    store: Arc<dyn TableStore>,
    naming: TableNaming,
}

impl std::fmt::Debug for TenantTableClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantTableClient")
            .field("naming", &self.naming)
            .finish_non_exhaustive()
    }
}

impl TenantTableClient {
    /// Start building a client
    pub fn builder() -> TenantTableClientBuilder {
        TenantTableClientBuilder::default()
    }

    /// The naming scheme this client rewrites names with
    pub fn naming(&self) -> &TableNaming {
        &self.naming
    }

    /// The backing store
    pub fn store(&self) -> &Arc<dyn TableStore> {
        &self.store
    }

    fn physical(&self, ctx: &TenantContext, virtual_name: &str) -> String {
        let physical = self.naming.physical_name(ctx.tenant_id(), virtual_name);
        debug!(
            tenant_id = %ctx.tenant_id(),
            table = %virtual_name,
            physical = %physical,
            "Rewrote table name"
        );
        physical
    }

    /// Create a tenant table
    pub async fn create_table(
        &self,
        ctx: &TenantContext,
        request: CreateTableRequest,
    ) -> StoreResult<TableDescription> {
        let virtual_name = request.table_name.clone();
        let mut request = request;
        request.table_name = self.physical(ctx, &virtual_name);
        let mut description = self.store.create_table(request).await?;
        description.table_name = virtual_name;
        info!(tenant_id = %ctx.tenant_id(), table = %description.table_name, "Table created");
        Ok(description)
    }

    /// Delete a tenant table
    pub async fn delete_table(
        &self,
        ctx: &TenantContext,
        virtual_name: &str,
    ) -> StoreResult<TableDescription> {
        let physical = self.physical(ctx, virtual_name);
        let mut description = self.store.delete_table(&physical).await?;
        description.table_name = virtual_name.to_string();
        info!(tenant_id = %ctx.tenant_id(), table = %virtual_name, "Table deleted");
        Ok(description)
    }

    /// Describe a tenant table
    pub async fn describe_table(
        &self,
        ctx: &TenantContext,
        virtual_name: &str,
    ) -> StoreResult<TableDescription> {
        let physical = self.physical(ctx, virtual_name);
        let mut description = self.store.describe_table(&physical).await?;
        description.table_name = virtual_name.to_string();
        Ok(description)
    }

    /// Read a single item
    pub async fn get_item(
        &self,
        ctx: &TenantContext,
        virtual_name: &str,
        key: &AttributeMap,
    ) -> StoreResult<Option<AttributeMap>> {
        let physical = self.physical(ctx, virtual_name);
        self.store.get_item(&physical, key).await
    }

    /// Write a single item
    pub async fn put_item(
        &self,
        ctx: &TenantContext,
        virtual_name: &str,
        item: AttributeMap,
    ) -> StoreResult<()> {
        let physical = self.physical(ctx, virtual_name);
        self.store.put_item(&physical, item).await
    }

    /// Delete a single item
    pub async fn delete_item(
        &self,
        ctx: &TenantContext,
        virtual_name: &str,
        key: &AttributeMap,
    ) -> StoreResult<()> {
        let physical = self.physical(ctx, virtual_name);
        self.store.delete_item(&physical, key).await
    }

    /// Merge attributes into an item
    pub async fn update_item(
        &self,
        ctx: &TenantContext,
        virtual_name: &str,
        key: &AttributeMap,
        updates: AttributeMap,
    ) -> StoreResult<AttributeMap> {
        let physical = self.physical(ctx, virtual_name);
        self.store.update_item(&physical, key, updates).await
    }

    /// Query items by attribute equality
    pub async fn query(
        &self,
        ctx: &TenantContext,
        request: QueryRequest,
    ) -> StoreResult<QueryOutput> {
        let mut request = request;
        request.table_name = self.physical(ctx, &request.table_name);
        self.store.query(request).await
    }

    /// Scan items
    pub async fn scan(&self, ctx: &TenantContext, request: ScanRequest) -> StoreResult<ScanOutput> {
        let mut request = request;
        request.table_name = self.physical(ctx, &request.table_name);
        self.store.scan(request).await
    }
}

/// Builder for [`TenantTableClient`]
///
/// A backing store is required; the delimiter defaults to `"."` and the
/// table prefix is optional.
#[derive(Default)]
pub struct TenantTableClientBuilder {
    store: Option<Arc<dyn TableStore>>,
    delimiter: Option<String>,
    table_prefix: Option<String>,
}

impl TenantTableClientBuilder {
    /// Set the backing store
    pub fn with_store(mut self, store: Arc<dyn TableStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the delimiter between tenant ID and virtual name
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Set the prefix prepended before the tenant ID
    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = Some(prefix.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<TenantTableClient, ClientBuildError> {
        let store = self.store.ok_or(ClientBuildError::MissingStore)?;
        let delimiter = self.delimiter.unwrap_or_else(|| DEFAULT_DELIMITER.to_string());
        Ok(TenantTableClient {
            store,
            naming: TableNaming::new(delimiter, self.table_prefix),
        })
    }
}
