//! Stream demultiplexer
//!
//! Enumerates the physical tables eligible for streaming and emits one
//! descriptor per table for the external stream runtime. Each descriptor's
//! processor factory closes over the `(tenant, virtual table)` pair resolved
//! from the physical name once, at discovery time; records are never
//! re-parsed individually.

use crate::processor::{
    InitializationInput, ShardRecordProcessor, ShardRecordProcessorFactory, ShutdownInput,
    TenantRecordProcessor, TenantRecordProcessorFactory,
};
use crate::record::{ChangeRecord, TenantRecord};
use async_trait::async_trait;
use mtkv_common::{TableNaming, TenantId};
use mtkv_store::{StoreError, StreamHandle, TableStore};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Discovery errors
///
/// Fatal to the discovery call that raised them; no partial descriptor list
/// is returned. Safe for the caller to retry the whole pass.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The table listing call failed
    #[error("table listing failed")]
    ListTables(#[source] StoreError),

    /// A describe call failed for a listed table
    #[error("describe failed for table {table}")]
    DescribeTable {
        /// Physical name of the table being described
        table: String,
        /// Underlying store failure
        #[source]
        source: StoreError,
    },
}

/// One discovered unit of streamable work
///
/// Created fresh on every discovery call and handed to the stream runtime;
/// not persisted.
#[derive(Clone)]
pub struct StreamDescriptor {
    /// Physical table name, used as the stream label
    pub label: String,
    /// The store's native stream handle, taken verbatim
    pub stream_handle: StreamHandle,
    /// Factory producing translating processors for this table's records
    pub processor_factory: Arc<dyn ShardRecordProcessorFactory>,
}

impl std::fmt::Debug for StreamDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamDescriptor")
            .field("label", &self.label)
            .field("stream_handle", &self.stream_handle)
            .finish_non_exhaustive()
    }
}

/// Demultiplexer over the shared change stream
pub struct StreamDemultiplexer {
    store: Arc<dyn TableStore>,
    naming: TableNaming,
}

impl StreamDemultiplexer {
    /// Create a demultiplexer over the given store and naming scheme
    pub fn new(store: Arc<dyn TableStore>, naming: TableNaming) -> Self {
        Self { store, naming }
    }

    /// Discover the tenant streams currently eligible for processing
    ///
    /// Descriptors come out in the store's listing order. Every call is an
    /// independent pass; nothing is shared with earlier calls.
    pub async fn discover_streams(
        &self,
        factory: Arc<dyn TenantRecordProcessorFactory>,
    ) -> Result<Vec<StreamDescriptor>, DiscoveryError> {
        let names = self
            .store
            .list_table_names()
            .await
            .map_err(DiscoveryError::ListTables)?;

        let mut descriptors = Vec::new();
        for name in names {
            // Names outside the multi-tenant scheme are not an error.
            let Ok((tenant_id, virtual_name)) = self.naming.virtual_name(&name) else {
                continue;
            };
            let description = self
                .store
                .describe_table(&name)
                .await
                .map_err(|source| DiscoveryError::DescribeTable {
                    table: name.clone(),
                    source,
                })?;
            // Absent stream metadata means streaming is disabled.
            let handle = description
                .stream
                .filter(|stream| stream.stream_enabled)
                .and_then(|stream| stream.latest_stream_handle);
            let Some(stream_handle) = handle else {
                continue;
            };
            debug!(
                tenant_id = %tenant_id,
                table = %virtual_name,
                stream = %stream_handle.as_str(),
                "Discovered tenant stream"
            );
            descriptors.push(StreamDescriptor {
                label: name,
                stream_handle,
                processor_factory: Arc::new(DemuxProcessorFactory {
                    tenant_id,
                    table_name: virtual_name,
                    inner: factory.clone(),
                }),
            });
        }
        info!(count = descriptors.len(), "Stream discovery complete");
        Ok(descriptors)
    }
}

/// Factory bound to one table's recovered identity
struct DemuxProcessorFactory {
    tenant_id: TenantId,
    table_name: String,
    inner: Arc<dyn TenantRecordProcessorFactory>,
}

impl ShardRecordProcessorFactory for DemuxProcessorFactory {
    fn create_processor(&self) -> Box<dyn ShardRecordProcessor> {
        Box::new(DemuxProcessor {
            tenant_id: self.tenant_id.clone(),
            table_name: self.table_name.clone(),
            inner: self.inner.create_processor(),
        })
    }
}

/// Translating processor wrapping a tenant-unaware one
///
/// Identity is fixed for the lifetime of the instance; the physical name
/// embedded in each incoming record is discarded.
struct DemuxProcessor {
    tenant_id: TenantId,
    table_name: String,
    inner: Box<dyn TenantRecordProcessor>,
}

#[async_trait]
impl ShardRecordProcessor for DemuxProcessor {
    async fn initialize(&mut self, input: InitializationInput) {
        self.inner.initialize(input).await;
    }

    async fn process_records(&mut self, records: Vec<ChangeRecord>) {
        let translated = records
            .into_iter()
            .map(|record| TenantRecord {
                tenant_id: self.tenant_id.clone(),
                table_name: self.table_name.clone(),
                payload: record.payload,
            })
            .collect();
        self.inner.process_records(translated).await;
    }

    async fn shutdown(&mut self, input: ShutdownInput) {
        self.inner.shutdown(input).await;
    }
}
