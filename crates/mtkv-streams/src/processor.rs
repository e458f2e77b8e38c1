//! Record-processor lifecycle
//!
//! Mirrors the usual change-stream consumer contract: the external runtime
//! calls `initialize` once, `process_records` repeatedly (never concurrently
//! for the same instance), then `shutdown` once, per processor instance.
//! The `&mut self` receivers encode the single-writer-per-instance rule.

use crate::record::{ChangeRecord, TenantRecord};
use async_trait::async_trait;

/// Runtime input handed to `initialize`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitializationInput {
    /// Shard this processor instance was leased
    pub shard_id: String,
}

impl InitializationInput {
    /// Input for the given shard
    pub fn new(shard_id: impl Into<String>) -> Self {
        Self {
            shard_id: shard_id.into(),
        }
    }
}

/// Why the runtime is shutting a processor down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// The shard was fully consumed
    Terminate,
    /// The runtime requested an orderly stop
    Requested,
}

/// Runtime input handed to `shutdown`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownInput {
    /// Shutdown reason
    pub reason: ShutdownReason,
}

impl ShutdownInput {
    /// Input with the given reason
    pub fn new(reason: ShutdownReason) -> Self {
        Self { reason }
    }
}

/// Caller-supplied processor consuming tenant-labeled records
#[async_trait]
pub trait TenantRecordProcessor: Send {
    /// Called once before any records are delivered
    async fn initialize(&mut self, input: InitializationInput);

    /// Called for each batch of translated records
    async fn process_records(&mut self, records: Vec<TenantRecord>);

    /// Called once when the runtime retires this instance
    async fn shutdown(&mut self, input: ShutdownInput);
}

/// Factory for fresh [`TenantRecordProcessor`] instances
pub trait TenantRecordProcessorFactory: Send + Sync {
    /// Create a processor for one discovered stream
    fn create_processor(&self) -> Box<dyn TenantRecordProcessor>;
}

/// Processor driven by the stream runtime over raw physical records
///
/// The demultiplexer's wrapping processors implement this side; each one
/// translates the batch and forwards it to a [`TenantRecordProcessor`].
#[async_trait]
pub trait ShardRecordProcessor: Send {
    /// Called once before any records are delivered
    async fn initialize(&mut self, input: InitializationInput);

    /// Called for each batch of raw change records
    async fn process_records(&mut self, records: Vec<ChangeRecord>);

    /// Called once when the runtime retires this instance
    async fn shutdown(&mut self, input: ShutdownInput);
}

/// Factory for fresh [`ShardRecordProcessor`] instances
pub trait ShardRecordProcessorFactory: Send + Sync {
    /// Create a processor for one discovered stream
    fn create_processor(&self) -> Box<dyn ShardRecordProcessor>;
}
