//! Change-stream demultiplexing for mtkv
//!
//! A shared change-data-capture stream carries events for every tenant's
//! tables, labeled only with physical table names. This crate discovers
//! which physical tables are eligible for streaming and hands the external
//! stream runtime one descriptor per table, each wired to a processor that
//! re-labels incoming records with the owning tenant and virtual table
//! before forwarding them to a tenant-unaware downstream processor.

pub mod demux;
pub mod processor;
pub mod record;

pub use demux::{DiscoveryError, StreamDemultiplexer, StreamDescriptor};
pub use processor::{
    InitializationInput, ShardRecordProcessor, ShardRecordProcessorFactory, ShutdownInput,
    ShutdownReason, TenantRecordProcessor, TenantRecordProcessorFactory,
};
pub use record::{ChangePayload, ChangeRecord, EventName, RecordPayload, TenantRecord};
