//! Backing-store abstraction and tenant-scoped table client for mtkv
//!
//! The [`store::TableStore`] trait is the contract against the shared
//! key-value store; [`client::TenantTableClient`] sits in front of it and
//! rewrites every table name according to the active tenant context, so
//! application code only ever sees virtual table names.

pub mod client;
pub mod memory;
pub mod store;

pub use client::{ClientBuildError, TenantTableClient, TenantTableClientBuilder};
pub use memory::InMemoryTableStore;
pub use store::{
    AttributeMap, CreateTableRequest, QueryRequest, QueryOutput, ScanRequest, ScanOutput,
    StoreError, StoreResult, StreamHandle, StreamSpecification, TableDescription, TableStore,
};
