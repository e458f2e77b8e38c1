//! Shared tenant identity and table naming for mtkv
//!
//! mtkv divides tenants into their own tables inside one shared key-value
//! store account. Application code works with tenant-agnostic virtual table
//! names; this crate owns the scheme that encodes the owning tenant into the
//! physical table name and recovers it again.

pub mod naming;
pub mod tenant;

pub use naming::{MappingError, TableNaming, DEFAULT_DELIMITER};
pub use tenant::{TenantContext, TenantId};
