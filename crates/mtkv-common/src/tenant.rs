//! Tenant identity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque tenant identifier
///
/// Created and owned by the caller; the core only reads it when a physical
/// table name has to be built or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TenantId(String);

impl TenantId {
    /// Create a tenant ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// String form of the ID
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TenantId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TenantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Active tenant for one logical operation
///
/// Threaded explicitly through every call boundary rather than read from a
/// process-wide ambient variable, so name building stays pure and testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: TenantId,
}

impl TenantContext {
    /// Create a context for the given tenant
    pub fn new(tenant_id: impl Into<TenantId>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
        }
    }

    /// The active tenant
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_id_display() {
        let id = TenantId::new("acme");
        assert_eq!(id.to_string(), "acme");
        assert_eq!(id.as_str(), "acme");
    }

    #[test]
    fn test_context_carries_tenant() {
        let ctx = TenantContext::new("acme");
        assert_eq!(ctx.tenant_id(), &TenantId::new("acme"));
    }
}
