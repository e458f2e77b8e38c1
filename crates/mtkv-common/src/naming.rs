//! Table naming scheme
//!
//! A physical table name is `prefix? + tenant + delimiter + virtual name`.
//! The mapping is reversible as long as neither the tenant ID nor the prefix
//! contains the delimiter; that precondition is the caller's responsibility
//! and is deliberately not enforced here (callers depend on the exact
//! first-delimiter split when reading names back).

use crate::tenant::TenantId;
use thiserror::Error;

/// Delimiter used when none is configured
pub const DEFAULT_DELIMITER: &str = ".";

/// Naming errors
#[derive(Debug, Clone, Error)]
pub enum MappingError {
    /// The name has no delimiter after the prefix boundary
    #[error("malformed physical table name: {0}")]
    MalformedPhysicalName(String),
}

/// Immutable naming configuration
///
/// Cheap to clone and safe to share across concurrent callers; both
/// directions of the mapping are pure functions of the name and this config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNaming {
    delimiter: String,
    prefix: Option<String>,
}

impl TableNaming {
    /// Create a naming scheme with an explicit delimiter and optional prefix
    pub fn new(delimiter: impl Into<String>, prefix: Option<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            prefix,
        }
    }

    /// The configured delimiter
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// The configured prefix, or the empty string when unset
    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or("")
    }

    /// Build the physical name for a tenant's virtual table
    pub fn physical_name(&self, tenant: &TenantId, virtual_name: &str) -> String {
        format!(
            "{}{}{}{}",
            self.prefix(),
            tenant,
            self.delimiter,
            virtual_name
        )
    }

    /// Recover the owning tenant and virtual name from a physical name
    ///
    /// Strips the configured prefix, then splits at the first delimiter
    /// occurrence after the prefix boundary: everything before it is the
    /// tenant, everything after it (further delimiters included) is the
    /// virtual name.
    pub fn virtual_name(&self, physical_name: &str) -> Result<(TenantId, String), MappingError> {
        let rest = physical_name
            .strip_prefix(self.prefix())
            .ok_or_else(|| MappingError::MalformedPhysicalName(physical_name.to_string()))?;
        let idx = rest
            .find(&self.delimiter)
            .ok_or_else(|| MappingError::MalformedPhysicalName(physical_name.to_string()))?;
        let tenant = TenantId::new(&rest[..idx]);
        let virtual_name = rest[idx + self.delimiter.len()..].to_string();
        Ok((tenant, virtual_name))
    }

    /// Whether a name structurally matches the multi-tenant scheme
    ///
    /// True exactly when [`Self::virtual_name`] would succeed, without
    /// allocating the parts. A non-tenant table that happens to start with
    /// the prefix and contain the delimiter will match; that is a documented
    /// limitation of the naming scheme, not something this check tries to
    /// detect.
    pub fn matches_physical(&self, name: &str) -> bool {
        name.strip_prefix(self.prefix())
            .is_some_and(|rest| rest.contains(&self.delimiter))
    }
}

impl Default for TableNaming {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn naming(delimiter: &str, prefix: Option<&str>) -> TableNaming {
        TableNaming::new(delimiter, prefix.map(str::to_string))
    }

    #[test]
    fn test_physical_name_with_prefix() {
        let cfg = naming(".", Some("p"));
        assert_eq!(
            cfg.physical_name(&TenantId::new("acme"), "orders"),
            "pacme.orders"
        );
    }

    #[test]
    fn test_physical_name_without_prefix() {
        let cfg = TableNaming::default();
        assert_eq!(
            cfg.physical_name(&TenantId::new("acme"), "orders"),
            "acme.orders"
        );
    }

    #[test]
    fn test_round_trip() {
        let cfg = naming("-", Some("mt_"));
        let physical = cfg.physical_name(&TenantId::new("acme"), "orders");
        let (tenant, virtual_name) = cfg.virtual_name(&physical).unwrap();
        assert_eq!(tenant, TenantId::new("acme"));
        assert_eq!(virtual_name, "orders");
    }

    #[test]
    fn test_splits_at_first_delimiter() {
        let cfg = TableNaming::default();
        let (tenant, virtual_name) = cfg.virtual_name("acme.orders.archive").unwrap();
        assert_eq!(tenant, TenantId::new("acme"));
        assert_eq!(virtual_name, "orders.archive");
    }

    #[test]
    fn test_missing_delimiter_is_malformed() {
        let cfg = TableNaming::default();
        let err = cfg.virtual_name("noDelimiterHere").unwrap_err();
        assert!(matches!(err, MappingError::MalformedPhysicalName(_)));
    }

    #[test]
    fn test_missing_prefix_is_malformed() {
        let cfg = naming(".", Some("p"));
        let err = cfg.virtual_name("acme.orders").unwrap_err();
        assert!(matches!(err, MappingError::MalformedPhysicalName(_)));
    }

    #[test]
    fn test_delimiter_only_counted_after_prefix() {
        // The prefix itself contains what looks like a delimiter; the split
        // happens at the first occurrence after the prefix boundary.
        let cfg = naming(".", Some("env."));
        let (tenant, virtual_name) = cfg.virtual_name("env.acme.orders").unwrap();
        assert_eq!(tenant, TenantId::new("acme"));
        assert_eq!(virtual_name, "orders");
    }

    #[test]
    fn test_matches_physical() {
        let cfg = naming(".", Some("p"));
        assert!(cfg.matches_physical("pacme.orders"));
        assert!(!cfg.matches_physical("other"));
        assert!(!cfg.matches_physical("acme.orders"));
    }

    #[test]
    fn test_matches_physical_agrees_with_parsing() {
        let cfg = naming(".", Some("p"));
        for name in ["pacme.orders", "pacme.orders.archive", "p.orders", "other", "acme.orders", "p", ""] {
            assert_eq!(
                cfg.matches_physical(name),
                cfg.virtual_name(name).is_ok(),
                "disagreement on {name:?}"
            );
        }
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            tenant in "[a-z][a-z0-9_-]{0,15}",
            virtual_name in "[a-zA-Z][a-zA-Z0-9._-]{0,23}",
            prefix in proptest::option::of("[a-z]{1,4}_"),
        ) {
            let cfg = TableNaming::new(".", prefix);
            let tenant = TenantId::new(tenant);
            let physical = cfg.physical_name(&tenant, &virtual_name);
            let (parsed_tenant, parsed_virtual) = cfg.virtual_name(&physical).unwrap();
            prop_assert_eq!(parsed_tenant, tenant);
            prop_assert_eq!(parsed_virtual, virtual_name);
        }
    }
}
