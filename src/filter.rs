//! Filter data model
//!
//! A filter is a named, tenant-scoped set of rules referenced by profiles.
//! Only a subset of rule types can contribute static index keys; the
//! derivation itself lives in [`crate::invalidation::keys`].

use serde::{Deserialize, Serialize};

/// Exact string match
pub const META_STRING: &str = "*string";
/// Prefix match
pub const META_PREFIX: &str = "*prefix";
/// Suffix match
pub const META_SUFFIX: &str = "*suffix";
/// Field presence check, carries no values
pub const META_EXISTS: &str = "*exists";
/// Field absence check, carries no values
pub const META_NOTEXISTS: &str = "*notexists";

/// A single rule inside a filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    /// Match type, e.g. `*string` or `*prefix`
    pub rule_type: String,

    /// Left-hand operand, usually a `~`-prefixed request path
    pub element: String,

    /// Right-hand operands; any of them matching satisfies the rule
    pub values: Vec<String>,
}

impl FilterRule {
    /// Create a new rule
    pub fn new(
        rule_type: impl Into<String>,
        element: impl Into<String>,
        values: Vec<String>,
    ) -> Self {
        Self {
            rule_type: rule_type.into(),
            element: element.into(),
            values,
        }
    }
}

/// A named, tenant-scoped set of filter rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Owning tenant
    pub tenant: String,

    /// Identifier, unique per tenant
    pub id: String,

    /// Rules, all of which must match for the filter to pass
    pub rules: Vec<FilterRule>,
}

impl Filter {
    /// Create a new filter
    pub fn new(tenant: impl Into<String>, id: impl Into<String>, rules: Vec<FilterRule>) -> Self {
        Self {
            tenant: tenant.into(),
            id: id.into(),
            rules,
        }
    }

    /// Tenant-qualified identifier, used as the reverse-index lookup key
    pub fn tenant_id(&self) -> String {
        format!("{}:{}", self.tenant, self.id)
    }
}
