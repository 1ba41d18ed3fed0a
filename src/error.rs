//! Error types for cache coordination
//!
//! This module defines the closed error taxonomy of the cachesync library.
//! Callers are expected to match on the error kind, never on message text.

use thiserror::Error;

/// Main error type for cache coordination operations
#[derive(Error, Debug)]
pub enum CacheSyncError {
    /// A profile declared a filter that does not exist in storage.
    /// Raised only on forward lookups during index composition; a missing
    /// reverse-index entry is a normal state, not an error.
    #[error("broken reference to filter: {filter_id} for item: {item_id}")]
    FilterNotFound { filter_id: String, item_id: String },

    /// No usable cache connections are configured or registered
    #[error("no usable cache connections configured")]
    DependencyMissing,

    /// Cache RPC exceeded its deadline
    #[error("cache call timed out after {timeout_ms}ms: {context}")]
    Timeout { timeout_ms: u64, context: String },

    /// Opaque failure returned by the remote cache service, passed through
    #[error("remote cache call failed: {0}")]
    RemoteCall(String),

    /// Storage-layer failure during a filter or index lookup
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error, including unsupported operation overrides
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for cache coordination operations
pub type Result<T> = std::result::Result<T, CacheSyncError>;

impl CacheSyncError {
    /// Whether this error is a deadline expiry and therefore retryable
    pub fn is_timeout(&self) -> bool {
        matches!(self, CacheSyncError::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CacheSyncError::FilterNotFound {
            filter_id: "FLTR1".to_string(),
            item_id: "TH1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "broken reference to filter: FLTR1 for item: TH1"
        );

        let timeout_error = CacheSyncError::Timeout {
            timeout_ms: 5000,
            context: "reload".to_string(),
        };
        assert!(timeout_error.to_string().contains("timed out after 5000ms"));

        let missing = CacheSyncError::DependencyMissing;
        assert!(missing.to_string().contains("no usable cache connections"));
    }

    #[test]
    fn test_timeout_kind() {
        let timeout = CacheSyncError::Timeout {
            timeout_ms: 100,
            context: "clear".to_string(),
        };
        assert!(timeout.is_timeout());

        let remote = CacheSyncError::RemoteCall("boom".to_string());
        assert!(!remote.is_timeout());
    }
}
