//! Deployment configuration for cache coordination

use std::env;
use std::time::Duration;

use crate::error::{CacheSyncError, Result};
use crate::invalidation::coordinator::CacheOperation;

/// Configuration consumed by the coordinator and the cache client
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Operation applied when a call carries no explicit override
    pub default_operation: CacheOperation,

    /// Identifiers of the cache connections to dispatch to
    pub cache_conns: Vec<String>,

    /// Default deadline per remote cache call
    pub call_timeout: Duration,

    /// Pause inserted before each cache call, for deployments where cache
    /// replication lags the storage write
    pub caching_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_operation: CacheOperation::Reload,
            cache_conns: Vec::new(),
            call_timeout: Duration::from_secs(5),
            caching_delay: Duration::ZERO,
        }
    }
}

impl SyncConfig {
    /// Create a new builder
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Recognized variables: `CACHE_DEFAULT_OPERATION` (wire form, e.g.
    /// `*reload`), `CACHE_CONNS` (comma-separated connection IDs),
    /// `CACHE_CALL_TIMEOUT_MS`, `CACHE_CACHING_DELAY_MS`.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Self::default();
        if let Ok(op) = env::var("CACHE_DEFAULT_OPERATION") {
            if !op.is_empty() {
                config.default_operation = op.parse()?;
            }
        }
        if let Ok(conns) = env::var("CACHE_CONNS") {
            config.cache_conns = conns
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(ms) = env::var("CACHE_CALL_TIMEOUT_MS") {
            config.call_timeout = Duration::from_millis(parse_millis("CACHE_CALL_TIMEOUT_MS", &ms)?);
        }
        if let Ok(ms) = env::var("CACHE_CACHING_DELAY_MS") {
            config.caching_delay =
                Duration::from_millis(parse_millis("CACHE_CACHING_DELAY_MS", &ms)?);
        }
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.call_timeout.is_zero() {
            return Err(CacheSyncError::Config(
                "call_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_millis(name: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| CacheSyncError::Config(format!("{name} must be an integer, got {value:?}")))
}

/// Builder for [`SyncConfig`]
#[derive(Debug, Default)]
pub struct SyncConfigBuilder {
    default_operation: Option<CacheOperation>,
    cache_conns: Option<Vec<String>>,
    call_timeout: Option<Duration>,
    caching_delay: Option<Duration>,
}

impl SyncConfigBuilder {
    /// Set the deployment-default operation
    pub fn default_operation(mut self, op: CacheOperation) -> Self {
        self.default_operation = Some(op);
        self
    }

    /// Set the connection identifiers to dispatch to
    pub fn cache_conns(mut self, conns: Vec<String>) -> Self {
        self.cache_conns = Some(conns);
        self
    }

    /// Set the default call deadline
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Set the pre-call delay
    pub fn caching_delay(mut self, delay: Duration) -> Self {
        self.caching_delay = Some(delay);
        self
    }

    /// Build the configuration
    pub fn build(self) -> SyncConfig {
        let defaults = SyncConfig::default();

        SyncConfig {
            default_operation: self.default_operation.unwrap_or(defaults.default_operation),
            cache_conns: self.cache_conns.unwrap_or(defaults.cache_conns),
            call_timeout: self.call_timeout.unwrap_or(defaults.call_timeout),
            caching_delay: self.caching_delay.unwrap_or(defaults.caching_delay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.default_operation, CacheOperation::Reload);
        assert!(config.cache_conns.is_empty());
        assert_eq!(config.call_timeout, Duration::from_secs(5));
        assert!(config.caching_delay.is_zero());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = SyncConfig::builder()
            .default_operation(CacheOperation::Clear)
            .cache_conns(vec!["cache1".to_string(), "cache2".to_string()])
            .call_timeout(Duration::from_millis(250))
            .caching_delay(Duration::from_millis(10))
            .build();

        assert_eq!(config.default_operation, CacheOperation::Clear);
        assert_eq!(config.cache_conns.len(), 2);
        assert_eq!(config.call_timeout, Duration::from_millis(250));
        assert_eq!(config.caching_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = SyncConfig::builder()
            .call_timeout(Duration::ZERO)
            .build();
        assert!(matches!(
            config.validate().unwrap_err(),
            CacheSyncError::Config(_)
        ));
    }

    #[test]
    fn test_parse_millis_rejects_garbage() {
        assert!(parse_millis("CACHE_CALL_TIMEOUT_MS", "abc").is_err());
        assert_eq!(parse_millis("CACHE_CALL_TIMEOUT_MS", "1500").unwrap(), 1500);
    }
}
