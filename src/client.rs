//! Remote cache service client and connection routing
//!
//! The remote cache exposes four tenant-scoped operations; [`CacheClient`]
//! routes each call through the configured pool of named connections and
//! bounds it with a deadline. An empty pool fails immediately rather than
//! hanging.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CacheSyncError, Result};
use crate::invalidation::compose::InvalidationMap;

/// Typed options forwarded with every cache call.
///
/// Named fields cover what this subsystem interprets itself; everything else
/// travels in `extra` and reaches the cache service unchanged.
#[derive(Debug, Clone, Default)]
pub struct CallOpts {
    /// Per-call deadline override for the remote dispatch
    pub timeout: Option<Duration>,

    /// Opaque key-value pairs passed through to the cache service
    pub extra: HashMap<String, Value>,
}

impl CallOpts {
    /// Options with a per-call deadline
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::default()
        }
    }
}

/// The remote cache service's invalidation surface
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Re-read the named items from storage into the cache
    async fn reload_cache(
        &self,
        tenant: &str,
        items: &InvalidationMap,
        opts: &CallOpts,
    ) -> Result<()>;

    /// Load the named items into the cache if not already present
    async fn load_cache(&self, tenant: &str, items: &InvalidationMap, opts: &CallOpts)
        -> Result<()>;

    /// Evict the named items from the cache
    async fn remove_items(
        &self,
        tenant: &str,
        items: &InvalidationMap,
        opts: &CallOpts,
    ) -> Result<()>;

    /// Drop whole partitions
    async fn clear(&self, tenant: &str, partitions: &[String], opts: &CallOpts) -> Result<()>;
}

/// Client routing cache calls through a pool of named connections
pub struct CacheClient {
    /// Registered connections by identifier
    connections: HashMap<String, Arc<dyn CacheService>>,

    /// Connection identifiers configured for dispatch, in order
    cache_conns: Vec<String>,

    /// Default deadline per remote call
    call_timeout: Duration,
}

impl CacheClient {
    /// Create a client dispatching to `cache_conns` with the given default
    /// call deadline
    pub fn new(cache_conns: Vec<String>, call_timeout: Duration) -> Self {
        Self {
            connections: HashMap::new(),
            cache_conns,
            call_timeout,
        }
    }

    /// Register a connection under an identifier. Only identifiers present
    /// in the configured dispatch list are ever called.
    pub fn register(&mut self, conn_id: impl Into<String>, service: Arc<dyn CacheService>) {
        self.connections.insert(conn_id.into(), service);
    }

    /// The configured connections that are actually registered, in
    /// configuration order. Empty means the dependency is missing.
    fn usable_connections(&self) -> Result<Vec<(&str, &Arc<dyn CacheService>)>> {
        let conns: Vec<_> = self
            .cache_conns
            .iter()
            .filter_map(|id| self.connections.get(id).map(|svc| (id.as_str(), svc)))
            .collect();
        if conns.is_empty() {
            return Err(CacheSyncError::DependencyMissing);
        }
        Ok(conns)
    }

    async fn timed<F>(&self, opts: &CallOpts, context: &str, fut: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        let timeout = opts.timeout.unwrap_or(self.call_timeout);
        match tokio::time::timeout(timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Cache {} call timed out after {:?}", context, timeout);
                Err(CacheSyncError::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                    context: context.to_string(),
                })
            }
        }
    }

    /// Dispatch a reload of the named items on every configured connection
    pub async fn reload_cache(
        &self,
        tenant: &str,
        items: &InvalidationMap,
        opts: &CallOpts,
    ) -> Result<()> {
        for (conn_id, service) in self.usable_connections()? {
            debug!("Reloading cache on {} for tenant {}", conn_id, tenant);
            self.timed(opts, "reload", service.reload_cache(tenant, items, opts))
                .await?;
        }
        Ok(())
    }

    /// Dispatch a load of the named items on every configured connection
    pub async fn load_cache(
        &self,
        tenant: &str,
        items: &InvalidationMap,
        opts: &CallOpts,
    ) -> Result<()> {
        for (conn_id, service) in self.usable_connections()? {
            debug!("Loading cache on {} for tenant {}", conn_id, tenant);
            self.timed(opts, "load", service.load_cache(tenant, items, opts))
                .await?;
        }
        Ok(())
    }

    /// Dispatch a removal of the named items on every configured connection
    pub async fn remove_items(
        &self,
        tenant: &str,
        items: &InvalidationMap,
        opts: &CallOpts,
    ) -> Result<()> {
        for (conn_id, service) in self.usable_connections()? {
            debug!("Removing cache items on {} for tenant {}", conn_id, tenant);
            self.timed(opts, "remove", service.remove_items(tenant, items, opts))
                .await?;
        }
        Ok(())
    }

    /// Clear whole partitions on every configured connection
    pub async fn clear(&self, tenant: &str, partitions: &[String], opts: &CallOpts) -> Result<()> {
        for (conn_id, service) in self.usable_connections()? {
            debug!(
                "Clearing {} cache partitions on {} for tenant {}",
                partitions.len(),
                conn_id,
                tenant
            );
            self.timed(opts, "clear", service.clear(tenant, partitions, opts))
                .await?;
        }
        Ok(())
    }
}
