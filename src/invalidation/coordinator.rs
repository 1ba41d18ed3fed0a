//! Top-level cache coordination for mutation handlers
//!
//! Every profile or filter mutation handler calls in here after its storage
//! write: the coordinator resolves the effective cache operation, builds the
//! invalidation arguments, and dispatches them through the client. Any
//! failure aborts the whole call before a single partial dispatch.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::client::{CacheClient, CallOpts};
use crate::config::SyncConfig;
use crate::error::{CacheSyncError, Result};
use crate::invalidation::compose::{compose_reload_args, InvalidationMap};
use crate::invalidation::partitions::{companion_partition, index_partition};
use crate::storage::DataStore;

/// How a mutation propagates to the remote caches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheOperation {
    /// Skip cache coordination entirely
    #[serde(rename = "*none")]
    None,

    /// Re-read the affected items from storage
    #[serde(rename = "*reload")]
    Reload,

    /// Load the affected items if not already cached
    #[serde(rename = "*load")]
    Load,

    /// Evict the affected items
    #[serde(rename = "*remove")]
    Remove,

    /// Drop the affected partitions wholesale
    #[serde(rename = "*clear")]
    Clear,
}

impl CacheOperation {
    /// Wire representation, as carried in call options
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOperation::None => "*none",
            CacheOperation::Reload => "*reload",
            CacheOperation::Load => "*load",
            CacheOperation::Remove => "*remove",
            CacheOperation::Clear => "*clear",
        }
    }
}

impl fmt::Display for CacheOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheOperation {
    type Err = CacheSyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "*none" => Ok(CacheOperation::None),
            "*reload" => Ok(CacheOperation::Reload),
            "*load" => Ok(CacheOperation::Load),
            "*remove" => Ok(CacheOperation::Remove),
            "*clear" => Ok(CacheOperation::Clear),
            other => Err(CacheSyncError::Config(format!(
                "unsupported cache operation: {other}"
            ))),
        }
    }
}

/// Arguments for a single dispatch
enum DispatchArgs {
    /// Per-partition item keys, for Reload/Load/Remove
    Items(InvalidationMap),

    /// Whole partition names, for Clear
    Partitions(Vec<String>),
}

/// Coordinator selecting and dispatching cache invalidations
pub struct CacheCoordinator {
    store: Arc<dyn DataStore>,
    client: CacheClient,
    default_op: CacheOperation,
    caching_delay: Duration,
}

impl CacheCoordinator {
    /// Create a coordinator over a storage backend and a cache client
    pub fn new(store: Arc<dyn DataStore>, client: CacheClient, config: &SyncConfig) -> Self {
        Self {
            store,
            client,
            default_op: config.default_operation,
            caching_delay: config.caching_delay,
        }
    }

    /// Coordinate the cache after a profile mutation.
    ///
    /// `explicit_op` is the per-call override from the request options; empty
    /// or absent falls back to the deployment default. `filter_ids` carries
    /// the profile's filter references: `None` skips index recomputation
    /// entirely, `Some(&[])` marks the item universal and touches the
    /// wildcard index entry.
    pub async fn call_cache(
        &self,
        explicit_op: Option<&str>,
        tenant: &str,
        partition: &str,
        item_key: &str,
        filter_ids: Option<&[String]>,
        opts: &CallOpts,
    ) -> Result<()> {
        let op = self.effective_op(explicit_op)?;
        let args = match op {
            CacheOperation::None => {
                debug!("cache operation *none for {}, skipping", partition);
                return Ok(());
            }
            CacheOperation::Clear => DispatchArgs::Partitions(clear_partition_list(partition)),
            _ => DispatchArgs::Items(
                compose_reload_args(self.store.as_ref(), tenant, partition, item_key, filter_ids)
                    .await?,
            ),
        };
        self.dispatch(op, tenant, args, opts).await
    }

    /// Coordinate the cache after a filter mutation, dispatching a
    /// pre-accumulated index invalidation map (both filter versions merged
    /// by the caller). For Clear, the map's partition names are cleared.
    pub async fn call_cache_for_indexes(
        &self,
        explicit_op: Option<&str>,
        tenant: &str,
        indexes: InvalidationMap,
        opts: &CallOpts,
    ) -> Result<()> {
        let op = self.effective_op(explicit_op)?;
        let args = match op {
            CacheOperation::None => {
                debug!("cache operation *none for index dispatch, skipping");
                return Ok(());
            }
            CacheOperation::Clear => {
                DispatchArgs::Partitions(indexes.keys().cloned().collect())
            }
            _ => DispatchArgs::Items(indexes),
        };
        self.dispatch(op, tenant, args, opts).await
    }

    /// Effective operation: per-call override if non-empty, else the default
    fn effective_op(&self, explicit_op: Option<&str>) -> Result<CacheOperation> {
        match explicit_op {
            Some(op) if !op.is_empty() => op.parse(),
            _ => Ok(self.default_op),
        }
    }

    /// The single dispatch point shared by every entry above
    async fn dispatch(
        &self,
        op: CacheOperation,
        tenant: &str,
        args: DispatchArgs,
        opts: &CallOpts,
    ) -> Result<()> {
        if !self.caching_delay.is_zero() {
            info!("Delaying cache call for {:?}", self.caching_delay);
            tokio::time::sleep(self.caching_delay).await;
        }
        match (op, args) {
            (CacheOperation::Reload, DispatchArgs::Items(items)) => {
                info!("Reloading cache for tenant {}", tenant);
                self.client.reload_cache(tenant, &items, opts).await
            }
            (CacheOperation::Load, DispatchArgs::Items(items)) => {
                info!("Loading cache for tenant {}", tenant);
                self.client.load_cache(tenant, &items, opts).await
            }
            (CacheOperation::Remove, DispatchArgs::Items(items)) => {
                info!("Removing cache items for tenant {}", tenant);
                self.client.remove_items(tenant, &items, opts).await
            }
            (CacheOperation::Clear, DispatchArgs::Partitions(partitions)) => {
                info!("Clearing cache for tenant {}", tenant);
                self.client.clear(tenant, &partitions, opts).await
            }
            (op, _) => Err(CacheSyncError::Config(format!(
                "cannot dispatch cache operation {op}"
            ))),
        }
    }
}

/// Partition-name list for a coarse Clear: the partition itself, its match
/// index partition and its companion runtime-instance partition.
fn clear_partition_list(partition: &str) -> Vec<String> {
    let mut list = vec![partition.to_string()];
    if let Some(index_part) = index_partition(partition) {
        list.push(index_part.to_string());
    }
    if let Some(companion) = companion_partition(partition) {
        list.push(companion.to_string());
    }
    list
}
