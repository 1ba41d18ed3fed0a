//! Storage collaborator interface and an in-memory implementation
//!
//! The persistence engine is an external collaborator; this subsystem only
//! performs read-only filter and reverse-index lookups against it, plus the
//! version-stamp bump that mutation handlers issue after each successful
//! write. [`MemoryStore`] backs the test suite and single-process embedders.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::filter::Filter;

/// Reverse-index entry: index partition name -> dependent item IDs
pub type ReverseIndex = HashMap<String, BTreeSet<String>>;

/// Read-side storage operations consumed by cache coordination
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Forward filter lookup. `None` means the filter does not exist; the
    /// caller decides whether that is an error.
    async fn get_filter(&self, tenant: &str, id: &str) -> Result<Option<Filter>>;

    /// Reverse-index lookup for a tenant-qualified filter ID. `None` is the
    /// normal "nobody depends on this filter" state.
    async fn get_reverse_indexes(&self, filter_tenant_id: &str) -> Result<Option<ReverseIndex>>;

    /// Bump the version stamp of `partition` and return the new stamp.
    /// Stamps are strictly monotonic per partition so stale readers can
    /// detect and refresh after a crash between write and cache call.
    async fn bump_version(&self, partition: &str) -> Result<i64>;

    /// Current version stamp of `partition`, if any write ever touched it
    async fn version(&self, partition: &str) -> Result<Option<i64>>;
}

/// In-memory [`DataStore`]
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    /// tenant:id -> filter
    filters: HashMap<String, Filter>,
    /// tenant:filter_id -> reverse index entry
    reverse: HashMap<String, ReverseIndex>,
    /// partition -> version stamp
    versions: HashMap<String, i64>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a filter
    pub async fn set_filter(&self, filter: Filter) {
        let mut inner = self.inner.write().await;
        debug!("storing filter: {}", filter.tenant_id());
        inner.filters.insert(filter.tenant_id(), filter);
    }

    /// Remove a filter, returning it if present
    pub async fn remove_filter(&self, tenant: &str, id: &str) -> Option<Filter> {
        let mut inner = self.inner.write().await;
        inner.filters.remove(&format!("{tenant}:{id}"))
    }

    /// Record that `item_id`, indexed in `index_partition`, derives keys
    /// from the filter identified by `filter_tenant_id`
    pub async fn add_reverse_index(
        &self,
        filter_tenant_id: &str,
        index_partition: &str,
        item_id: &str,
    ) {
        let mut inner = self.inner.write().await;
        inner
            .reverse
            .entry(filter_tenant_id.to_string())
            .or_default()
            .entry(index_partition.to_string())
            .or_default()
            .insert(item_id.to_string());
    }

    /// Drop the dependency of `item_id` on the filter, pruning empty entries
    pub async fn remove_reverse_index(
        &self,
        filter_tenant_id: &str,
        index_partition: &str,
        item_id: &str,
    ) {
        let mut inner = self.inner.write().await;
        if let Some(entry) = inner.reverse.get_mut(filter_tenant_id) {
            if let Some(items) = entry.get_mut(index_partition) {
                items.remove(item_id);
                if items.is_empty() {
                    entry.remove(index_partition);
                }
            }
            if entry.is_empty() {
                inner.reverse.remove(filter_tenant_id);
            }
        }
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn get_filter(&self, tenant: &str, id: &str) -> Result<Option<Filter>> {
        let inner = self.inner.read().await;
        Ok(inner.filters.get(&format!("{tenant}:{id}")).cloned())
    }

    async fn get_reverse_indexes(&self, filter_tenant_id: &str) -> Result<Option<ReverseIndex>> {
        let inner = self.inner.read().await;
        Ok(inner.reverse.get(filter_tenant_id).cloned())
    }

    async fn bump_version(&self, partition: &str) -> Result<i64> {
        let mut inner = self.inner.write().await;
        let now = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        // wall clock may not advance between two bumps; force monotonicity
        let stamp = inner
            .versions
            .get(partition)
            .map_or(now, |prev| now.max(prev + 1));
        inner.versions.insert(partition.to_string(), stamp);
        Ok(stamp)
    }

    async fn version(&self, partition: &str) -> Result<Option<i64>> {
        let inner = self.inner.read().await;
        Ok(inner.versions.get(partition).copied())
    }
}
