//! Reload-argument composition for profile mutations
//!
//! When a profile is created, updated or removed, the cache call must name
//! every entry the mutation can have made stale: the profile's own cache
//! item, the companion runtime-instance item, and the match-index entries
//! derived from the profile's filters. Missing an index key here produces
//! false-negative matches at event time, so the key set must cover every
//! (rule, concrete value) pair that can select this item.

use std::collections::{BTreeSet, HashMap};

use crate::error::{CacheSyncError, Result};
use crate::invalidation::keys::{concat_key, filter_fragments, none_index_key};
use crate::invalidation::partitions::{companion_partition, index_partition};
use crate::storage::DataStore;

/// Partition name -> set of item or index keys to invalidate
pub type InvalidationMap = HashMap<String, BTreeSet<String>>;

/// Compose the multi-partition invalidation map for one mutated profile.
///
/// `filter_ids` semantics:
/// - `None`: the caller already determined index recomputation is
///   irrelevant; only the profile and companion entries are touched.
/// - `Some(&[])`: the profile is universal and owns the wildcard index
///   entry.
/// - `Some(ids)`: every referenced filter is resolved and its index-key
///   fragments are added, tenant-qualified. A dangling reference aborts the
///   whole composition.
pub async fn compose_reload_args(
    store: &dyn DataStore,
    tenant: &str,
    partition: &str,
    item_key: &str,
    filter_ids: Option<&[String]>,
) -> Result<InvalidationMap> {
    let mut args = InvalidationMap::new();
    args.entry(partition.to_string())
        .or_default()
        .insert(item_key.to_string());

    if let Some(companion) = companion_partition(partition) {
        args.entry(companion.to_string())
            .or_default()
            .insert(item_key.to_string());
    }

    let Some(filter_ids) = filter_ids else {
        return Ok(args);
    };
    let Some(index_part) = index_partition(partition) else {
        return Ok(args);
    };

    let mut index_keys = BTreeSet::new();
    if filter_ids.is_empty() {
        index_keys.insert(none_index_key(tenant));
    } else {
        for filter_id in filter_ids {
            let filter = store.get_filter(tenant, filter_id).await?.ok_or_else(|| {
                CacheSyncError::FilterNotFound {
                    filter_id: filter_id.clone(),
                    item_id: item_key.to_string(),
                }
            })?;
            for fragment in filter_fragments(&filter) {
                index_keys.insert(concat_key(&[tenant, &fragment]));
            }
        }
    }
    args.insert(index_part.to_string(), index_keys);
    Ok(args)
}
