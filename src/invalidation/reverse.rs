//! Reverse-index resolution for filter mutations
//!
//! A shared filter can be referenced by profiles in any number of index
//! partitions. When the filter itself changes, those partitions' derived
//! keys go stale. The reverse filter index records which partitions ever
//! derived keys from a filter; resolution recomputes the filter's fragments
//! and fans them out into every dependent partition.
//!
//! Callers must resolve BOTH the pre-change and the post-change filter
//! content into one accumulator before dispatching: dependents may hold
//! index entries for either version, and invalidating only one side leaves
//! the other stale.

use tracing::debug;

use crate::error::Result;
use crate::filter::Filter;
use crate::invalidation::compose::InvalidationMap;
use crate::invalidation::keys::{concat_key, filter_fragments};
use crate::storage::DataStore;

/// Accumulate the index keys made stale by one version of a filter.
///
/// No-ops when the filter's rules produce no fragments or when no index
/// partition ever derived keys from it; a missing reverse entry is a normal
/// outcome, not an error.
pub async fn resolve_for_filter(
    store: &dyn DataStore,
    filter: &Filter,
    accumulator: &mut InvalidationMap,
) -> Result<()> {
    let fragments = filter_fragments(filter);
    if fragments.is_empty() {
        return Ok(());
    }

    let filter_tenant_id = filter.tenant_id();
    let Some(reverse) = store.get_reverse_indexes(&filter_tenant_id).await? else {
        debug!("no dependents recorded for filter: {}", filter_tenant_id);
        return Ok(());
    };

    for index_part in reverse.keys() {
        let keys = accumulator.entry(index_part.clone()).or_default();
        for fragment in &fragments {
            keys.insert(concat_key(&[&filter.tenant, fragment]));
        }
    }
    Ok(())
}
