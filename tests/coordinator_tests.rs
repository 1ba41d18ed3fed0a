//! Integration tests for cache coordination
//!
//! These exercise the full path from a mutation handler's perspective:
//! operation selection, argument composition against an in-memory store,
//! and dispatch through the pooled client onto a recording cache double.

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio_test::assert_ok;

use cachesync::{
    CacheClient, CacheCoordinator, CacheSyncError, CallOpts, Filter, FilterRule, InvalidationMap,
    MemoryStore, SyncConfig,
};
use common::{FailingCache, RecordedCall, RecordingCache};

const TENANT: &str = "acme.org";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn test_config() -> SyncConfig {
    SyncConfig::builder()
        .cache_conns(vec!["cache1".to_string()])
        .call_timeout(Duration::from_secs(1))
        .build()
}

/// Store, recording double and coordinator wired together
async fn setup() -> (Arc<MemoryStore>, Arc<RecordingCache>, CacheCoordinator) {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(RecordingCache::new());

    let config = test_config();
    let mut client = CacheClient::new(config.cache_conns.clone(), config.call_timeout);
    client.register("cache1", cache.clone());

    let coordinator = CacheCoordinator::new(store.clone(), client, &config);
    (store, cache, coordinator)
}

async fn seed_account_filter(store: &MemoryStore, id: &str, account: &str) {
    store
        .set_filter(Filter::new(
            TENANT,
            id,
            vec![FilterRule::new(
                "*string",
                "~*req.Account",
                vec![account.to_string()],
            )],
        ))
        .await;
}

fn keys(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_none_operation_issues_no_calls() {
    let (_store, cache, coordinator) = setup().await;

    // explicit override; filter references may even dangle, nothing is read
    let missing = vec!["MISSING".to_string()];
    assert_ok!(
        coordinator
            .call_cache(
                Some("*none"),
                TENANT,
                "threshold_profiles",
                "acme.org:TH1",
                Some(&missing),
                &CallOpts::default(),
            )
            .await
    );

    assert!(cache.calls().is_empty());
}

#[tokio::test]
async fn test_default_operation_reload_dispatches_composed_map() {
    let (store, cache, coordinator) = setup().await;
    seed_account_filter(&store, "FLTR1", "1001").await;

    let filter_ids = vec!["FLTR1".to_string()];
    assert_ok!(
        coordinator
            .call_cache(
                None,
                TENANT,
                "threshold_profiles",
                "acme.org:TH1",
                Some(&filter_ids),
                &CallOpts::default(),
            )
            .await
    );

    let mut expected = InvalidationMap::new();
    expected.insert("threshold_profiles".to_string(), keys(&["acme.org:TH1"]));
    expected.insert("thresholds".to_string(), keys(&["acme.org:TH1"]));
    expected.insert(
        "threshold_filter_indexes".to_string(),
        keys(&["acme.org:*string:*req.Account:1001"]),
    );

    assert_eq!(
        cache.calls(),
        vec![RecordedCall::Reload {
            tenant: TENANT.to_string(),
            items: expected,
        }]
    );
}

#[tokio::test]
async fn test_explicit_override_beats_default() {
    let (store, cache, coordinator) = setup().await;
    seed_account_filter(&store, "FLTR1", "1001").await;

    let filter_ids = vec!["FLTR1".to_string()];
    assert_ok!(
        coordinator
            .call_cache(
                Some("*remove"),
                TENANT,
                "threshold_profiles",
                "acme.org:TH1",
                Some(&filter_ids),
                &CallOpts::default(),
            )
            .await
    );

    assert!(matches!(
        cache.calls().as_slice(),
        [RecordedCall::Remove { .. }]
    ));
}

#[tokio::test]
async fn test_load_operation_dispatches_load() {
    let (_store, cache, coordinator) = setup().await;

    assert_ok!(
        coordinator
            .call_cache(
                Some("*load"),
                TENANT,
                "route_profiles",
                "acme.org:RT1",
                None,
                &CallOpts::default(),
            )
            .await
    );

    assert!(matches!(
        cache.calls().as_slice(),
        [RecordedCall::Load { .. }]
    ));
}

#[tokio::test]
async fn test_clear_ignores_item_key_and_filters() {
    let (_store, cache, coordinator) = setup().await;

    // dangling filter reference: must not matter, Clear never composes
    let missing = vec!["MISSING".to_string()];
    assert_ok!(
        coordinator
            .call_cache(
                Some("*clear"),
                TENANT,
                "threshold_profiles",
                "acme.org:TH1",
                Some(&missing),
                &CallOpts::default(),
            )
            .await
    );

    assert_eq!(
        cache.calls(),
        vec![RecordedCall::Clear {
            tenant: TENANT.to_string(),
            partitions: vec![
                "threshold_profiles".to_string(),
                "threshold_filter_indexes".to_string(),
                "thresholds".to_string(),
            ],
        }]
    );
}

#[tokio::test]
async fn test_unknown_override_fails_without_dispatch() {
    let (_store, cache, coordinator) = setup().await;

    let err = coordinator
        .call_cache(
            Some("*flush"),
            TENANT,
            "threshold_profiles",
            "acme.org:TH1",
            None,
            &CallOpts::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CacheSyncError::Config(_)));
    assert!(cache.calls().is_empty());
}

#[tokio::test]
async fn test_broken_filter_reference_aborts_without_dispatch() {
    let (_store, cache, coordinator) = setup().await;

    let missing = vec!["MISSING".to_string()];
    let err = coordinator
        .call_cache(
            None,
            TENANT,
            "threshold_profiles",
            "acme.org:TH1",
            Some(&missing),
            &CallOpts::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CacheSyncError::FilterNotFound { .. }));
    assert!(cache.calls().is_empty());
}

#[tokio::test]
async fn test_missing_connections_fail_fast() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let config = test_config();
    // nothing registered under "cache1"
    let client = CacheClient::new(config.cache_conns.clone(), config.call_timeout);
    let coordinator = CacheCoordinator::new(store, client, &config);

    let err = coordinator
        .call_cache(
            None,
            TENANT,
            "threshold_profiles",
            "acme.org:TH1",
            None,
            &CallOpts::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CacheSyncError::DependencyMissing));
}

#[tokio::test]
async fn test_remote_error_passes_through() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let config = test_config();
    let mut client = CacheClient::new(config.cache_conns.clone(), config.call_timeout);
    client.register("cache1", Arc::new(FailingCache));
    let coordinator = CacheCoordinator::new(store, client, &config);

    let err = coordinator
        .call_cache(
            None,
            TENANT,
            "threshold_profiles",
            "acme.org:TH1",
            None,
            &CallOpts::default(),
        )
        .await
        .unwrap_err();

    assert!(
        matches!(err, CacheSyncError::RemoteCall(ref msg) if msg == "service unavailable"),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn test_caching_delay_applies_before_dispatch() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(RecordingCache::new());
    let config = SyncConfig::builder()
        .cache_conns(vec!["cache1".to_string()])
        .caching_delay(Duration::from_millis(20))
        .build();
    let mut client = CacheClient::new(config.cache_conns.clone(), config.call_timeout);
    client.register("cache1", cache.clone());
    let coordinator = CacheCoordinator::new(store, client, &config);

    let start = std::time::Instant::now();
    assert_ok!(
        coordinator
            .call_cache(
                None,
                TENANT,
                "route_profiles",
                "acme.org:RT1",
                None,
                &CallOpts::default(),
            )
            .await
    );

    assert!(start.elapsed() >= Duration::from_millis(20));
    assert_eq!(cache.calls().len(), 1);
}

#[tokio::test]
async fn test_concurrent_identical_mutations_compose_identically() {
    let (store, cache, coordinator) = setup().await;
    seed_account_filter(&store, "FLTR1", "1001").await;

    let filter_ids = vec!["FLTR1".to_string()];
    let opts = CallOpts::default();
    let calls = (0..3).map(|_| {
        coordinator.call_cache(
            None,
            TENANT,
            "threshold_profiles",
            "acme.org:TH1",
            Some(&filter_ids),
            &opts,
        )
    });
    for result in futures::future::join_all(calls).await {
        assert_ok!(result);
    }

    let recorded = cache.calls();
    assert_eq!(recorded.len(), 3);
    // identical inputs always produce the identical key set, so last-write-wins
    // dispatch ordering is safe
    assert!(recorded.iter().all(|c| c == &recorded[0]));
}
