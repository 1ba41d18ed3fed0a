//! # cachesync
//!
//! Cache coherence and filter-index invalidation for a multi-tenant profile
//! store.
//!
//! Profiles (attribute, charger, resource, threshold, route, rate and
//! friends) are matched against live events through derived match indexes
//! held in remote caches. Every profile or filter mutation must therefore
//! push precise invalidation instructions to those caches: too few and event
//! matching goes silently wrong, too many and the caches thrash. This crate
//! implements that computation and its dispatch.
//!
//! ## Features
//!
//! - Per-mutation composition of the exact partition/key invalidation set,
//!   including companion runtime-instance caches and match-index entries
//! - Reverse-index resolution for shared-filter changes, merging old and new
//!   filter content into one invalidation
//! - Operation selection per call (`*none`, `*reload`, `*load`, `*remove`,
//!   `*clear`) with a deployment-wide default
//! - Dispatch through a configured pool of cache connections with
//!   fail-fast on missing connections and per-call deadlines
//! - Async-first design using tokio; storage and cache transport are trait
//!   seams
//!
//! ## Composing invalidation arguments
//!
//! ```
//! use cachesync::{compose_reload_args, Filter, FilterRule, MemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = MemoryStore::new();
//!     store
//!         .set_filter(Filter::new(
//!             "acme.org",
//!             "FLTR_ACNT",
//!             vec![FilterRule::new(
//!                 "*string",
//!                 "~*req.Account",
//!                 vec!["1001".to_string()],
//!             )],
//!         ))
//!         .await;
//!
//!     let filter_ids = vec!["FLTR_ACNT".to_string()];
//!     let args = compose_reload_args(
//!         &store,
//!         "acme.org",
//!         "threshold_profiles",
//!         "TH1",
//!         Some(&filter_ids),
//!     )
//!     .await?;
//!
//!     assert!(args["threshold_profiles"].contains("TH1"));
//!     assert!(args["thresholds"].contains("TH1"));
//!     assert!(args["threshold_filter_indexes"]
//!         .contains("acme.org:*string:*req.Account:1001"));
//!     Ok(())
//! }
//! ```
//!
//! ## Coordinating after a mutation
//!
//! ```
//! use std::sync::Arc;
//! use cachesync::{
//!     CacheClient, CacheCoordinator, CacheOperation, CallOpts, MemoryStore, SyncConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SyncConfig::builder()
//!         .default_operation(CacheOperation::Reload)
//!         .cache_conns(vec!["cache1".to_string()])
//!         .build();
//!
//!     let client = CacheClient::new(config.cache_conns.clone(), config.call_timeout);
//!     // client.register("cache1", Arc::new(MyCacheService::connect(..).await?));
//!
//!     let coordinator = CacheCoordinator::new(Arc::new(MemoryStore::new()), client, &config);
//!
//!     // an explicit *none override turns coordination into a no-op
//!     coordinator
//!         .call_cache(
//!             Some("*none"),
//!             "acme.org",
//!             "threshold_profiles",
//!             "TH1",
//!             None,
//!             &CallOpts::default(),
//!         )
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod invalidation;
pub mod storage;

// Re-export main types for convenience
pub use client::{CacheClient, CacheService, CallOpts};
pub use config::{SyncConfig, SyncConfigBuilder};
pub use error::{CacheSyncError, Result};
pub use filter::{Filter, FilterRule};
pub use invalidation::{
    compose_reload_args, resolve_for_filter, CacheCoordinator, CacheOperation, InvalidationMap,
};
pub use storage::{DataStore, MemoryStore, ReverseIndex};
