//! # Cache-Coherence and Index-Invalidation Logic
//!
//! Mutating a profile or a shared filter makes cached entities and derived
//! match-index entries stale. This module computes exactly which entries
//! those are and turns them into invalidation instructions:
//!
//! - **Key derivation** ([`keys`]): filter rules to index-key fragments.
//! - **Composition** ([`compose`]): a mutated profile to its full
//!   multi-partition invalidation map.
//! - **Reverse resolution** ([`reverse`]): a mutated filter to the stale
//!   keys in every index partition depending on it.
//! - **Coordination** ([`coordinator`]): operation selection and dispatch.
//! - **Partition tables** ([`partitions`]): the static companion and index
//!   partition relationships.
//!
//! Under-invalidating leaves live event matching silently wrong; clearing
//! whole caches on every change destroys hit rates. Everything here exists
//! to walk that line precisely.

pub mod compose;
pub mod coordinator;
pub mod keys;
pub mod partitions;
pub mod reverse;

pub use compose::{compose_reload_args, InvalidationMap};
pub use coordinator::{CacheCoordinator, CacheOperation};
pub use reverse::resolve_for_filter;
