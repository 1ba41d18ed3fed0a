//! Cache partition names and the static partition-relationship tables
//!
//! Partitions are named logical cache instances, one per entity category.
//! The two lookup tables below are immutable for the process lifetime:
//! which runtime-instance partition accompanies a profile partition, and
//! which index partition holds a profile partition's match indexes.

/// Profile partitions
pub const ATTRIBUTE_PROFILES: &str = "attribute_profiles";
pub const CHARGER_PROFILES: &str = "charger_profiles";
pub const DISPATCHER_PROFILES: &str = "dispatcher_profiles";
pub const RESOURCE_PROFILES: &str = "resource_profiles";
pub const STAT_PROFILES: &str = "stat_profiles";
pub const THRESHOLD_PROFILES: &str = "threshold_profiles";
pub const ROUTE_PROFILES: &str = "route_profiles";
pub const RATE_PROFILES: &str = "rate_profiles";
pub const ACCOUNT_PROFILES: &str = "account_profiles";
pub const ACTION_PROFILES: &str = "action_profiles";

/// Shared filters partition
pub const FILTERS: &str = "filters";

/// Runtime-instance partitions, invalidated alongside their profile partition
pub const RESOURCES: &str = "resources";
pub const STAT_QUEUES: &str = "stat_queues";
pub const THRESHOLDS: &str = "thresholds";

/// Index partitions
pub const ATTRIBUTE_FILTER_INDEXES: &str = "attribute_filter_indexes";
pub const CHARGER_FILTER_INDEXES: &str = "charger_filter_indexes";
pub const DISPATCHER_FILTER_INDEXES: &str = "dispatcher_filter_indexes";
pub const RESOURCE_FILTER_INDEXES: &str = "resource_filter_indexes";
pub const STAT_FILTER_INDEXES: &str = "stat_filter_indexes";
pub const THRESHOLD_FILTER_INDEXES: &str = "threshold_filter_indexes";
pub const ROUTE_FILTER_INDEXES: &str = "route_filter_indexes";
pub const RATE_FILTER_INDEXES: &str = "rate_filter_indexes";
pub const ACCOUNT_FILTER_INDEXES: &str = "account_filter_indexes";
pub const ACTION_FILTER_INDEXES: &str = "action_filter_indexes";

/// Reverse dependency partition: filter identity -> dependent index partitions
pub const REVERSE_FILTER_INDEXES: &str = "reverse_filter_indexes";

/// Companion runtime-instance partition implied by a profile partition.
///
/// Setting or removing one of these profiles also materializes or tears down
/// a live instance cached elsewhere, which must be invalidated in the same
/// call.
pub fn companion_partition(partition: &str) -> Option<&'static str> {
    match partition {
        RESOURCE_PROFILES => Some(RESOURCES),
        STAT_PROFILES => Some(STAT_QUEUES),
        THRESHOLD_PROFILES => Some(THRESHOLDS),
        _ => None,
    }
}

/// Index partition derived from a profile partition, if it has one.
pub fn index_partition(partition: &str) -> Option<&'static str> {
    match partition {
        ATTRIBUTE_PROFILES => Some(ATTRIBUTE_FILTER_INDEXES),
        CHARGER_PROFILES => Some(CHARGER_FILTER_INDEXES),
        DISPATCHER_PROFILES => Some(DISPATCHER_FILTER_INDEXES),
        RESOURCE_PROFILES => Some(RESOURCE_FILTER_INDEXES),
        STAT_PROFILES => Some(STAT_FILTER_INDEXES),
        THRESHOLD_PROFILES => Some(THRESHOLD_FILTER_INDEXES),
        ROUTE_PROFILES => Some(ROUTE_FILTER_INDEXES),
        RATE_PROFILES => Some(RATE_FILTER_INDEXES),
        ACCOUNT_PROFILES => Some(ACCOUNT_FILTER_INDEXES),
        ACTION_PROFILES => Some(ACTION_FILTER_INDEXES),
        _ => None,
    }
}
