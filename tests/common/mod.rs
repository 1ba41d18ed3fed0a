//! Shared test doubles for the integration suite

use std::sync::Mutex;

use async_trait::async_trait;
use cachesync::{CacheService, CacheSyncError, CallOpts, InvalidationMap, Result};

/// One observed cache call
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Reload {
        tenant: String,
        items: InvalidationMap,
    },
    Load {
        tenant: String,
        items: InvalidationMap,
    },
    Remove {
        tenant: String,
        items: InvalidationMap,
    },
    Clear {
        tenant: String,
        partitions: Vec<String>,
    },
}

/// Cache service double recording every call it receives
#[derive(Default)]
pub struct RecordingCache {
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CacheService for RecordingCache {
    async fn reload_cache(
        &self,
        tenant: &str,
        items: &InvalidationMap,
        _opts: &CallOpts,
    ) -> Result<()> {
        self.record(RecordedCall::Reload {
            tenant: tenant.to_string(),
            items: items.clone(),
        });
        Ok(())
    }

    async fn load_cache(
        &self,
        tenant: &str,
        items: &InvalidationMap,
        _opts: &CallOpts,
    ) -> Result<()> {
        self.record(RecordedCall::Load {
            tenant: tenant.to_string(),
            items: items.clone(),
        });
        Ok(())
    }

    async fn remove_items(
        &self,
        tenant: &str,
        items: &InvalidationMap,
        _opts: &CallOpts,
    ) -> Result<()> {
        self.record(RecordedCall::Remove {
            tenant: tenant.to_string(),
            items: items.clone(),
        });
        Ok(())
    }

    async fn clear(&self, tenant: &str, partitions: &[String], _opts: &CallOpts) -> Result<()> {
        self.record(RecordedCall::Clear {
            tenant: tenant.to_string(),
            partitions: partitions.to_vec(),
        });
        Ok(())
    }
}

/// Cache service double failing every call with an opaque remote error
pub struct FailingCache;

#[async_trait]
impl CacheService for FailingCache {
    async fn reload_cache(
        &self,
        _tenant: &str,
        _items: &InvalidationMap,
        _opts: &CallOpts,
    ) -> Result<()> {
        Err(CacheSyncError::RemoteCall("service unavailable".to_string()))
    }

    async fn load_cache(
        &self,
        _tenant: &str,
        _items: &InvalidationMap,
        _opts: &CallOpts,
    ) -> Result<()> {
        Err(CacheSyncError::RemoteCall("service unavailable".to_string()))
    }

    async fn remove_items(
        &self,
        _tenant: &str,
        _items: &InvalidationMap,
        _opts: &CallOpts,
    ) -> Result<()> {
        Err(CacheSyncError::RemoteCall("service unavailable".to_string()))
    }

    async fn clear(&self, _tenant: &str, _partitions: &[String], _opts: &CallOpts) -> Result<()> {
        Err(CacheSyncError::RemoteCall("service unavailable".to_string()))
    }
}
