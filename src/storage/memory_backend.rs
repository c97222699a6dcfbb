// storage/memory_backend.rs
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::hash_backend::HashBackend;
use crate::error::{MovieError, Result};

type Collections = HashMap<String, HashMap<String, String>>;

/// In-process stand-in for the Redis backend, with the same hash semantics.
pub struct MemoryBackend {
    store: Mutex<Collections>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend {
            store: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>> {
        self.store
            .lock()
            .map_err(|e| MovieError::Backend(format!("memory store poisoned: {}", e)))
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HashBackend for MemoryBackend {
    async fn hset(&self, collection: &str, field: &str, value: String) -> Result<()> {
        let mut store = self.lock()?;
        debug!("hset [{}] [{}] in memory", collection, field);
        store
            .entry(collection.to_string())
            .or_default()
            .insert(field.to_string(), value);
        Ok(())
    }

    async fn hget(&self, collection: &str, field: &str) -> Result<Option<String>> {
        let store = self.lock()?;
        Ok(store
            .get(collection)
            .and_then(|fields| fields.get(field))
            .cloned())
    }

    async fn hgetall(&self, collection: &str) -> Result<HashMap<String, String>> {
        let store = self.lock()?;
        Ok(store.get(collection).cloned().unwrap_or_default())
    }

    async fn hdel(&self, collection: &str, field: &str) -> Result<u64> {
        let mut store = self.lock()?;
        debug!("hdel [{}] [{}] in memory", collection, field);
        let removed = store
            .get_mut(collection)
            .and_then(|fields| fields.remove(field))
            .is_some();
        // Redis drops a hash once its last field is gone.
        if store.get(collection).map_or(false, |fields| fields.is_empty()) {
            store.remove(collection);
        }
        Ok(removed as u64)
    }
}
