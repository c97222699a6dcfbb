// storage/hash_backend.rs
use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;

/// Hash-map-per-collection semantics a key-value backend must expose to hold movie
/// records: field-level set, get, get-all and delete on one named collection.
#[async_trait]
pub trait HashBackend {
    /// Sets `field` to `value` in `collection`, creating either if absent.
    async fn hset(&self, collection: &str, field: &str, value: String) -> Result<()>;

    /// Returns the value of `field`, or `None` when the field does not exist.
    async fn hget(&self, collection: &str, field: &str) -> Result<Option<String>>;

    async fn hgetall(&self, collection: &str) -> Result<HashMap<String, String>>;

    /// Removes `field` and returns the number of fields actually removed.
    async fn hdel(&self, collection: &str, field: &str) -> Result<u64>;
}
