// storage/redis_backend.rs
use async_trait::async_trait;
use log::{debug, info};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::OnceCell;

use super::hash_backend::HashBackend;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub addr: String,
    pub db: i64,
    /// Accepted for compatibility with existing deployments. No operation sets a TTL.
    pub expiration: Duration,
}

impl RedisConfig {
    pub fn url(&self) -> String {
        format!("redis://{}/{}", self.addr, self.db)
    }
}

/// Redis hash backend. One connection manager is created lazily on first use and
/// shared by every request for the lifetime of the server; it reconnects on its own
/// after the connection drops.
pub struct RedisBackend {
    client: redis::Client,
    conn: OnceCell<ConnectionManager>,
    config: RedisConfig,
}

impl RedisBackend {
    pub fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url())?;
        info!(
            "redis backend at {} (db {}), expiration {:?} is not applied",
            config.addr, config.db, config.expiration
        );
        Ok(RedisBackend {
            client,
            conn: OnceCell::new(),
            config,
        })
    }

    pub fn config(&self) -> &RedisConfig {
        &self.config
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                debug!("connecting to redis at {}", self.config.addr);
                ConnectionManager::new(self.client.clone()).await
            })
            .await?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl HashBackend for RedisBackend {
    async fn hset(&self, collection: &str, field: &str, value: String) -> Result<()> {
        let mut conn = self.connection().await?;
        debug!("try to set field [{}] in redis hash [{}]", field, collection);
        conn.hset::<_, _, _, ()>(collection, field, value).await?;
        Ok(())
    }

    async fn hget(&self, collection: &str, field: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        Ok(conn.hget(collection, field).await?)
    }

    async fn hgetall(&self, collection: &str) -> Result<HashMap<String, String>> {
        let mut conn = self.connection().await?;
        Ok(conn.hgetall(collection).await?)
    }

    async fn hdel(&self, collection: &str, field: &str) -> Result<u64> {
        let mut conn = self.connection().await?;
        debug!("remove field [{}] from redis hash [{}]", field, collection);
        Ok(conn.hdel(collection, field).await?)
    }
}
