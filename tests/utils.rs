use async_trait::async_trait;
use movie_cache_server::cache::MovieCache;
use movie_cache_server::error::{MovieError, Result};
use movie_cache_server::server::{ServerConfig, ServerNode};
use movie_cache_server::storage::{HashBackend, RedisConfig};
use rocket::local::blocking::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub fn get_server_config_memory(port: u16) -> ServerConfig {
    ServerConfig {
        port,
        redis: RedisConfig {
            addr: String::from("localhost:6379"),
            db: 0,
            expiration: Duration::from_secs(1),
        },
        use_memory_store: true,
    }
}

pub fn launch_server_node() -> (ServerNode, Client) {
    let node = ServerNode::new(get_server_config_memory(5000)).expect("valid server node");
    let client = Client::tracked(node.build()).expect("valid rocket instance");
    (node, client)
}

/// Fixed set of records with switchable read and write failures.
pub struct StubBackend {
    pub records: HashMap<String, String>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl StubBackend {
    pub fn unreachable() -> Self {
        StubBackend {
            records: HashMap::new(),
            fail_reads: true,
            fail_writes: true,
        }
    }

    pub fn with_records(records: &[(&str, &str)]) -> Self {
        StubBackend {
            records: records
                .iter()
                .map(|(id, record)| (id.to_string(), record.to_string()))
                .collect(),
            fail_reads: false,
            fail_writes: false,
        }
    }

    fn check(&self, fail: bool) -> Result<()> {
        if fail {
            Err(MovieError::Backend(String::from("connection refused")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl HashBackend for StubBackend {
    async fn hset(&self, _: &str, _: &str, _: String) -> Result<()> {
        self.check(self.fail_writes)
    }

    async fn hget(&self, _: &str, field: &str) -> Result<Option<String>> {
        self.check(self.fail_reads)?;
        Ok(self.records.get(field).cloned())
    }

    async fn hgetall(&self, _: &str) -> Result<HashMap<String, String>> {
        self.check(self.fail_reads)?;
        Ok(self.records.clone())
    }

    async fn hdel(&self, _: &str, field: &str) -> Result<u64> {
        self.check(self.fail_writes)?;
        Ok(self.records.contains_key(field) as u64)
    }
}

pub fn launch_with_backend(backend: StubBackend) -> (ServerNode, Client) {
    let node = ServerNode::with_service(
        get_server_config_memory(5000),
        Arc::new(MovieCache::new(backend)),
    );
    let client = Client::tracked(node.build()).expect("valid rocket instance");
    (node, client)
}
