pub mod hash_backend;
pub mod memory_backend;
pub mod redis_backend;

pub use hash_backend::HashBackend;
pub use memory_backend::MemoryBackend;
pub use redis_backend::{RedisBackend, RedisConfig};
