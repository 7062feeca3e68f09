use async_trait::async_trait;
use thiserror::Error;

mod memory;
mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

#[cfg(test)]
pub(crate) use memory::advance_clock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Error: store: not connected")]
    Disconnected,
    #[error("Error: store: {0}")]
    Operation(String),
}

/// Key-value cache backend with per-entry expiry.
///
/// Implementations must be safe for concurrent use; a handle whose backend is
/// unreachable reports `StoreError::Disconnected` instead of hanging.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<(), StoreError>;

    /// Removes the given keys and returns how many of them existed.
    async fn delete(&self, keys: &[String]) -> Result<usize, StoreError>;

    /// Lists keys matching a glob pattern such as `weather:*`.
    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>, StoreError>;
}
