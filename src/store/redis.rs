use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::warn;

use super::{Store, StoreError};

/// Redis-backed store. A single connection attempt is made at construction;
/// if it fails the handle stays usable but every operation reports
/// `StoreError::Disconnected`.
#[derive(Clone)]
pub struct RedisStore {
    conn: Option<ConnectionManager>,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Self {
        let conn = match redis::Client::open(url) {
            Ok(client) => match client.get_connection_manager().await {
                Ok(conn) => Some(conn),
                Err(e) => {
                    warn!(url, error = %e, "cache store unreachable, continuing without cache");
                    None
                }
            },
            Err(e) => {
                warn!(url, error = %e, "invalid cache store url, continuing without cache");
                None
            }
        };

        Self { conn }
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn conn(&self) -> Result<ConnectionManager, StoreError> {
        self.conn.clone().ok_or(StoreError::Disconnected)
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn()?;
        conn.get(key)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        conn.set_ex(key, value, ttl_seconds)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))
    }

    async fn delete(&self, keys: &[String]) -> Result<usize, StoreError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn()?;
        conn.del(keys)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))
    }

    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn()?;
        conn.keys(pattern)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disconnected_handle_reports_disconnected() {
        let store = RedisStore { conn: None };

        assert!(!store.is_connected());
        assert!(matches!(
            store.get("weather:current:Oslo").await,
            Err(StoreError::Disconnected)
        ));
        assert!(matches!(
            store.set_with_expiry("weather:current:Oslo", "{}", 600).await,
            Err(StoreError::Disconnected)
        ));
        assert!(matches!(
            store.keys_matching("weather:*").await,
            Err(StoreError::Disconnected)
        ));
        assert!(matches!(
            store.delete(&["weather:current:Oslo".to_string()]).await,
            Err(StoreError::Disconnected)
        ));
    }

    #[tokio::test]
    async fn delete_with_no_keys_short_circuits() {
        let store = RedisStore { conn: None };
        assert!(matches!(store.delete(&[]).await, Ok(0)));
    }
}
