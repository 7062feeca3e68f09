use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::store::Store;

/// Cache-aside lookup: serve a stored value when one is present and fresh,
/// otherwise fetch, best-effort persist, and return the fetched value.
///
/// Never returns an error. Store failures degrade to a direct fetch, an
/// undecodable cached value counts as a miss, and a failed write is logged
/// while the fetched value is still returned. `fetch` runs at most once per
/// call.
pub async fn get_or_fetch<T, F, Fut>(
    store: &dyn Store,
    key: &str,
    ttl_seconds: u64,
    fetch: F,
) -> Option<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let cached = match store.get(key).await {
        Ok(cached) => cached,
        Err(e) => {
            warn!(key, error = %e, "cache read failed, bypassing cache");
            return fetch().await;
        }
    };

    if let Some(raw) = cached {
        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key, "cache hit");
                return Some(value);
            }
            Err(e) => {
                warn!(key, error = %e, "cached value undecodable, treating as miss");
            }
        }
    }

    let value = fetch().await?;

    match serde_json::to_string(&value) {
        Ok(serialized) => {
            if let Err(e) = store.set_with_expiry(key, &serialized, ttl_seconds).await {
                warn!(key, error = %e, "cache write failed");
            }
        }
        Err(e) => {
            warn!(key, error = %e, "cache serialization failed");
        }
    }

    Some(value)
}
