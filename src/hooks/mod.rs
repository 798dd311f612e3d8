//! Resource data hooks
//!
//! A hook binds one resource path to the shared cache. Reading through a hook
//! returns whatever is cached, fetching on a miss; concurrent reads of the
//! same path share one request. `mutate` refetches while keeping the stale
//! value visible, `mutate_with` writes a value straight into the cache.

pub mod resources;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::marker::PhantomData;

use crate::api::{decode_data, ApiClient, ApiError};
use crate::cache::{CacheLayer, MemoryCache};

pub use resources::Hooks;

/// Snapshot of a hook: data, error, and the derived loading flag
#[derive(Debug, Clone, PartialEq)]
pub struct HookState<T> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T> HookState<T> {
    pub fn loading() -> Self {
        Self {
            data: None,
            error: None,
        }
    }

    /// Loading means nothing has arrived yet, neither data nor an error
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.error.is_none()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn into_result(self) -> Result<T, ApiError> {
        match (self.data, self.error) {
            (_, Some(error)) => Err(error),
            (Some(data), None) => Ok(data),
            (None, None) => Err(ApiError::Decode("resource has not loaded".to_string())),
        }
    }
}

/// A cached view of one API resource
pub struct Hook<T> {
    client: ApiClient,
    cache: MemoryCache,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Hook<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            cache: self.cache.clone(),
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Hook<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hook").field("key", &self.key).finish()
    }
}

impl<T> Hook<T>
where
    T: DeserializeOwned + Serialize + Send + Sync,
{
    pub fn new(client: ApiClient, cache: MemoryCache, key: String) -> Self {
        Self {
            client,
            cache,
            key,
            _marker: PhantomData,
        }
    }

    /// Cache key, which is also the request path
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read through the cache, fetching on a miss
    pub async fn fetch(&self) -> Result<T, ApiError> {
        let client = &self.client;
        let key = self.key.as_str();
        let data = self
            .cache
            .get_or_fetch(key, || async move {
                let body = client.get(key).await?;
                decode_data::<Value>(&body)
            })
            .await?;
        decode(data)
    }

    /// Read through the cache and report the outcome as hook state
    pub async fn load(&self) -> HookState<T> {
        match self.fetch().await {
            Ok(data) => HookState {
                data: Some(data),
                error: None,
            },
            Err(error) => {
                tracing::debug!("Failed to load {}: {}", self.key, error);
                HookState {
                    data: None,
                    error: Some(error),
                }
            }
        }
    }

    /// Current cached state without touching the network
    pub async fn peek(&self) -> HookState<T> {
        match self.cache.peek(&self.key).await {
            Some(data) => match decode(data) {
                Ok(data) => HookState {
                    data: Some(data),
                    error: None,
                },
                Err(error) => HookState {
                    data: None,
                    error: Some(error),
                },
            },
            None => HookState::loading(),
        }
    }

    /// Refetch. On failure the previous value stays cached and is returned
    /// alongside the error.
    pub async fn mutate(&self) -> HookState<T> {
        let stale = self.cache.peek(&self.key).await;
        let _ = self.cache.delete(&self.key).await;

        let state = self.load().await;
        if state.is_error() {
            if let Some(stale) = stale {
                let _ = self.cache.set(&self.key, &stale).await;
                return HookState {
                    data: decode(stale).ok(),
                    error: state.error,
                };
            }
        }
        state
    }

    /// Replace the cached value with `value`, then optionally refetch
    pub async fn mutate_with(&self, value: &T, revalidate: bool) -> HookState<T> {
        if let Err(e) = self.cache.set(&self.key, value).await {
            tracing::warn!("Failed to cache value for {}: {}", self.key, e);
        }
        if revalidate {
            self.mutate().await
        } else {
            self.peek().await
        }
    }
}

fn decode<T: DeserializeOwned>(data: Value) -> Result<T, ApiError> {
    serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tag;
    use crate::testing::MockApi;
    use serde_json::json;
    use std::time::Duration;

    fn tag_hook(api: &MockApi, cache: &MemoryCache) -> Hook<Vec<Tag>> {
        Hook::new(api.client(), cache.clone(), "/tags".to_string())
    }

    #[tokio::test]
    async fn test_peek_before_load_is_loading() {
        let api = MockApi::start().await;
        let hook = tag_hook(&api, &MemoryCache::new());

        let state = hook.peek().await;
        assert!(state.is_loading());
        assert!(!state.is_error());
        assert_eq!(api.count("GET", "/tags"), 0);
    }

    #[tokio::test]
    async fn test_load_reads_data_field_and_caches() {
        let api = MockApi::start().await;
        api.set("/tags", json!({ "data": [{ "name": "novel" }], "message": "ok" }));
        let hook = tag_hook(&api, &MemoryCache::new());

        let state = hook.load().await;
        assert_eq!(state.data.unwrap()[0].name, "novel");

        hook.load().await;
        assert_eq!(api.count("GET", "/tags"), 1);
        assert!(!hook.peek().await.is_loading());
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_request() {
        let api = MockApi::start().await;
        api.set("/tags", json!({ "data": [] }));
        api.delay(Duration::from_millis(100));
        let hook = tag_hook(&api, &MemoryCache::new());

        let states = futures::future::join_all((0..5).map(|_| hook.load())).await;

        assert!(states.iter().all(|s| s.data.is_some()));
        assert_eq!(api.count("GET", "/tags"), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let api = MockApi::start().await;
        api.fail("/tags", 500, json!({ "message": "Database unavailable" }));
        let cache = MemoryCache::new();
        let hook = tag_hook(&api, &cache);

        let state = hook.load().await;
        assert!(state.is_error());
        assert!(!state.is_loading());
        assert_eq!(state.error.unwrap().server_message(), Some("Database unavailable"));

        hook.load().await;
        assert_eq!(api.count("GET", "/tags"), 2);
    }

    #[tokio::test]
    async fn test_mutate_refetches() {
        let api = MockApi::start().await;
        api.set("/tags", json!({ "data": [{ "name": "novel" }] }));
        let hook = tag_hook(&api, &MemoryCache::new());
        hook.load().await;

        api.set("/tags", json!({ "data": [{ "name": "novel" }, { "name": "poem" }] }));
        assert_eq!(hook.load().await.data.unwrap().len(), 1);

        let state = hook.mutate().await;
        assert_eq!(state.data.unwrap().len(), 2);
        assert_eq!(api.count("GET", "/tags"), 2);
    }

    #[tokio::test]
    async fn test_mutate_keeps_stale_data_on_error() {
        let api = MockApi::start().await;
        api.set("/tags", json!({ "data": [{ "name": "novel" }] }));
        let hook = tag_hook(&api, &MemoryCache::new());
        hook.load().await;

        api.respond("GET", "/tags", 503, json!({ "error": "Service Unavailable" }));
        let state = hook.mutate().await;

        assert!(state.is_error());
        assert_eq!(state.data.unwrap()[0].name, "novel");
        assert_eq!(hook.peek().await.data.unwrap()[0].name, "novel");
    }

    #[tokio::test]
    async fn test_mutate_with_optimistic_value() {
        let api = MockApi::start().await;
        let hook = tag_hook(&api, &MemoryCache::new());

        let state = hook.mutate_with(&vec![Tag::new("draft")], false).await;
        assert_eq!(state.data.unwrap()[0].name, "draft");
        assert_eq!(api.count("GET", "/tags"), 0);
    }

    #[tokio::test]
    async fn test_missing_data_field_is_decode_error() {
        let api = MockApi::start().await;
        api.set("/tags", json!({ "message": "ok" }));
        let hook = tag_hook(&api, &MemoryCache::new());

        let state = hook.load().await;
        assert!(matches!(state.error, Some(ApiError::Decode(_))));
    }
}
