//! Cache layer
//!
//! Shared, process-wide cache of remote resources keyed by normalized API
//! path. Hooks read through it; forms and dialogs invalidate it after a
//! successful write so the next read refetches.
//!
//! # Usage
//!
//! ```rust,ignore
//! use skilins::cache::{create_cache, CacheLayer};
//! use skilins::config::CacheConfig;
//!
//! let cache = create_cache(&CacheConfig::default());
//! cache.set("/tags", &tags).await?;
//! cache.revalidate("/tags").await;
//! ```

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::config::CacheConfig;

pub use memory::MemoryCache;

/// Cache layer trait
///
/// Generic methods keep this from being used as `dyn CacheLayer`; callers
/// hold a concrete `MemoryCache`.
#[async_trait]
pub trait CacheLayer: Send + Sync {
    /// Get a value from cache
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>>;

    /// Set a value in cache, replacing any previous value
    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T) -> Result<()>;

    /// Delete a value from cache
    async fn delete(&self, key: &str) -> Result<()>;

    /// Delete all values matching a glob pattern
    async fn delete_pattern(&self, pattern: &str) -> Result<()>;

    /// Clear all cache entries
    async fn clear(&self) -> Result<()>;
}

/// Create the cache described by the configuration
pub fn create_cache(config: &CacheConfig) -> MemoryCache {
    tracing::debug!(
        "Creating resource cache (capacity {}, ttl {}s)",
        config.max_capacity,
        config.ttl_seconds
    );
    MemoryCache::with_capacity_and_ttl(config.max_capacity, config.ttl())
}

/// Whether `candidate` must be refetched when `key` is revalidated.
///
/// Covers the key itself, its items (`key/...`) and its parameterized
/// variants (`key?...`), so revalidating `/categories` also drops
/// `/categories/<uuid>` and `/categories?search=x`.
pub fn is_related(key: &str, candidate: &str) -> bool {
    match candidate.strip_prefix(key) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
        None => false,
    }
}

impl MemoryCache {
    /// Drop `key` and every related entry so the next read refetches
    pub async fn revalidate(&self, key: &str) -> usize {
        let removed = self.invalidate_where(|candidate| is_related(key, candidate)).await;
        tracing::debug!("Revalidated {} ({} entries)", key, removed);
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_is_related() {
        assert!(is_related("/categories", "/categories"));
        assert!(is_related("/categories", "/categories/0b4c"));
        assert!(is_related("/categories", "/categories?search=art"));
        assert!(!is_related("/categories", "/categoriesx"));
        assert!(!is_related("/categories", "/tags"));
        assert!(!is_related("/contents/blogs", "/contents"));
    }

    #[tokio::test]
    async fn test_revalidate_drops_related_keys() {
        let cache = create_cache(&CacheConfig::default());
        for key in [
            "/contents/blogs",
            "/contents/blogs/hello-world",
            "/contents/blogsearch",
            "/contents/stories",
        ] {
            cache.set(key, &json!(key)).await.unwrap();
        }

        let removed = cache.revalidate("/contents/blogs").await;

        assert_eq!(removed, 2);
        assert!(cache.peek("/contents/blogs").await.is_none());
        assert!(cache.peek("/contents/blogs/hello-world").await.is_none());
        assert!(cache.peek("/contents/blogsearch").await.is_some());
        assert!(cache.peek("/contents/stories").await.is_some());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        #[test]
        fn key_is_always_related_to_its_items(key in "/[a-z]{1,8}(/[a-z]{1,8})?", item in "[a-z0-9-]{1,16}") {
            let item_key = format!("{}/{}", key, item);
            prop_assert!(is_related(&key, &key));
            prop_assert!(is_related(&key, &item_key));
            prop_assert!(!is_related(&item_key, &key));
        }
    }
}
