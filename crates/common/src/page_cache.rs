//! Short-TTL page caching with Redis.
//!
//! Caches whole rendered responses keyed by request path, fronting the
//! global index view. Keys carry no user identity: the cache is shared
//! across all visitors. Writes perform no invalidation; staleness
//! resolves purely by TTL expiry.

use fred::clients::Client as RedisClient;
use fred::interfaces::KeysInterface;
use fred::types::Expiration;
use std::sync::Arc;
use tracing::debug;

/// How long a cached page stays valid. A newly created post may be
/// invisible to other viewers of the index for up to this long.
pub const PAGE_CACHE_TTL_SECS: i64 = 20;

/// Storage behind the page cache middleware.
///
/// The production implementation is [`PageCache`] over Redis; tests
/// substitute an in-memory implementation.
#[async_trait::async_trait]
pub trait ResponseCache: Send + Sync {
    /// Get a cached response body for a request path (with query).
    ///
    /// Returns `Ok(Some(body))` on a hit, `Ok(None)` on a miss.
    async fn get(&self, path_and_query: &str) -> Result<Option<Vec<u8>>, PageCacheError>;

    /// Store a rendered response body for a request path.
    async fn set(&self, path_and_query: &str, body: &[u8]) -> Result<(), PageCacheError>;
}

/// Whole-response page cache using Redis.
#[derive(Clone)]
pub struct PageCache {
    redis: Arc<RedisClient>,
    ttl_secs: i64,
}

impl PageCache {
    /// Create a new page cache with the default TTL.
    #[must_use]
    pub const fn new(redis: Arc<RedisClient>) -> Self {
        Self {
            redis,
            ttl_secs: PAGE_CACHE_TTL_SECS,
        }
    }

    /// Generate the cache key for a request path (with query string).
    fn cache_key(path_and_query: &str) -> String {
        format!("page_cache:{path_and_query}")
    }
}

#[async_trait::async_trait]
impl ResponseCache for PageCache {
    async fn get(&self, path_and_query: &str) -> Result<Option<Vec<u8>>, PageCacheError> {
        let key = Self::cache_key(path_and_query);

        let result: Option<Vec<u8>> = self
            .redis
            .get(key)
            .await
            .map_err(|e| PageCacheError::Redis(e.to_string()))?;

        if result.is_some() {
            debug!(path = %path_and_query, "Page cache hit");
        } else {
            debug!(path = %path_and_query, "Page cache miss");
        }

        Ok(result)
    }

    async fn set(&self, path_and_query: &str, body: &[u8]) -> Result<(), PageCacheError> {
        let key = Self::cache_key(path_and_query);

        self.redis
            .set::<(), _, _>(
                key,
                body.to_vec(),
                Some(Expiration::EX(self.ttl_secs)),
                None,
                false,
            )
            .await
            .map_err(|e| PageCacheError::Redis(e.to_string()))?;

        debug!(path = %path_and_query, ttl = self.ttl_secs, "Cached page");

        Ok(())
    }
}

/// Page cache error type.
#[derive(Debug, thiserror::Error)]
pub enum PageCacheError {
    /// Redis operation failed.
    #[error("Redis error: {0}")]
    Redis(String),
}
