use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Two-tier cache for assembled results
///
/// L1 is an in-process moka cache and is always present. L2 is Redis and is
/// only used when a connection could be established, so the service keeps
/// working (per instance) without it.
pub struct CacheManager {
    redis: Option<tokio::sync::Mutex<ConnectionManager>>,
    l1_cache: moka::future::Cache<String, String>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create a cache manager, connecting to Redis if a URL is given
    pub async fn new(redis_url: Option<&str>, l1_size: u64, ttl_secs: u64) -> Self {
        let redis = match redis_url {
            Some(url) => match Self::connect(url).await {
                Ok(conn) => Some(tokio::sync::Mutex::new(conn)),
                Err(e) => {
                    tracing::warn!("Redis unavailable ({}), caching in memory only", e);
                    None
                }
            },
            None => None,
        };

        Self::build(redis, l1_size, ttl_secs)
    }

    /// In-memory only cache
    pub fn in_memory(l1_size: u64, ttl_secs: u64) -> Self {
        Self::build(None, l1_size, ttl_secs)
    }

    fn build(redis: Option<tokio::sync::Mutex<ConnectionManager>>, l1_size: u64, ttl_secs: u64) -> Self {
        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            redis,
            l1_cache,
            ttl_secs,
        }
    }

    async fn connect(url: &str) -> Result<ConnectionManager, CacheError> {
        let client = redis::Client::open(url)?;
        Ok(ConnectionManager::new(client).await?)
    }

    pub fn has_redis(&self) -> bool {
        self.redis.is_some()
    }

    /// Get a value from cache (L1 first, then L2)
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(json) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(Some(serde_json::from_str(&json)?));
        }

        let Some(l2) = &self.redis else {
            tracing::trace!("Cache miss: {}", key);
            return Ok(None);
        };

        let mut conn = l2.lock().await;
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        match value {
            Some(json) => {
                tracing::trace!("L2 cache hit: {}", key);
                let parsed = serde_json::from_str(&json)?;
                self.l1_cache.insert(key.to_string(), json).await;
                Ok(Some(parsed))
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Ok(None)
            }
        }
    }

    /// Set a value in cache (both tiers)
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;
        self.l1_cache.insert(key.to_string(), json.clone()).await;

        if let Some(l2) = &self.redis {
            let mut conn = l2.lock().await;
            redis::cmd("SETEX")
                .arg(key)
                .arg(self.ttl_secs)
                .arg(json)
                .query_async::<()>(&mut *conn)
                .await?;
        }

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            l1_size: self.l1_cache.entry_count(),
            redis_enabled: self.has_redis(),
            ttl_secs: self.ttl_secs,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub l1_size: u64,
    pub redis_enabled: bool,
    pub ttl_secs: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a user's assembled groups under one policy and week
    pub fn groups(user_id: &str, group_size: u8, min_compatibility: u8, week_start: chrono::NaiveDate) -> String {
        format!("groups:{}:{}:{}:{}", user_id, group_size, min_compatibility, week_start)
    }
}
