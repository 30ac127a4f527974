//! `CandidatePoolStore` backed by a Redis set per guild.
//!
//! Each operation checks a connection out of a `bb8` pool, so a store that
//! restarts between rounds is picked up again without restarting the
//! process.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use bb8::{Pool, PooledConnection, RunError};
use redis::{AsyncCommands, Client, ErrorKind, RedisError};
use tracing::debug;
use url::Url;

use crate::domain::ports::{CandidatePoolStore, CandidatePoolStoreError};
use crate::domain::{CandidateId, GuildId};

/// Key prefix used when none is configured.
pub const DEFAULT_POOL_KEY_PREFIX: &str = "POOL-";

/// Errors raised while building the Redis pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CachePoolError {
    /// The connection URL was rejected by the client.
    #[error("invalid cache connection url: {message}")]
    InvalidUrl { message: String },
}

/// Settings for the Redis-backed pool store.
///
/// ```ignore
/// let config = CacheConfig::new(Url::parse("redis://127.0.0.1:6379")?)
///     .with_key_prefix("POOL-")
///     .with_connection_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    url: Url,
    key_prefix: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl CacheConfig {
    /// Create a configuration for `url` with a four-connection pool and a
    /// ten second checkout timeout.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            key_prefix: DEFAULT_POOL_KEY_PREFIX.to_owned(),
            max_size: 4,
            connection_timeout: Duration::from_secs(10),
        }
    }

    /// Set the prefix prepended to the guild id to form the set key.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the maximum number of pooled connections.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set how long a checkout may wait for a connection.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Key prefix for pool sets.
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }
}

/// Redis implementation of [`CandidatePoolStore`].
#[derive(Clone)]
pub struct RedisCandidatePoolStore {
    pool: Pool<Client>,
    key_prefix: String,
}

impl RedisCandidatePoolStore {
    /// Build the store. No connection is opened until the first operation.
    ///
    /// # Errors
    ///
    /// Returns [`CachePoolError::InvalidUrl`] when the client rejects the URL.
    pub fn connect(config: CacheConfig) -> Result<Self, CachePoolError> {
        let manager = Client::open(config.url.as_str()).map_err(|err| {
            CachePoolError::InvalidUrl {
                message: err.to_string(),
            }
        })?;
        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build_unchecked(manager);
        Ok(Self {
            pool,
            key_prefix: config.key_prefix,
        })
    }

    fn pool_key(&self, guild_id: &GuildId) -> String {
        pool_key(&self.key_prefix, guild_id)
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, Client>, CandidatePoolStoreError> {
        self.pool.get().await.map_err(map_pool_error)
    }
}

fn pool_key(prefix: &str, guild_id: &GuildId) -> String {
    format!("{prefix}{guild_id}")
}

fn map_pool_error(error: RunError<RedisError>) -> CandidatePoolStoreError {
    match error {
        RunError::User(err) => map_redis_error(err),
        RunError::TimedOut => {
            CandidatePoolStoreError::timeout("timed out waiting for a cache connection")
        }
    }
}

fn map_redis_error(error: RedisError) -> CandidatePoolStoreError {
    debug!(kind = ?error.kind(), %error, "redis operation failed");
    if error.kind() == ErrorKind::AuthenticationFailed {
        CandidatePoolStoreError::authentication(error.to_string())
    } else if error.is_timeout() {
        CandidatePoolStoreError::timeout(error.to_string())
    } else if error.is_connection_refusal()
        || error.is_connection_dropped()
        || error.is_io_error()
    {
        CandidatePoolStoreError::unreachable(error.to_string())
    } else {
        CandidatePoolStoreError::command(error.to_string())
    }
}

/// Convert raw set members into candidate ids, dropping unusable entries.
fn decode_members(key: &str, members: Vec<Vec<u8>>) -> BTreeSet<CandidateId> {
    members
        .into_iter()
        .filter_map(|raw| {
            let Ok(text) = String::from_utf8(raw) else {
                debug!(key, "skipping pool member that is not valid UTF-8");
                return None;
            };
            match CandidateId::new(text) {
                Ok(id) => Some(id),
                Err(err) => {
                    debug!(key, error = %err, "skipping unusable pool member");
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl CandidatePoolStore for RedisCandidatePoolStore {
    async fn load_pool(
        &self,
        guild_id: &GuildId,
    ) -> Result<BTreeSet<CandidateId>, CandidatePoolStoreError> {
        let key = self.pool_key(guild_id);
        let mut conn = self.connection().await?;
        let members: Vec<Vec<u8>> = conn.smembers(&key).await.map_err(map_redis_error)?;
        let candidates = decode_members(&key, members);
        debug!(key, candidates = candidates.len(), "read candidate pool");
        Ok(candidates)
    }

    async fn clear_pool(&self, guild_id: &GuildId) -> Result<(), CandidatePoolStoreError> {
        let key = self.pool_key(guild_id);
        let mut conn = self.connection().await?;
        let removed: i64 = conn.del(&key).await.map_err(map_redis_error)?;
        debug!(key, removed, "cleared candidate pool");
        Ok(())
    }
}
