//! Redis adapters.
//!
//! The candidate pool lives in Redis as one set per guild, written by the bot
//! and consumed here once a round has been recorded.

mod redis_candidate_pool_store;

pub use redis_candidate_pool_store::{CacheConfig, CachePoolError, RedisCandidatePoolStore};
