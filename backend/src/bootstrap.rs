//! Wiring shared by the binaries: logging and adapter construction.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::MatcherConfig;
use crate::domain::ports::MatchNotifier;
use crate::domain::{MatchRunPorts, MatchRunService};
use crate::outbound::cache::{CacheConfig, CachePoolError, RedisCandidatePoolStore};
use crate::outbound::notify::HttpMatchNotifier;
use crate::outbound::persistence::{
    DbPool, DieselMatchHistoryRepository, DieselMatchRoundRepository,
    DieselMatchScheduleRepository, PoolConfig, PoolError,
};

/// Failures while constructing adapters.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The PostgreSQL pool or its TLS connector could not be built.
    #[error(transparent)]
    Database(#[from] PoolError),
    /// The Redis pool could not be built.
    #[error(transparent)]
    Cache(#[from] CachePoolError),
    /// The webhook client could not be built.
    #[error("failed to build notification client: {0}")]
    Notifier(#[from] reqwest::Error),
}

/// Install JSON logging filtered by `RUST_LOG`. A second call only warns.
pub fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

/// Build a [`MatchRunService`] over the Redis, PostgreSQL and webhook
/// adapters described by `config`.
///
/// # Errors
///
/// Returns [`BootstrapError`] when an adapter cannot be constructed. No
/// store is queried here.
pub async fn build_match_service(config: &MatcherConfig) -> Result<MatchRunService, BootstrapError> {
    let pool_config =
        PoolConfig::new(config.database_url.as_str()).with_ssl_mode(config.database_ssl_mode);
    let pool = DbPool::new(pool_config).await?;
    let pool_store = RedisCandidatePoolStore::connect(
        CacheConfig::new(config.cache_url.clone()).with_key_prefix(config.pool_key_prefix.as_str()),
    )?;

    let notifier = match &config.match_url {
        Some(url) => {
            let notifier = HttpMatchNotifier::new(url.clone(), config.request_timeout)?;
            Some(Arc::new(notifier) as Arc<dyn MatchNotifier>)
        }
        None => {
            warn!("no match url configured; completion notifications are disabled");
            None
        }
    };

    info!(
        trio_anchor = %config.trio_anchor,
        pool_key_prefix = %config.pool_key_prefix,
        notifications = notifier.is_some(),
        "matcher wired"
    );

    let ports = MatchRunPorts {
        pool_store: Arc::new(pool_store),
        history: Arc::new(DieselMatchHistoryRepository::new(pool.clone())),
        rounds: Arc::new(DieselMatchRoundRepository::new(pool.clone())),
        schedules: Arc::new(DieselMatchScheduleRepository::new(pool)),
        notifier,
    };
    Ok(MatchRunService::new(
        ports,
        Arc::new(DefaultClock),
        config.trio_anchor,
    ))
}
