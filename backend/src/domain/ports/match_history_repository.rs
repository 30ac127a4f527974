//! Port for reading every match a guild has ever recorded.

use async_trait::async_trait;

use crate::domain::{GuildId, MatchHistory};

use super::define_port_error;

define_port_error! {
    /// Errors raised by match history repository adapters.
    pub enum MatchHistoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "match history repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "match history repository query failed: {message}",
    }
}

/// Port for loading pairing history, active and inactive alike.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchHistoryRepository: Send + Sync {
    /// Load the guild's history. A guild with no records yields an empty history.
    async fn load_history(
        &self,
        guild_id: &GuildId,
    ) -> Result<MatchHistory, MatchHistoryRepositoryError>;
}

/// Fixture implementation with no history.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMatchHistoryRepository;

#[async_trait]
impl MatchHistoryRepository for FixtureMatchHistoryRepository {
    async fn load_history(
        &self,
        _guild_id: &GuildId,
    ) -> Result<MatchHistory, MatchHistoryRepositoryError> {
        Ok(MatchHistory::new())
    }
}
