//! Port for per-guild round scheduling configuration.

use async_trait::async_trait;

use crate::domain::{GuildId, ScheduleUpdate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by match schedule repository adapters.
    pub enum MatchScheduleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "match schedule repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "match schedule repository query failed: {message}",
    }
}

/// Port for reading match frequency and recording round dates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchScheduleRepository: Send + Sync {
    /// Configured frequency in days, or `None` when the guild has no
    /// schedule configuration.
    async fn find_frequency_days(
        &self,
        guild_id: &GuildId,
    ) -> Result<Option<i32>, MatchScheduleRepositoryError>;

    /// Store the last and next round dates for the guild.
    async fn record_schedule(
        &self,
        guild_id: &GuildId,
        update: &ScheduleUpdate,
    ) -> Result<(), MatchScheduleRepositoryError>;
}

/// Fixture implementation for guilds without schedule configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMatchScheduleRepository;

#[async_trait]
impl MatchScheduleRepository for FixtureMatchScheduleRepository {
    async fn find_frequency_days(
        &self,
        _guild_id: &GuildId,
    ) -> Result<Option<i32>, MatchScheduleRepositoryError> {
        Ok(None)
    }

    async fn record_schedule(
        &self,
        _guild_id: &GuildId,
        _update: &ScheduleUpdate,
    ) -> Result<(), MatchScheduleRepositoryError> {
        Ok(())
    }
}
