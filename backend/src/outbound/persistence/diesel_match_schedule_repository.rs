//! PostgreSQL-backed `MatchScheduleRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{MatchScheduleRepository, MatchScheduleRepositoryError};
use crate::domain::{GuildId, ScheduleUpdate};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::ScheduleChangeset;
use super::pool::DbPool;
use super::schema::match_schedules;

/// Diesel implementation of [`MatchScheduleRepository`].
#[derive(Clone)]
pub struct DieselMatchScheduleRepository {
    pool: DbPool,
}

impl DieselMatchScheduleRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> MatchScheduleRepositoryError {
    map_diesel_error(
        error,
        MatchScheduleRepositoryError::query,
        MatchScheduleRepositoryError::connection,
    )
}

#[async_trait]
impl MatchScheduleRepository for DieselMatchScheduleRepository {
    async fn find_frequency_days(
        &self,
        guild_id: &GuildId,
    ) -> Result<Option<i32>, MatchScheduleRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, MatchScheduleRepositoryError::connection))?;

        let frequency = match_schedules::table
            .filter(match_schedules::guild_id.eq(guild_id.as_ref()))
            .select(match_schedules::match_frequency)
            .first::<Option<i32>>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        // A row with a null frequency is as good as no row.
        Ok(frequency.flatten())
    }

    async fn record_schedule(
        &self,
        guild_id: &GuildId,
        update: &ScheduleUpdate,
    ) -> Result<(), MatchScheduleRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, MatchScheduleRepositoryError::connection))?;

        let changes = ScheduleChangeset {
            last_match_date: update.last_match_date,
            next_match_date: update.next_match_date,
        };
        let updated = diesel::update(
            match_schedules::table.filter(match_schedules::guild_id.eq(guild_id.as_ref())),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(map_error)?;

        if updated == 0 {
            debug!("schedule row disappeared before it could be updated");
        }
        Ok(())
    }
}
