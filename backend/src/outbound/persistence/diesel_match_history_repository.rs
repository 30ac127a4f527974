//! PostgreSQL-backed `MatchHistoryRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{MatchHistoryRepository, MatchHistoryRepositoryError};
use crate::domain::{CandidateId, GuildId, MatchHistory};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::MatchRecordRow;
use super::pool::DbPool;
use super::schema::server_user_matches;

/// Diesel implementation of [`MatchHistoryRepository`].
#[derive(Clone)]
pub struct DieselMatchHistoryRepository {
    pool: DbPool,
}

impl DieselMatchHistoryRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Fold rows into history, skipping records with blank ids.
fn rows_to_history(rows: Vec<MatchRecordRow>) -> MatchHistory {
    let mut history = MatchHistory::new();
    for row in rows {
        match (
            CandidateId::new(row.user_id),
            CandidateId::new(row.matched_user_id),
        ) {
            (Ok(user), Ok(matched)) => history.record(user, matched),
            (Err(err), _) | (_, Err(err)) => {
                debug!(error = %err, "skipping unusable match record");
            }
        }
    }
    history
}

#[async_trait]
impl MatchHistoryRepository for DieselMatchHistoryRepository {
    async fn load_history(
        &self,
        guild_id: &GuildId,
    ) -> Result<MatchHistory, MatchHistoryRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, MatchHistoryRepositoryError::connection))?;

        // Inactive rows count too: anyone ever paired stays ineligible.
        let rows = server_user_matches::table
            .filter(server_user_matches::guild_id.eq(guild_id.as_ref()))
            .select(MatchRecordRow::as_select())
            .load::<MatchRecordRow>(&mut conn)
            .await
            .map_err(|err| {
                map_diesel_error(
                    err,
                    MatchHistoryRepositoryError::query,
                    MatchHistoryRepositoryError::connection,
                )
            })?;

        debug!(rows = rows.len(), "loaded match history rows");
        Ok(rows_to_history(rows))
    }
}
