//! PostgreSQL-backed `MatchRoundRepository`.
//!
//! Closing the previous round and inserting the new one happen in a single
//! transaction, so readers never see a guild with two active rounds or none
//! half-written.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{MatchRoundRepository, MatchRoundRepositoryError};
use crate::domain::{MatchRound, NewMatchRecord, RoundSummary};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewMatchRow;
use super::pool::DbPool;
use super::schema::server_user_matches;

/// Diesel implementation of [`MatchRoundRepository`].
#[derive(Clone)]
pub struct DieselMatchRoundRepository {
    pool: DbPool,
}

impl DieselMatchRoundRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> MatchRoundRepositoryError {
    map_diesel_error(
        error,
        MatchRoundRepositoryError::query,
        MatchRoundRepositoryError::connection,
    )
}

fn new_rows<'a>(round: &'a MatchRound, records: &'a [NewMatchRecord]) -> Vec<NewMatchRow<'a>> {
    let recorded_at = round.recorded_at();
    records
        .iter()
        .map(|record| NewMatchRow {
            guild_id: round.guild_id().as_ref(),
            user_id: record.user_id.as_ref(),
            matched_user_id: record.matched_user_id.as_ref(),
            is_match_active: true,
            created_at: recorded_at,
            updated_at: recorded_at,
        })
        .collect()
}

#[async_trait]
impl MatchRoundRepository for DieselMatchRoundRepository {
    async fn replace_active_round(
        &self,
        round: &MatchRound,
    ) -> Result<RoundSummary, MatchRoundRepositoryError> {
        let records = round.records();
        let rows = new_rows(round, &records);
        let guild_id = round.guild_id().as_ref();
        let recorded_at = round.recorded_at();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, MatchRoundRepositoryError::connection))?;

        let summary = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let deactivated = diesel::update(
                        server_user_matches::table
                            .filter(server_user_matches::guild_id.eq(guild_id))
                            .filter(server_user_matches::is_match_active.eq(true)),
                    )
                    .set((
                        server_user_matches::is_match_active.eq(false),
                        server_user_matches::updated_at.eq(recorded_at),
                    ))
                    .execute(conn)
                    .await?;

                    if rows.is_empty() {
                        return Ok(RoundSummary {
                            deactivated,
                            inserted: 0,
                        });
                    }

                    let inserted = diesel::insert_into(server_user_matches::table)
                        .values(&rows)
                        .execute(conn)
                        .await?;

                    Ok(RoundSummary {
                        deactivated,
                        inserted,
                    })
                }
                .scope_boxed()
            })
            .await
            .map_err(map_error)?;

        debug!(
            deactivated = summary.deactivated,
            inserted = summary.inserted,
            "committed match round"
        );
        Ok(summary)
    }
}
