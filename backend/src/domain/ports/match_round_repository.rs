//! Port for swapping a guild's active round.

use async_trait::async_trait;

use crate::domain::{MatchRound, RoundSummary};

use super::define_port_error;

define_port_error! {
    /// Errors raised by match round repository adapters.
    pub enum MatchRoundRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "match round repository connection failed: {message}",
        /// Query or mutation failed; nothing was committed.
        Query { message: String } =>
            "match round repository query failed: {message}",
    }
}

/// Port for replacing the active matches of a guild.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchRoundRepository: Send + Sync {
    /// Deactivate every active row of the round's guild and insert both
    /// directional rows for each new pair, committing all or nothing.
    ///
    /// An empty round still deactivates the previous one.
    async fn replace_active_round(
        &self,
        round: &MatchRound,
    ) -> Result<RoundSummary, MatchRoundRepositoryError>;
}

/// Fixture implementation that reports the rows it would have written.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMatchRoundRepository;

#[async_trait]
impl MatchRoundRepository for FixtureMatchRoundRepository {
    async fn replace_active_round(
        &self,
        round: &MatchRound,
    ) -> Result<RoundSummary, MatchRoundRepositoryError> {
        Ok(RoundSummary {
            deactivated: 0,
            inserted: round.records().len(),
        })
    }
}
