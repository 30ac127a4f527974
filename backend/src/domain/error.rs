//! Errors that abort a matching round.

use super::ports::{
    CandidatePoolStoreError, MatchHistoryRepositoryError, MatchRoundRepositoryError,
    MatchScheduleRepositoryError,
};

/// Fatal failure of one matching run.
///
/// Soft failures (missing schedule configuration, notification problems) do
/// not surface here; they are logged and reported in the run outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchRunError {
    /// Reading the candidate pool failed. Nothing was changed.
    #[error("loading candidate pool failed: {0}")]
    PoolLoad(CandidatePoolStoreError),
    /// Reading pairing history failed. Nothing was changed.
    #[error("loading match history failed: {0}")]
    History(#[from] MatchHistoryRepositoryError),
    /// Replacing the active round failed and was rolled back.
    #[error("recording match round failed: {0}")]
    Round(#[from] MatchRoundRepositoryError),
    /// Advancing the schedule failed after the round was committed.
    #[error("updating match schedule failed: {0}")]
    Schedule(#[from] MatchScheduleRepositoryError),
    /// Clearing the consumed pool failed after the round was committed.
    #[error("clearing candidate pool failed: {0}")]
    PoolClear(CandidatePoolStoreError),
}

impl MatchRunError {
    /// Return whether a store could not be reached, authenticated against, or
    /// answered too slowly.
    pub fn is_connection(&self) -> bool {
        match self {
            Self::PoolLoad(err) | Self::PoolClear(err) => err.is_connection(),
            Self::History(err) => matches!(err, MatchHistoryRepositoryError::Connection { .. }),
            Self::Round(err) => matches!(err, MatchRoundRepositoryError::Connection { .. }),
            Self::Schedule(err) => matches!(err, MatchScheduleRepositoryError::Connection { .. }),
        }
    }

    /// Return whether the new round had already been committed when the run
    /// failed. Rerunning then closes that round and, with the pool possibly
    /// still present, plans another.
    pub fn round_committed(&self) -> bool {
        matches!(self, Self::Schedule(_) | Self::PoolClear(_))
    }
}
