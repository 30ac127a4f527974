//! Driven ports for the stores and services a matching round talks to.

mod macros;
pub(crate) use macros::define_port_error;

mod candidate_pool_store;
mod match_history_repository;
mod match_notifier;
mod match_round_repository;
mod match_run_command;
mod match_schedule_repository;

#[cfg(test)]
pub use candidate_pool_store::MockCandidatePoolStore;
pub use candidate_pool_store::{
    CandidatePoolStore, CandidatePoolStoreError, FixtureCandidatePoolStore,
};
#[cfg(test)]
pub use match_history_repository::MockMatchHistoryRepository;
pub use match_history_repository::{
    FixtureMatchHistoryRepository, MatchHistoryRepository, MatchHistoryRepositoryError,
};
#[cfg(test)]
pub use match_notifier::MockMatchNotifier;
pub use match_notifier::{FixtureMatchNotifier, MatchNotifier, MatchNotifierError};
#[cfg(test)]
pub use match_round_repository::MockMatchRoundRepository;
pub use match_round_repository::{
    FixtureMatchRoundRepository, MatchRoundRepository, MatchRoundRepositoryError,
};
#[cfg(test)]
pub use match_run_command::MockMatchRunCommand;
pub use match_run_command::{FixtureMatchRunCommand, MatchRunCommand};
#[cfg(test)]
pub use match_schedule_repository::MockMatchScheduleRepository;
pub use match_schedule_repository::{
    FixtureMatchScheduleRepository, MatchScheduleRepository, MatchScheduleRepositoryError,
};
