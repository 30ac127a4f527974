//! Port for the per-guild pool of candidates waiting to be matched.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::{CandidateId, GuildId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by candidate pool store adapters.
    pub enum CandidatePoolStoreError {
        /// The store could not be reached.
        Unreachable { message: String } =>
            "candidate pool store unreachable: {message}",
        /// The store refused our credentials.
        Authentication { message: String } =>
            "candidate pool store authentication failed: {message}",
        /// The store did not answer in time.
        Timeout { message: String } =>
            "candidate pool store timed out: {message}",
        /// The store answered with an error.
        Command { message: String } =>
            "candidate pool store command failed: {message}",
    }
}

impl CandidatePoolStoreError {
    /// Return whether the failure means the store could not be used at all.
    pub fn is_connection(&self) -> bool {
        !matches!(self, Self::Command { .. })
    }
}

/// Port for reading and clearing a guild's candidate pool.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandidatePoolStore: Send + Sync {
    /// Load the guild's current pool. An absent pool is an empty set.
    async fn load_pool(
        &self,
        guild_id: &GuildId,
    ) -> Result<BTreeSet<CandidateId>, CandidatePoolStoreError>;

    /// Remove the guild's pool so its candidates do not carry into the next round.
    async fn clear_pool(&self, guild_id: &GuildId) -> Result<(), CandidatePoolStoreError>;
}

/// Fixture implementation holding no candidates.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCandidatePoolStore;

#[async_trait]
impl CandidatePoolStore for FixtureCandidatePoolStore {
    async fn load_pool(
        &self,
        _guild_id: &GuildId,
    ) -> Result<BTreeSet<CandidateId>, CandidatePoolStoreError> {
        Ok(BTreeSet::new())
    }

    async fn clear_pool(&self, _guild_id: &GuildId) -> Result<(), CandidatePoolStoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_pool_is_empty() {
        let store = FixtureCandidatePoolStore;
        let guild = GuildId::new("g").expect("valid guild id");

        assert!(store.load_pool(&guild).await.expect("load succeeds").is_empty());
        store.clear_pool(&guild).await.expect("clear succeeds");
    }

    #[rstest]
    #[case(CandidatePoolStoreError::unreachable("refused"), true)]
    #[case(CandidatePoolStoreError::authentication("WRONGPASS"), true)]
    #[case(CandidatePoolStoreError::timeout("5s"), true)]
    #[case(CandidatePoolStoreError::command("WRONGTYPE"), false)]
    fn connection_failures_are_classified(
        #[case] error: CandidatePoolStoreError,
        #[case] expected: bool,
    ) {
        assert_eq!(error.is_connection(), expected);
    }
}
