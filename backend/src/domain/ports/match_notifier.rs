//! Port for telling the bot that a guild's round is ready.

use async_trait::async_trait;

use crate::domain::GuildId;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while delivering a round-completed notification.
    pub enum MatchNotifierError {
        /// The request never produced a response.
        Transport { message: String } =>
            "match notification transport failed: {message}",
        /// The receiver did not answer in time.
        Timeout { message: String } =>
            "match notification timed out: {message}",
        /// The receiver answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "match notification rejected with status {status}: {message}",
    }
}

/// Port for notifying the external service that matching completed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchNotifier: Send + Sync {
    /// Announce that `guild_id` has a new round. Returns the HTTP status.
    async fn notify_completed(&self, guild_id: &GuildId) -> Result<u16, MatchNotifierError>;
}

/// Fixture implementation that acknowledges every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMatchNotifier;

#[async_trait]
impl MatchNotifier for FixtureMatchNotifier {
    async fn notify_completed(&self, _guild_id: &GuildId) -> Result<u16, MatchNotifierError> {
        Ok(200)
    }
}
