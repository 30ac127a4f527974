//! Driving port for triggering a matching round.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    GuildId, MatchRunError, MatchRunOutcome, NotificationOutcome, PairingPlan, RoundSummary,
    ScheduleOutcome,
};

/// Port used by inbound adapters to run one round for one guild.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchRunCommand: Send + Sync {
    /// Run a complete round: plan, record, reschedule, clear, notify.
    async fn run_match(&self, guild_id: &GuildId) -> Result<MatchRunOutcome, MatchRunError>;
}

/// Fixture command reporting an empty round without touching any store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMatchRunCommand;

#[async_trait]
impl MatchRunCommand for FixtureMatchRunCommand {
    async fn run_match(&self, guild_id: &GuildId) -> Result<MatchRunOutcome, MatchRunError> {
        Ok(MatchRunOutcome {
            run_id: Uuid::new_v4(),
            guild_id: guild_id.clone(),
            candidate_count: 0,
            plan: PairingPlan::default(),
            round: RoundSummary::default(),
            schedule: ScheduleOutcome::MissingConfig,
            notification: NotificationOutcome::Skipped,
        })
    }
}
