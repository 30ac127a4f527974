//! Orchestration of one matching round.
//!
//! A run reads the guild's candidate pool and pairing history, plans the
//! round, replaces the active round in one transaction, advances the guild's
//! schedule, clears the pool and finally tells the bot that matches are
//! ready. Every step runs strictly after the previous one finished.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::domain::ports::{
    CandidatePoolStore, MatchHistoryRepository, MatchNotifier, MatchRoundRepository,
    MatchRunCommand, MatchScheduleRepository,
};
use crate::domain::{
    GuildId, MatchFrequency, MatchRound, MatchRunError, PairingPlan, RoundSummary,
    ScheduleOutcome, TrioAnchor, plan_pairings,
};

/// Result of delivering the round-completed notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// The receiver acknowledged with a success status.
    Delivered { status: u16 },
    /// Delivery failed. The round itself still stands.
    Failed { message: String },
    /// No notification endpoint is configured.
    Skipped,
}

/// Report of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRunOutcome {
    /// Identifier attached to every log line of the run.
    pub run_id: Uuid,
    /// Guild the round was run for.
    pub guild_id: GuildId,
    /// Size of the candidate pool that was read.
    pub candidate_count: usize,
    /// Pairings chosen for the round.
    pub plan: PairingPlan,
    /// Rows closed and inserted by the round replacement.
    pub round: RoundSummary,
    /// What happened to the guild's schedule.
    pub schedule: ScheduleOutcome,
    /// Result of the round-completed notification.
    pub notification: NotificationOutcome,
}

/// Stores and services a run depends on.
#[derive(Clone)]
pub struct MatchRunPorts {
    /// Source of the guild's candidates, cleared after a round.
    pub pool_store: Arc<dyn CandidatePoolStore>,
    /// Every pairing the guild has ever had.
    pub history: Arc<dyn MatchHistoryRepository>,
    /// Writer that swaps the active round.
    pub rounds: Arc<dyn MatchRoundRepository>,
    /// Per-guild round schedule.
    pub schedules: Arc<dyn MatchScheduleRepository>,
    /// `None` when no notification endpoint is configured.
    pub notifier: Option<Arc<dyn MatchNotifier>>,
}

/// Service implementing [`MatchRunCommand`].
#[derive(Clone)]
pub struct MatchRunService {
    ports: MatchRunPorts,
    clock: Arc<dyn Clock>,
    trio_anchor: TrioAnchor,
}

impl MatchRunService {
    /// Create a service over the given ports.
    pub fn new(ports: MatchRunPorts, clock: Arc<dyn Clock>, trio_anchor: TrioAnchor) -> Self {
        Self {
            ports,
            clock,
            trio_anchor,
        }
    }

    /// Run one round for `guild_id`.
    pub async fn run(&self, guild_id: &GuildId) -> Result<MatchRunOutcome, MatchRunError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("match_run", %run_id, %guild_id);
        self.run_steps(run_id, guild_id).instrument(span).await
    }

    async fn run_steps(
        &self,
        run_id: Uuid,
        guild_id: &GuildId,
    ) -> Result<MatchRunOutcome, MatchRunError> {
        info!("match run started");
        let candidates = self
            .ports
            .pool_store
            .load_pool(guild_id)
            .await
            .map_err(MatchRunError::PoolLoad)?;
        let history = self.ports.history.load_history(guild_id).await?;
        info!(
            candidates = candidates.len(),
            history_users = history.len(),
            "loaded matching inputs"
        );

        let plan = plan_pairings(&candidates, &history, self.trio_anchor);
        debug!(
            solver_pairs = plan.solver_pairs().len(),
            leftover_pairs = plan.leftover_pairs().len(),
            trio = plan.trio().is_some(),
            "planned round"
        );
        if let Some(unpaired) = plan.unpaired() {
            info!(candidate = %unpaired, "single candidate left unmatched");
        }

        let now = self.clock.utc();
        let round = MatchRound::new(guild_id.clone(), plan.pairs(), now);
        let summary = self.ports.rounds.replace_active_round(&round).await?;
        info!(
            deactivated = summary.deactivated,
            inserted = summary.inserted,
            "replaced active round"
        );

        let schedule = self.advance_schedule(guild_id, now).await?;

        self.ports
            .pool_store
            .clear_pool(guild_id)
            .await
            .map_err(MatchRunError::PoolClear)?;

        let notification = self.notify(guild_id).await;
        info!(pairs = plan.pair_count(), "match run finished");

        Ok(MatchRunOutcome {
            run_id,
            guild_id: guild_id.clone(),
            candidate_count: candidates.len(),
            plan,
            round: summary,
            schedule,
            notification,
        })
    }

    async fn advance_schedule(
        &self,
        guild_id: &GuildId,
        now: DateTime<Utc>,
    ) -> Result<ScheduleOutcome, MatchRunError> {
        let Some(days) = self.ports.schedules.find_frequency_days(guild_id).await? else {
            warn!("guild has no schedule configuration; schedule not advanced");
            return Ok(ScheduleOutcome::MissingConfig);
        };
        let Some(frequency) = MatchFrequency::from_days(days) else {
            warn!(days, "match frequency is not positive; schedule not advanced");
            return Ok(ScheduleOutcome::InvalidFrequency { days });
        };

        let update = frequency.advance_from(now);
        self.ports
            .schedules
            .record_schedule(guild_id, &update)
            .await?;
        info!(next_match_date = %update.next_match_date, "advanced schedule");
        Ok(ScheduleOutcome::Advanced(update))
    }

    async fn notify(&self, guild_id: &GuildId) -> NotificationOutcome {
        let Some(notifier) = self.ports.notifier.as_ref() else {
            debug!("no notification endpoint configured");
            return NotificationOutcome::Skipped;
        };
        match notifier.notify_completed(guild_id).await {
            Ok(status) => {
                info!(status, "notified match completion");
                NotificationOutcome::Delivered { status }
            }
            Err(err) => {
                warn!(error = %err, "match completion notification failed");
                NotificationOutcome::Failed {
                    message: err.to_string(),
                }
            }
        }
    }
}

#[async_trait]
impl MatchRunCommand for MatchRunService {
    async fn run_match(&self, guild_id: &GuildId) -> Result<MatchRunOutcome, MatchRunError> {
        self.run(guild_id).await
    }
}

#[cfg(test)]
#[path = "match_run_service_tests.rs"]
mod tests;
