//! In-memory port implementations shared by the integration tests.
//!
//! The stores mimic the observable behaviour of the Redis and PostgreSQL
//! adapters: a set per guild, directional match rows with an active flag, and
//! one schedule row per guild.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use guild_matcher::domain::ports::{
    CandidatePoolStore, CandidatePoolStoreError, MatchHistoryRepository,
    MatchHistoryRepositoryError, MatchNotifier, MatchNotifierError, MatchRoundRepository,
    MatchRoundRepositoryError, MatchScheduleRepository, MatchScheduleRepositoryError,
};
use guild_matcher::domain::{
    CandidateId, GuildId, MatchHistory, MatchRound, MatchRunPorts, MatchRunService,
    RoundSummary, ScheduleUpdate, TrioAnchor,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn id(value: &str) -> CandidateId {
    CandidateId::new(value).expect("valid candidate id")
}

pub fn guild(value: &str) -> GuildId {
    GuildId::new(value).expect("valid guild id")
}

pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 18, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Clock frozen at one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Candidate pools keyed by guild.
#[derive(Default)]
pub struct InMemoryPoolStore {
    pools: Mutex<HashMap<GuildId, BTreeSet<CandidateId>>>,
    unreachable: Mutex<bool>,
}

impl InMemoryPoolStore {
    pub fn add(&self, guild_id: &GuildId, members: &[&str]) {
        lock(&self.pools)
            .entry(guild_id.clone())
            .or_default()
            .extend(members.iter().map(|member| id(member)));
    }

    pub fn members(&self, guild_id: &GuildId) -> BTreeSet<CandidateId> {
        lock(&self.pools)
            .get(guild_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        *lock(&self.unreachable) = unreachable;
    }

    fn check(&self) -> Result<(), CandidatePoolStoreError> {
        if *lock(&self.unreachable) {
            Err(CandidatePoolStoreError::unreachable("connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CandidatePoolStore for InMemoryPoolStore {
    async fn load_pool(
        &self,
        guild_id: &GuildId,
    ) -> Result<BTreeSet<CandidateId>, CandidatePoolStoreError> {
        self.check()?;
        Ok(self.members(guild_id))
    }

    async fn clear_pool(&self, guild_id: &GuildId) -> Result<(), CandidatePoolStoreError> {
        self.check()?;
        lock(&self.pools).remove(guild_id);
        Ok(())
    }
}

/// One directional `ServerUserMatch` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMatch {
    pub guild_id: GuildId,
    pub user_id: CandidateId,
    pub matched_user_id: CandidateId,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Match rows shared by the history and round ports.
#[derive(Default)]
pub struct InMemoryMatchStore {
    rows: Mutex<Vec<StoredMatch>>,
    fail_next_round: Mutex<bool>,
}

impl InMemoryMatchStore {
    pub fn seed(&self, guild_id: &GuildId, user: &str, matched: &str, is_active: bool) {
        lock(&self.rows).push(StoredMatch {
            guild_id: guild_id.clone(),
            user_id: id(user),
            matched_user_id: id(matched),
            is_active,
            created_at: fixture_timestamp(),
            updated_at: fixture_timestamp(),
        });
    }

    pub fn rows(&self, guild_id: &GuildId) -> Vec<StoredMatch> {
        lock(&self.rows)
            .iter()
            .filter(|row| &row.guild_id == guild_id)
            .cloned()
            .collect()
    }

    pub fn active_rows(&self, guild_id: &GuildId) -> Vec<StoredMatch> {
        self.rows(guild_id)
            .into_iter()
            .filter(|row| row.is_active)
            .collect()
    }

    /// Active partners as sorted `(user, matched)` strings.
    pub fn active_directions(&self, guild_id: &GuildId) -> BTreeSet<(String, String)> {
        self.active_rows(guild_id)
            .into_iter()
            .map(|row| (row.user_id.to_string(), row.matched_user_id.to_string()))
            .collect()
    }

    pub fn fail_next_round(&self) {
        *lock(&self.fail_next_round) = true;
    }
}

#[async_trait]
impl MatchHistoryRepository for InMemoryMatchStore {
    async fn load_history(
        &self,
        guild_id: &GuildId,
    ) -> Result<MatchHistory, MatchHistoryRepositoryError> {
        Ok(self
            .rows(guild_id)
            .into_iter()
            .map(|row| (row.user_id, row.matched_user_id))
            .collect())
    }
}

#[async_trait]
impl MatchRoundRepository for InMemoryMatchStore {
    async fn replace_active_round(
        &self,
        round: &MatchRound,
    ) -> Result<RoundSummary, MatchRoundRepositoryError> {
        if std::mem::take(&mut *lock(&self.fail_next_round)) {
            return Err(MatchRoundRepositoryError::query("insert rejected"));
        }

        // Work on a copy and swap it in, so a failure leaves nothing behind.
        let mut rows = lock(&self.rows);
        let mut next = rows.clone();
        let mut deactivated = 0;
        for row in next
            .iter_mut()
            .filter(|row| &row.guild_id == round.guild_id() && row.is_active)
        {
            row.is_active = false;
            row.updated_at = round.recorded_at();
            deactivated += 1;
        }
        let records = round.records();
        let inserted = records.len();
        next.extend(records.into_iter().map(|record| StoredMatch {
            guild_id: round.guild_id().clone(),
            user_id: record.user_id,
            matched_user_id: record.matched_user_id,
            is_active: true,
            created_at: round.recorded_at(),
            updated_at: round.recorded_at(),
        }));
        *rows = next;
        Ok(RoundSummary {
            deactivated,
            inserted,
        })
    }
}

/// One `Match` row per guild.
#[derive(Default)]
pub struct InMemoryScheduleStore {
    rows: Mutex<HashMap<GuildId, (Option<i32>, Option<ScheduleUpdate>)>>,
}

impl InMemoryScheduleStore {
    pub fn configure(&self, guild_id: &GuildId, frequency_days: Option<i32>) {
        lock(&self.rows).insert(guild_id.clone(), (frequency_days, None));
    }

    pub fn schedule(&self, guild_id: &GuildId) -> Option<ScheduleUpdate> {
        lock(&self.rows)
            .get(guild_id)
            .and_then(|(_, schedule)| *schedule)
    }
}

#[async_trait]
impl MatchScheduleRepository for InMemoryScheduleStore {
    async fn find_frequency_days(
        &self,
        guild_id: &GuildId,
    ) -> Result<Option<i32>, MatchScheduleRepositoryError> {
        Ok(lock(&self.rows)
            .get(guild_id)
            .and_then(|(frequency, _)| *frequency))
    }

    async fn record_schedule(
        &self,
        guild_id: &GuildId,
        update: &ScheduleUpdate,
    ) -> Result<(), MatchScheduleRepositoryError> {
        if let Some((_, schedule)) = lock(&self.rows).get_mut(guild_id) {
            *schedule = Some(*update);
        }
        Ok(())
    }
}

/// Notifier that records every guild it was asked to announce.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<GuildId>>,
    reject_with: Mutex<Option<u16>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<GuildId> {
        lock(&self.sent).clone()
    }

    pub fn reject_with(&self, status: u16) {
        *lock(&self.reject_with) = Some(status);
    }
}

#[async_trait]
impl MatchNotifier for RecordingNotifier {
    async fn notify_completed(&self, guild_id: &GuildId) -> Result<u16, MatchNotifierError> {
        lock(&self.sent).push(guild_id.clone());
        match *lock(&self.reject_with) {
            Some(status) => Err(MatchNotifierError::rejected(status, "rejected")),
            None => Ok(200),
        }
    }
}

/// All in-memory stores plus the service wired over them.
pub struct World {
    pub pool: Arc<InMemoryPoolStore>,
    pub matches: Arc<InMemoryMatchStore>,
    pub schedules: Arc<InMemoryScheduleStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub service: MatchRunService,
}

impl World {
    pub fn new(trio_anchor: TrioAnchor) -> Self {
        let pool = Arc::new(InMemoryPoolStore::default());
        let matches = Arc::new(InMemoryMatchStore::default());
        let schedules = Arc::new(InMemoryScheduleStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let service = MatchRunService::new(
            MatchRunPorts {
                pool_store: pool.clone(),
                history: matches.clone(),
                rounds: matches.clone(),
                schedules: schedules.clone(),
                notifier: Some(notifier.clone()),
            },
            Arc::new(FixedClock(fixture_timestamp())),
            trio_anchor,
        );
        Self {
            pool,
            matches,
            schedules,
            notifier,
            service,
        }
    }
}
