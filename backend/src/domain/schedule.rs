//! Next-round scheduling.

use chrono::{DateTime, Duration, Utc};

/// Gap between rounds, stored as a whole number of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchFrequency(Duration);

impl MatchFrequency {
    /// Interpret a stored day count. Non-positive values are not a usable
    /// schedule and yield `None`.
    ///
    /// # Examples
    /// ```
    /// use guild_matcher::domain::MatchFrequency;
    ///
    /// assert!(MatchFrequency::from_days(7).is_some());
    /// assert!(MatchFrequency::from_days(0).is_none());
    /// ```
    pub fn from_days(days: i32) -> Option<Self> {
        (days > 0).then(|| Self(Duration::days(i64::from(days))))
    }

    /// Compute the schedule after a round completed at `now`.
    pub fn advance_from(&self, now: DateTime<Utc>) -> ScheduleUpdate {
        ScheduleUpdate {
            last_match_date: now,
            next_match_date: now + self.0,
        }
    }
}

/// New scheduling timestamps for a guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleUpdate {
    /// When the round just ran.
    pub last_match_date: DateTime<Utc>,
    /// When the next round is due.
    pub next_match_date: DateTime<Utc>,
}

/// What the schedule step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// Schedule advanced.
    Advanced(ScheduleUpdate),
    /// Guild has no schedule configuration.
    MissingConfig,
    /// Stored frequency was not positive.
    InvalidFrequency { days: i32 },
}
