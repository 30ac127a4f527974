//! A round of active matches ready to be recorded.

use chrono::{DateTime, Utc};

use super::{CandidateId, GuildId, Pair};

/// One directional match row `user -> matched_user`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatchRecord {
    /// Candidate owning the row.
    pub user_id: CandidateId,
    /// Partner the candidate was matched with.
    pub matched_user_id: CandidateId,
}

/// The pairs replacing a guild's active matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRound {
    guild_id: GuildId,
    pairs: Vec<Pair>,
    recorded_at: DateTime<Utc>,
}

impl MatchRound {
    /// Create a round recorded at `recorded_at`.
    pub fn new(guild_id: GuildId, pairs: Vec<Pair>, recorded_at: DateTime<Utc>) -> Self {
        Self {
            guild_id,
            pairs,
            recorded_at,
        }
    }

    /// Guild the round belongs to.
    pub fn guild_id(&self) -> &GuildId {
        &self.guild_id
    }

    /// Unordered pairs in the round.
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Creation and update timestamp shared by every row.
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Expand each pair into its two directional rows.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use guild_matcher::domain::{CandidateId, GuildId, MatchRound, Pair};
    ///
    /// let pair = Pair::new(
    ///     CandidateId::new("a").expect("valid id"),
    ///     CandidateId::new("b").expect("valid id"),
    /// )
    /// .expect("distinct");
    /// let round = MatchRound::new(GuildId::new("g").expect("valid id"), vec![pair], Utc::now());
    /// assert_eq!(round.records().len(), 2);
    /// ```
    pub fn records(&self) -> Vec<NewMatchRecord> {
        self.pairs
            .iter()
            .flat_map(|pair| {
                [
                    NewMatchRecord {
                        user_id: pair.first().clone(),
                        matched_user_id: pair.second().clone(),
                    },
                    NewMatchRecord {
                        user_id: pair.second().clone(),
                        matched_user_id: pair.first().clone(),
                    },
                ]
            })
            .collect()
    }
}

/// Row counts reported after replacing a guild's active round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundSummary {
    /// Previously active rows switched off.
    pub deactivated: usize,
    /// New active rows written.
    pub inserted: usize,
}
