//! Pairing history for one guild.

use std::collections::{HashMap, HashSet};

use super::CandidateId;

/// Every partner each candidate has ever been matched with in a guild.
///
/// History includes inactive records: once two candidates have met they are
/// never offered to each other by the solver again. Lookups consult both
/// directions so a lone directional record still excludes the pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchHistory {
    partners: HashMap<CandidateId, HashSet<CandidateId>>,
}

impl MatchHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one directional match `user -> matched`.
    pub fn record(&mut self, user: CandidateId, matched: CandidateId) {
        self.partners.entry(user).or_default().insert(matched);
    }

    /// Return whether `a` and `b` have been matched before, in either direction.
    ///
    /// # Examples
    /// ```
    /// use guild_matcher::domain::{CandidateId, MatchHistory};
    ///
    /// let a = CandidateId::new("a").expect("valid id");
    /// let b = CandidateId::new("b").expect("valid id");
    /// let mut history = MatchHistory::new();
    /// history.record(a.clone(), b.clone());
    /// assert!(history.has_matched(&b, &a));
    /// ```
    pub fn has_matched(&self, a: &CandidateId, b: &CandidateId) -> bool {
        self.directional(a, b) || self.directional(b, a)
    }

    /// Number of candidates with at least one recorded partner.
    pub fn len(&self) -> usize {
        self.partners.len()
    }

    /// Return whether no match has ever been recorded.
    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    fn directional(&self, from: &CandidateId, to: &CandidateId) -> bool {
        self.partners
            .get(from)
            .is_some_and(|partners| partners.contains(to))
    }
}

impl FromIterator<(CandidateId, CandidateId)> for MatchHistory {
    fn from_iter<I: IntoIterator<Item = (CandidateId, CandidateId)>>(iter: I) -> Self {
        let mut history = Self::new();
        for (user, matched) in iter {
            history.record(user, matched);
        }
        history
    }
}
