//! Round planning: solver pairs, leftover pairing, and trio folding.
//!
//! The solver only ever pairs candidates who have never met. Whoever it
//! leaves out is paired regardless of history by a two-pointer pass over the
//! leftovers in lexicographic order: a repeat partner beats sitting a round
//! out. An odd candidate remaining after that pass joins the pair named by
//! the configured [`TrioAnchor`].

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{CandidateId, MatchHistory, Pair, PairingGraph, Trio};

/// Rule naming the pair that absorbs an odd leftover candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrioAnchor {
    /// Greatest solver pair; the last leftover pair when the solver found none.
    #[default]
    LastSolverPair,
    /// Last two-pointer pair; the greatest solver pair when there is none.
    LastLeftoverPair,
}

impl TrioAnchor {
    const LAST_SOLVER_PAIR: &'static str = "last-solver-pair";
    const LAST_LEFTOVER_PAIR: &'static str = "last-leftover-pair";

    fn take(self, solver_pairs: &mut Vec<Pair>, leftover_pairs: &mut Vec<Pair>) -> Option<Pair> {
        match self {
            Self::LastSolverPair => solver_pairs.pop().or_else(|| leftover_pairs.pop()),
            Self::LastLeftoverPair => leftover_pairs.pop().or_else(|| solver_pairs.pop()),
        }
    }
}

/// Error returned when parsing an unknown [`TrioAnchor`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trio anchor `{0}`; expected `last-solver-pair` or `last-leftover-pair`")]
pub struct UnknownTrioAnchor(pub String);

impl FromStr for TrioAnchor {
    type Err = UnknownTrioAnchor;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            Self::LAST_SOLVER_PAIR => Ok(Self::LastSolverPair),
            Self::LAST_LEFTOVER_PAIR => Ok(Self::LastLeftoverPair),
            other => Err(UnknownTrioAnchor(other.to_owned())),
        }
    }
}

impl fmt::Display for TrioAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LastSolverPair => Self::LAST_SOLVER_PAIR,
            Self::LastLeftoverPair => Self::LAST_LEFTOVER_PAIR,
        })
    }
}

/// Pairings chosen for one round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingPlan {
    solver_pairs: Vec<Pair>,
    leftover_pairs: Vec<Pair>,
    trio: Option<Trio>,
    unpaired: Option<CandidateId>,
}

impl PairingPlan {
    /// Pairs found by the solver, excluding any pair folded into the trio.
    pub fn solver_pairs(&self) -> &[Pair] {
        &self.solver_pairs
    }

    /// Pairs forced from solver leftovers, excluding any pair folded into the
    /// trio.
    pub fn leftover_pairs(&self) -> &[Pair] {
        &self.leftover_pairs
    }

    /// Trio formed from an odd leftover, if any.
    pub fn trio(&self) -> Option<&Trio> {
        self.trio.as_ref()
    }

    /// Candidate left without a partner. Only a single-candidate pool does this.
    pub fn unpaired(&self) -> Option<&CandidateId> {
        self.unpaired.as_ref()
    }

    /// Every unordered pair to record: solver pairs, then leftover pairs, then
    /// the trio's three mutual pairs.
    pub fn pairs(&self) -> Vec<Pair> {
        let trio_pairs = self.trio.iter().flat_map(Trio::pairs);
        self.solver_pairs
            .iter()
            .chain(&self.leftover_pairs)
            .cloned()
            .chain(trio_pairs)
            .collect()
    }

    /// Number of pairs [`PairingPlan::pairs`] yields.
    pub fn pair_count(&self) -> usize {
        self.solver_pairs.len() + self.leftover_pairs.len() + if self.trio.is_some() { 3 } else { 0 }
    }

    /// Return whether the plan records nothing.
    pub fn is_empty(&self) -> bool {
        self.pair_count() == 0
    }
}

/// Plan a round for `candidates` avoiding every pair in `history`.
///
/// Pools of fewer than two candidates skip the solver and yield an empty plan.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
///
/// use guild_matcher::domain::{CandidateId, MatchHistory, TrioAnchor, plan_pairings};
///
/// let pool = ["A", "B", "C", "D", "E"]
///     .into_iter()
///     .map(|raw| CandidateId::new(raw).expect("valid id"))
///     .collect::<BTreeSet<_>>();
/// let plan = plan_pairings(&pool, &MatchHistory::new(), TrioAnchor::LastSolverPair);
///
/// assert!(plan.trio().is_some());
/// assert_eq!(plan.pair_count(), 4);
/// ```
pub fn plan_pairings(
    candidates: &BTreeSet<CandidateId>,
    history: &MatchHistory,
    anchor: TrioAnchor,
) -> PairingPlan {
    if candidates.len() < 2 {
        return PairingPlan {
            unpaired: candidates.first().cloned(),
            ..PairingPlan::default()
        };
    }
    let solver_pairs = PairingGraph::build(candidates, history).solve();
    resolve_leftovers(candidates, solver_pairs, anchor)
}

/// Pair everyone in `candidates` the solver left out and fold an odd
/// leftover into a trio.
///
/// `solver_pairs` must be sorted ascending, as [`PairingGraph::solve`]
/// returns them.
pub fn resolve_leftovers(
    candidates: &BTreeSet<CandidateId>,
    solver_pairs: Vec<Pair>,
    anchor: TrioAnchor,
) -> PairingPlan {
    let matched = solver_pairs
        .iter()
        .flat_map(|pair| [pair.first(), pair.second()])
        .collect::<HashSet<_>>();
    let unmatched = candidates
        .iter()
        .filter(|candidate| !matched.contains(candidate))
        .cloned()
        .collect::<Vec<_>>();

    let mut solver_pairs = solver_pairs;
    let mut leftover_pairs = Vec::with_capacity(unmatched.len() / 2);
    let (mut left, mut right) = (0, unmatched.len());
    while right - left >= 2 {
        right -= 1;
        leftover_pairs.push(Pair::from_sorted(
            unmatched[left].clone(),
            unmatched[right].clone(),
        ));
        left += 1;
    }

    let odd_one_out = (right - left == 1).then(|| unmatched[left].clone());
    let Some(joiner) = odd_one_out else {
        return PairingPlan {
            solver_pairs,
            leftover_pairs,
            trio: None,
            unpaired: None,
        };
    };

    match anchor.take(&mut solver_pairs, &mut leftover_pairs) {
        Some(anchor_pair) => PairingPlan {
            solver_pairs,
            leftover_pairs,
            trio: Some(Trio::absorbing(anchor_pair, joiner)),
            unpaired: None,
        },
        None => PairingPlan {
            solver_pairs,
            leftover_pairs,
            trio: None,
            unpaired: Some(joiner),
        },
    }
}
