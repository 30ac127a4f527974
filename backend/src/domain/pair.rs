//! Unordered partner pairs and trios.

use std::fmt;

use super::CandidateId;

/// Error raised when a pair would match a candidate with itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("candidate {0} cannot be paired with themselves")]
pub struct SelfPairError(pub CandidateId);

/// Unordered pair of two distinct candidates.
///
/// The pair is normalised on construction so `first() < second()`; two pairs
/// built from the same candidates in either order compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pair {
    first: CandidateId,
    second: CandidateId,
}

impl Pair {
    /// Build a normalised pair.
    ///
    /// # Examples
    /// ```
    /// use guild_matcher::domain::{CandidateId, Pair};
    ///
    /// let a = CandidateId::new("a").expect("valid id");
    /// let b = CandidateId::new("b").expect("valid id");
    /// let pair = Pair::new(b.clone(), a.clone()).expect("distinct candidates");
    /// assert_eq!(pair.first(), &a);
    /// assert_eq!(pair.second(), &b);
    /// ```
    pub fn new(one: CandidateId, other: CandidateId) -> Result<Self, SelfPairError> {
        match one.cmp(&other) {
            std::cmp::Ordering::Less => Ok(Self {
                first: one,
                second: other,
            }),
            std::cmp::Ordering::Greater => Ok(Self {
                first: other,
                second: one,
            }),
            std::cmp::Ordering::Equal => Err(SelfPairError(one)),
        }
    }

    /// Build a pair from members already known to satisfy `first < second`.
    pub(crate) fn from_sorted(first: CandidateId, second: CandidateId) -> Self {
        debug_assert!(first < second, "pair members must be strictly ordered");
        Self { first, second }
    }

    /// Lexicographically smaller member.
    pub fn first(&self) -> &CandidateId {
        &self.first
    }

    /// Lexicographically greater member.
    pub fn second(&self) -> &CandidateId {
        &self.second
    }

    /// Return whether `candidate` belongs to this pair.
    pub fn contains(&self, candidate: &CandidateId) -> bool {
        &self.first == candidate || &self.second == candidate
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// Three candidates matched mutually.
///
/// A trio is formed when an odd candidate is left over after pairing: the
/// `joiner` is folded into the `anchor` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trio {
    anchor: Pair,
    joiner: CandidateId,
}

impl Trio {
    /// Fold a candidate known to be outside `anchor` into it.
    pub(crate) fn absorbing(anchor: Pair, joiner: CandidateId) -> Self {
        debug_assert!(!anchor.contains(&joiner), "joiner must be outside the anchor");
        Self { anchor, joiner }
    }

    /// Pair that absorbed the leftover candidate.
    pub fn anchor(&self) -> &Pair {
        &self.anchor
    }

    /// Leftover candidate folded into the anchor pair.
    pub fn joiner(&self) -> &CandidateId {
        &self.joiner
    }

    /// The three mutual pairs `(a, b)`, `(a, x)`, `(b, x)`.
    pub fn pairs(&self) -> [Pair; 3] {
        let Self { anchor, joiner } = self;
        [
            anchor.clone(),
            Self::joined(anchor.first(), joiner),
            Self::joined(anchor.second(), joiner),
        ]
    }

    fn joined(member: &CandidateId, joiner: &CandidateId) -> Pair {
        // Distinctness is a construction invariant of `Trio`.
        if member < joiner {
            Pair::from_sorted(member.clone(), joiner.clone())
        } else {
            Pair::from_sorted(joiner.clone(), member.clone())
        }
    }
}
