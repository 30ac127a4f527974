//! Eligibility graph over the current pool.

use std::collections::BTreeSet;

use super::{BlossomGraph, CandidateId, MatchHistory, Pair};

/// Undirected graph joining every two pool candidates who have never been
/// matched with each other. Built fresh for each round and never persisted.
#[derive(Debug, Clone)]
pub struct PairingGraph {
    candidates: Vec<CandidateId>,
    graph: BlossomGraph,
}

impl PairingGraph {
    /// Build the eligibility graph for `candidates` given their `history`.
    ///
    /// Vertices follow the candidates' lexicographic order so the solver sees
    /// the same graph for the same inputs.
    pub fn build(candidates: &BTreeSet<CandidateId>, history: &MatchHistory) -> Self {
        let candidates = candidates.iter().cloned().collect::<Vec<_>>();
        let graph = BlossomGraph::from_predicate(candidates.len(), |u, v| {
            !history.has_matched(&candidates[u], &candidates[v])
        });
        Self { candidates, graph }
    }

    /// Candidates in vertex order.
    pub fn candidates(&self) -> &[CandidateId] {
        &self.candidates
    }

    /// Number of eligible pairings.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Solve for a maximum set of eligible pairs, sorted ascending.
    pub fn solve(&self) -> Vec<Pair> {
        self.graph
            .maximum_matching()
            .into_iter()
            .map(|(u, v)| Pair::from_sorted(self.candidates[u].clone(), self.candidates[v].clone()))
            .collect()
    }
}
