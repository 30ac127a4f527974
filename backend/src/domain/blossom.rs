//! Maximum-cardinality matching in general graphs (Edmonds' blossom algorithm).
//!
//! Vertices are dense indices `0..n`. The solver repeatedly grows an
//! alternating tree from each exposed vertex, contracting odd cycles
//! (blossoms) into their base, until no augmenting path remains. The result
//! is a maximum matching; which maximum matching is returned depends only on
//! vertex numbering and edge insertion order, so equal inputs always produce
//! equal outputs.

use std::collections::VecDeque;

/// Errors raised while building a [`BlossomGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EdgeError {
    /// Edge endpoint does not name a vertex.
    #[error("vertex {vertex} is out of range for a graph of {vertex_count} vertices")]
    OutOfRange { vertex: usize, vertex_count: usize },
    /// Edge would connect a vertex to itself.
    #[error("self-loop on vertex {0} is not allowed")]
    SelfLoop(usize),
}

/// Undirected simple graph over dense vertex indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlossomGraph {
    adjacency: Vec<Vec<usize>>,
}

impl BlossomGraph {
    /// Create a graph with `vertex_count` isolated vertices.
    pub fn with_vertices(vertex_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertex_count],
        }
    }

    /// Create a graph connecting every `u < v` for which `connected(u, v)`
    /// holds. Edges are inserted in ascending `(u, v)` order.
    pub fn from_predicate(
        vertex_count: usize,
        mut connected: impl FnMut(usize, usize) -> bool,
    ) -> Self {
        let mut graph = Self::with_vertices(vertex_count);
        for u in 0..vertex_count {
            for v in (u + 1)..vertex_count {
                if connected(u, v) {
                    graph.adjacency[u].push(v);
                    graph.adjacency[v].push(u);
                }
            }
        }
        graph
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Return whether `u` and `v` are adjacent.
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adjacency
            .get(u)
            .is_some_and(|neighbours| neighbours.contains(&v))
    }

    /// Connect `u` and `v`. Adding an existing edge again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError`] for self-loops and unknown vertices.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<(), EdgeError> {
        let vertex_count = self.vertex_count();
        for vertex in [u, v] {
            if vertex >= vertex_count {
                return Err(EdgeError::OutOfRange {
                    vertex,
                    vertex_count,
                });
            }
        }
        if u == v {
            return Err(EdgeError::SelfLoop(u));
        }
        if !self.has_edge(u, v) {
            self.adjacency[u].push(v);
            self.adjacency[v].push(u);
        }
        Ok(())
    }

    /// Compute a maximum-cardinality matching.
    ///
    /// Pairs are returned as `(low, high)` index tuples sorted ascending.
    ///
    /// # Examples
    /// ```
    /// use guild_matcher::domain::BlossomGraph;
    ///
    /// // A 5-cycle with a pendant vertex: only a blossom-aware search finds
    /// // the perfect matching.
    /// let mut graph = BlossomGraph::with_vertices(6);
    /// for (u, v) in [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (4, 5)] {
    ///     graph.add_edge(u, v).expect("valid edge");
    /// }
    /// assert_eq!(graph.maximum_matching().len(), 3);
    /// ```
    pub fn maximum_matching(&self) -> Vec<(usize, usize)> {
        let mut solver = Solver::new(&self.adjacency);
        solver.run();
        solver.pairs()
    }
}

/// Working state for one solve; reused across augmentation phases.
struct Solver<'g> {
    adjacency: &'g [Vec<usize>],
    mate: Vec<Option<usize>>,
    parent: Vec<Option<usize>>,
    base: Vec<usize>,
    in_tree: Vec<bool>,
    in_blossom: Vec<bool>,
    queue: VecDeque<usize>,
}

impl<'g> Solver<'g> {
    fn new(adjacency: &'g [Vec<usize>]) -> Self {
        let n = adjacency.len();
        Self {
            adjacency,
            mate: vec![None; n],
            parent: vec![None; n],
            base: (0..n).collect(),
            in_tree: vec![false; n],
            in_blossom: vec![false; n],
            queue: VecDeque::with_capacity(n),
        }
    }

    fn run(&mut self) {
        for root in 0..self.adjacency.len() {
            if self.mate[root].is_some() {
                continue;
            }
            if let Some(end) = self.find_augmenting_path(root) {
                self.augment(end);
            }
        }
    }

    fn pairs(&self) -> Vec<(usize, usize)> {
        self.mate
            .iter()
            .enumerate()
            .filter_map(|(v, mate)| mate.filter(|&m| v < m).map(|m| (v, m)))
            .collect()
    }

    /// Breadth-first search for an exposed vertex reachable from `root` by an
    /// alternating path. Returns the far end of the path.
    fn find_augmenting_path(&mut self, root: usize) -> Option<usize> {
        let adjacency = self.adjacency;
        self.in_tree.fill(false);
        self.parent.fill(None);
        for (vertex, base) in self.base.iter_mut().enumerate() {
            *base = vertex;
        }
        self.queue.clear();
        self.in_tree[root] = true;
        self.queue.push_back(root);

        while let Some(v) = self.queue.pop_front() {
            for &to in &adjacency[v] {
                if self.base[v] == self.base[to] || self.mate[v] == Some(to) {
                    continue;
                }
                let to_is_outer =
                    to == root || self.mate[to].is_some_and(|m| self.parent[m].is_some());
                if to_is_outer {
                    self.contract(v, to);
                } else if self.parent[to].is_none() {
                    self.parent[to] = Some(v);
                    match self.mate[to] {
                        None => return Some(to),
                        Some(m) => {
                            self.in_tree[m] = true;
                            self.queue.push_back(m);
                        }
                    }
                }
            }
        }
        None
    }

    /// Shrink the odd cycle closed by edge `(v, to)` into its base.
    fn contract(&mut self, v: usize, to: usize) {
        let blossom_base = self.lowest_common_base(v, to);
        self.in_blossom.fill(false);
        self.mark_path(v, blossom_base, to);
        self.mark_path(to, blossom_base, v);

        for vertex in 0..self.base.len() {
            if self.in_blossom[self.base[vertex]] {
                self.base[vertex] = blossom_base;
                if !self.in_tree[vertex] {
                    self.in_tree[vertex] = true;
                    self.queue.push_back(vertex);
                }
            }
        }
    }

    fn lowest_common_base(&self, a: usize, b: usize) -> usize {
        let mut seen = vec![false; self.base.len()];
        let mut a = a;
        loop {
            a = self.base[a];
            seen[a] = true;
            match self.mate[a].and_then(|m| self.parent[m]) {
                Some(next) => a = next,
                None => break,
            }
        }

        let mut b = b;
        loop {
            b = self.base[b];
            if seen[b] {
                return b;
            }
            match self.mate[b].and_then(|m| self.parent[m]) {
                Some(next) => b = next,
                None => return b,
            }
        }
    }

    /// Walk from `v` up to the blossom base, flagging blossom members and
    /// re-pointing parents so paths through the blossom stay alternating.
    fn mark_path(&mut self, v: usize, blossom_base: usize, child: usize) {
        let mut v = v;
        let mut child = child;
        while self.base[v] != blossom_base {
            let Some(m) = self.mate[v] else { break };
            self.in_blossom[self.base[v]] = true;
            self.in_blossom[self.base[m]] = true;
            self.parent[v] = Some(child);
            child = m;
            let Some(next) = self.parent[m] else { break };
            v = next;
        }
    }

    /// Flip matched and unmatched edges along the path ending at `end`.
    fn augment(&mut self, end: usize) {
        let mut cursor = Some(end);
        while let Some(v) = cursor {
            let Some(pv) = self.parent[v] else { break };
            let next = self.mate[pv];
            self.mate[v] = Some(pv);
            self.mate[pv] = Some(v);
            cursor = next;
        }
    }
}
