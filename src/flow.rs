//! Split-vertex max-flow / min-cut graph, solved with Dinic's algorithm
//! (spec.md §4.2).
//!
//! Every tile becomes two vertices, `TOP` and `BOT`, joined by a
//! capacity-1 edge; cutting that edge is what "placing a rampart on this
//! tile" means in flow terms. This module only knows about vertex ids and
//! edges — `mincut.rs` is the layer that knows tiles map to vertices this
//! way.

use std::collections::VecDeque;

/// A directed edge in the residual graph. `rev` is the index, within
/// `edges[to]`, of this edge's reverse partner -- `edges[e.to][e.rev]` is
/// always the edge going the other way.
#[derive(Clone, Copy, Debug)]
pub struct Edge {
    pub to: usize,
    pub rev: usize,
    pub cap: i64,
    pub flow: i64,
}

impl Edge {
    #[inline]
    pub fn residual(&self) -> i64 {
        self.cap - self.flow
    }
}

/// A directed graph over `usize` vertex ids, built for Dinic's algorithm.
pub struct FlowGraph {
    edges: Vec<Vec<Edge>>,
    level: Vec<i32>,
    iter: Vec<usize>,
}

impl FlowGraph {
    pub fn new(num_vertices: usize) -> Self {
        FlowGraph {
            edges: vec![Vec::new(); num_vertices],
            level: vec![-1; num_vertices],
            iter: vec![0; num_vertices],
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.edges.len()
    }

    /// Append a forward edge `u -> v` with capacity `cap`, plus its
    /// capacity-0 reverse partner `v -> u`.
    pub fn add_edge(&mut self, u: usize, v: usize, cap: i64) {
        let rev_u = self.edges[v].len();
        let rev_v = self.edges[u].len();
        self.edges[u].push(Edge {
            to: v,
            rev: rev_u,
            cap,
            flow: 0,
        });
        self.edges[v].push(Edge {
            to: u,
            rev: rev_v,
            cap: 0,
            flow: 0,
        });
    }

    pub fn edges_from(&self, u: usize) -> &[Edge] {
        &self.edges[u]
    }

    /// BFS layering pass. Resets `level`, returns whether `t` is reachable
    /// from `s` over edges with spare residual capacity.
    fn bfs(&mut self, s: usize, t: usize) -> bool {
        self.level.iter_mut().for_each(|l| *l = -1);
        let mut queue = VecDeque::new();
        self.level[s] = 0;
        queue.push_back(s);

        while let Some(u) = queue.pop_front() {
            for e in &self.edges[u] {
                if e.residual() > 0 && self.level[e.to] == -1 {
                    self.level[e.to] = self.level[u] + 1;
                    queue.push_back(e.to);
                }
            }
        }

        self.level[t] >= 0
    }

    /// DFS augmenting pass, iterative (not recursive, so a pathological
    /// graph can't blow the call stack) but preserving the per-vertex
    /// `iter[u]` cursor semantics spec.md §4.2 describes: each vertex
    /// resumes from where it left off rather than restarting its edge
    /// scan, giving the standard O(V*E) per-phase bound.
    fn dfs(&mut self, s: usize, t: usize, limit: i64) -> i64 {
        // Explicit path stack of (vertex, edge-index-at-that-vertex).
        let mut path: Vec<usize> = vec![s];

        loop {
            let u = *path.last().unwrap();
            if u == t {
                // Found an augmenting path; compute its bottleneck and
                // push flow back along every edge on `path`.
                let mut bottleneck = limit;
                for w in path.windows(2) {
                    let (from, to) = (w[0], w[1]);
                    let idx = self.find_forward_edge(from, to);
                    bottleneck = bottleneck.min(self.edges[from][idx].residual());
                }
                for w in path.windows(2) {
                    let (from, to) = (w[0], w[1]);
                    let idx = self.find_forward_edge(from, to);
                    self.edges[from][idx].flow += bottleneck;
                    let rev = self.edges[from][idx].rev;
                    self.edges[to][rev].flow -= bottleneck;
                }
                return bottleneck;
            }

            // Advance `u`'s cursor until an edge on the layered graph with
            // spare capacity is found, or its edges are exhausted.
            let mut advanced = false;
            while self.iter[u] < self.edges[u].len() {
                let e = self.edges[u][self.iter[u]];
                if e.residual() > 0 && self.level[e.to] == self.level[u] + 1 {
                    path.push(e.to);
                    advanced = true;
                    break;
                }
                self.iter[u] += 1;
            }

            if advanced {
                continue;
            }

            // Dead end: this vertex contributes no more augmenting paths
            // in this phase. Pop it and have its parent advance its own
            // cursor past the edge that led here.
            path.pop();
            self.level[u] = -1;
            match path.last() {
                Some(&parent) => {
                    self.iter[parent] += 1;
                }
                None => return 0,
            }
        }
    }

    /// Find the index, within `edges[from]`, of the forward edge currently
    /// carrying the augmenting path to `to`. The cursor-advance rule in
    /// `dfs` guarantees the edge used to reach `to` is exactly the one the
    /// parent's cursor currently points at, but after a path is found we
    /// re-derive it by index rather than keep extra bookkeeping.
    fn find_forward_edge(&self, from: usize, to: usize) -> usize {
        self.edges[from]
            .iter()
            .position(|e| e.to == to && e.residual() > 0)
            .expect("augmenting path edge must still have residual capacity")
    }

    /// Dinic's algorithm. Returns -1 if `s == t` (spec.md §7).
    pub fn max_flow(&mut self, s: usize, t: usize) -> i64 {
        if s == t {
            return -1;
        }

        let mut total = 0i64;
        while self.bfs(s, t) {
            self.iter.iter_mut().for_each(|i| *i = 0);
            loop {
                let pushed = self.dfs(s, t, i64::MAX);
                if pushed == 0 {
                    break;
                }
                total += pushed;
            }
        }
        total
    }

    /// Enumerate vertices on the source side of a minimum `s`-`t` cut,
    /// after `max_flow` has already been run. spec.md §4.2: BFS from `s`
    /// over residual edges; every saturated forward edge whose destination
    /// was *not* reached is on the min cut.
    pub fn cut_edges(&self, s: usize) -> Vec<(usize, usize)> {
        let mut reached = vec![false; self.edges.len()];
        reached[s] = true;
        let mut queue = VecDeque::new();
        queue.push_back(s);

        while let Some(u) = queue.pop_front() {
            for e in &self.edges[u] {
                if e.residual() > 0 && !reached[e.to] {
                    reached[e.to] = true;
                    queue.push_back(e.to);
                }
            }
        }

        let mut cut = Vec::new();
        for (u, out) in self.edges.iter().enumerate() {
            if !reached[u] {
                continue;
            }
            for e in out {
                if e.cap > 0 && e.flow == e.cap && !reached[e.to] {
                    cut.push((u, e.to));
                }
            }
        }
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_source_equals_sink() {
        let mut g = FlowGraph::new(3);
        g.add_edge(0, 1, 1);
        assert_eq!(g.max_flow(0, 0), -1);
    }

    #[test]
    fn single_unit_edge_chain() {
        let mut g = FlowGraph::new(4);
        g.add_edge(0, 1, 1);
        g.add_edge(1, 2, 1);
        g.add_edge(2, 3, 1);
        assert_eq!(g.max_flow(0, 3), 1);
    }

    #[test]
    fn parallel_paths_sum_capacity() {
        let mut g = FlowGraph::new(4);
        g.add_edge(0, 1, 1);
        g.add_edge(0, 2, 1);
        g.add_edge(1, 3, 1);
        g.add_edge(2, 3, 1);
        assert_eq!(g.max_flow(0, 3), 2);
    }

    #[test]
    fn max_flow_equals_min_cut_cardinality() {
        // Diamond graph with a bottleneck of capacity 1 in the middle.
        let mut g = FlowGraph::new(4);
        g.add_edge(0, 1, 5);
        g.add_edge(1, 2, 1);
        g.add_edge(2, 3, 5);
        let flow = g.max_flow(0, 3);
        assert_eq!(flow, 1);
        let cut = g.cut_edges(0);
        assert_eq!(cut.len() as i64, flow);
    }

    #[test]
    fn cut_is_empty_when_no_path_exists() {
        let mut g = FlowGraph::new(3);
        g.add_edge(0, 1, 4);
        // No edge from 1 (or 0) to 2: sink is unreachable.
        assert_eq!(g.max_flow(0, 2), 0);
    }
}
