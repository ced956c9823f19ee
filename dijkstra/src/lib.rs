use std::hash::Hash;

use fxhash::FxHashMap;
use heap::{Heap, HeapError};
use log::debug;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DijkstraError {
    #[error("source node is not in the graph")]
    UnknownNode,
    #[error("path weight overflows u64")]
    Overflow,
    #[error(transparent)]
    Heap(#[from] HeapError),
}

pub type Result<T> = std::result::Result<T, DijkstraError>;

pub type Weight = u64;

/// Directed graph with non-negative edge weights.
#[derive(Debug, Clone)]
pub struct Graph<N> {
    /// Outgoing `(target, weight)` edges of every node.
    adj: FxHashMap<N, Vec<(N, Weight)>>,
}

impl<N: Copy + Ord + Hash> Default for Graph<N> {
    fn default() -> Self {
        Self {
            adj: FxHashMap::default(),
        }
    }
}

impl<N: Copy + Ord + Hash> Graph<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: N) {
        self.adj.entry(node).or_default();
    }

    pub fn add_edge(&mut self, from: N, to: N, weight: Weight) {
        self.adj.entry(from).or_default().push((to, weight));
        self.add_node(to);
    }

    pub fn node_count(&self) -> usize {
        self.adj.len()
    }

    pub fn contains(&self, node: N) -> bool {
        self.adj.contains_key(&node)
    }

    /// Single-source shortest paths.
    ///
    /// The queue holds one `(distance, node)` entry per discovered, unsettled node,
    /// and improving a distance lowers that entry in place.
    pub fn shortest_paths(&self, source: N) -> Result<ShortestPaths<N>> {
        if !self.contains(source) {
            return Err(DijkstraError::UnknownNode);
        }
        let mut dist: FxHashMap<N, Weight> = FxHashMap::default();
        let mut prev = FxHashMap::default();
        dist.insert(source, 0);
        let mut queue: Heap<(Weight, N)> = Heap::new();
        queue.push((0, source))?;

        while let Some((d, u)) = queue.pop() {
            for &(v, w) in self.adj.get(&u).into_iter().flatten() {
                let nd = d.checked_add(w).ok_or(DijkstraError::Overflow)?;
                match dist.get(&v) {
                    Some(&old) if old <= nd => continue,
                    // Settled nodes never improve, so `v` is still queued.
                    Some(&old) => queue.decrease_key(&(old, v), (nd, v))?,
                    None => queue.push((nd, v))?,
                }
                dist.insert(v, nd);
                prev.insert(v, u);
            }
        }
        debug!("dijkstra: reached {} of {} nodes", dist.len(), self.node_count());

        Ok(ShortestPaths { source, dist, prev })
    }
}

/// Distances and a shortest-path tree from one source.
#[derive(Debug, Clone)]
pub struct ShortestPaths<N> {
    source: N,
    dist: FxHashMap<N, Weight>,
    /// Predecessor on a shortest path, for every reached node except the source.
    prev: FxHashMap<N, N>,
}

impl<N: Copy + Eq + Hash> ShortestPaths<N> {
    pub fn source(&self) -> N {
        self.source
    }

    /// `None` when `node` is unreachable.
    pub fn distance(&self, node: N) -> Option<Weight> {
        self.dist.get(&node).copied()
    }

    /// Nodes on a shortest path from the source to `node`, both included.
    pub fn path(&self, node: N) -> Option<Vec<N>> {
        if !self.dist.contains_key(&node) {
            return None;
        }
        let mut path = vec![node];
        let mut cur = node;
        while let Some(&p) = self.prev.get(&cur) {
            path.push(p);
            cur = p;
        }
        path.reverse();
        Some(path)
    }

    pub fn reachable(&self) -> usize {
        self.dist.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;
    use itertools::Itertools;
    use rand::Rng;

    #[test]
    fn small() {
        let mut g = Graph::new();
        for (u, v, w) in [(0, 1, 4), (0, 2, 1), (2, 1, 2), (1, 3, 1), (2, 3, 5)] {
            g.add_edge(u, v, w);
        }
        g.add_node(9);
        let sp = g.shortest_paths(0).unwrap();
        assert!(sp.distance(0) == Some(0));
        assert!(sp.distance(1) == Some(3));
        assert!(sp.distance(3) == Some(4));
        assert!(sp.distance(9) == None);
        assert!(sp.path(3) == Some(vec![0, 2, 1, 3]));
        assert!(sp.path(0) == Some(vec![0]));
        assert!(sp.path(9) == None);
        assert!(sp.reachable() == 4);
    }

    /// All-pairs distances by Floyd–Warshall over the cheapest parallel edge.
    fn naive(n: usize, edges: &[(usize, usize, Weight)]) -> Vec<Vec<Option<Weight>>> {
        let mut d = vec![vec![None; n]; n];
        for (i, row) in d.iter_mut().enumerate() {
            row[i] = Some(0);
        }
        for &(u, v, w) in edges {
            d[u][v] = Some(d[u][v].map_or(w, |x: Weight| x.min(w)));
        }
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    if let (Some(a), Some(b)) = (d[i][k], d[k][j]) {
                        if d[i][j].map_or(true, |x| a + b < x) {
                            d[i][j] = Some(a + b);
                        }
                    }
                }
            }
        }
        d
    }

    #[test]
    fn random_against_naive() {
        let mut rng = rand::thread_rng();
        for n in (1..10).chain([30, 60]) {
            let m = rng.gen_range(0..=3 * n);
            let edges = (0..m)
                .map(|_| (rng.gen_range(0..n), rng.gen_range(0..n), rng.gen_range(0..20)))
                .collect::<Vec<_>>();
            let mut g = Graph::new();
            for i in 0..n {
                g.add_node(i);
            }
            for &(u, v, w) in &edges {
                g.add_edge(u, v, w);
            }
            let real = naive(n, &edges);
            let mut cheapest = vec![vec![None; n]; n];
            for &(u, v, w) in &edges {
                cheapest[u][v] = Some(w.min(cheapest[u][v].unwrap_or(w)));
            }
            for s in 0..n {
                let sp = g.shortest_paths(s).unwrap();
                for t in 0..n {
                    assert!(sp.distance(t) == real[s][t], "n={n} s={s} t={t}");
                    let Some(path) = sp.path(t) else { continue };
                    assert!(path.first() == Some(&s) && path.last() == Some(&t));
                    // Every hop is an edge, and the cheapest edges add up to the distance.
                    let weight: Weight = path
                        .iter()
                        .tuple_windows()
                        .map(|(&a, &b)| cheapest[a][b].unwrap())
                        .sum();
                    assert!(Some(weight) == real[s][t]);
                }
            }
        }
    }

    #[test]
    fn errors() {
        let mut g = Graph::new();
        g.add_edge('a', 'b', Weight::MAX);
        g.add_edge('b', 'c', 1);
        assert!(g.shortest_paths('z').unwrap_err() == DijkstraError::UnknownNode);
        assert!(g.shortest_paths('a').unwrap_err() == DijkstraError::Overflow);
        assert!(g.shortest_paths('b').unwrap().distance('c') == Some(1));
    }
}
