use std::hash::Hash;

use fxhash::FxHashMap;
use log::debug;
use rmq::{Rmq, RmqError, SparseTable};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LcaError {
    #[error("the solver has not been initialized")]
    NotInitialized,
    #[error("the solver was already initialized")]
    AlreadyInitialized,
    #[error("node is not reachable from the root")]
    UnknownNode,
    #[error("a node was reached twice; the edges do not form a tree")]
    NotATree,
    #[error(transparent)]
    Rmq(#[from] RmqError),
}

pub type Result<T> = std::result::Result<T, LcaError>;

/// Euler tour of the tree, built once by `initialize`.
#[derive(Debug, Clone)]
struct Tour<N, R> {
    /// Every node, each time it is entered or returned to.
    walk: Vec<N>,
    /// Depth of `walk[i]` below the root.
    depths: Vec<usize>,
    /// First position of each node in `walk`.
    first: FxHashMap<N, usize>,
    rmq: R,
}

/// Lowest common ancestor by reduction to a range minimum over Euler-tour depths.
///
/// O(n lg n) preprocessing with the default `SparseTable`, O(n) with `MaskRmq`.
/// Queries are O(1).
#[derive(Debug, Clone)]
pub struct LcaSolver<N, R = SparseTable<usize>> {
    /// Ordered children of each node.
    children: FxHashMap<N, Vec<N>>,
    tour: Option<Tour<N, R>>,
}

impl<N: Copy + Eq + Hash, R: Rmq<usize>> Default for LcaSolver<N, R> {
    fn default() -> Self {
        Self {
            children: FxHashMap::default(),
            tour: None,
        }
    }
}

impl<N: Copy + Eq + Hash, R: Rmq<usize>> LcaSolver<N, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a solver from `(parent, child)` pairs. Children keep the order of the edges.
    pub fn from_edges(edges: impl IntoIterator<Item = (N, N)>) -> Self {
        let mut solver = Self::new();
        for (parent, child) in edges {
            solver.children.entry(parent).or_default().push(child);
        }
        solver
    }

    pub fn add_edge(&mut self, parent: N, child: N) -> Result<()> {
        if self.tour.is_some() {
            return Err(LcaError::AlreadyInitialized);
        }
        self.children.entry(parent).or_default().push(child);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.tour.is_some()
    }

    /// Walk the tree from `root` and preprocess the depths.
    /// Call once, after all edges are added.
    pub fn initialize(&mut self, root: N) -> Result<()> {
        if self.tour.is_some() {
            return Err(LcaError::AlreadyInitialized);
        }
        let mut walk = vec![root];
        let mut depths = vec![0];
        let mut first = FxHashMap::default();
        first.insert(root, 0);

        // (node, depth, index of the next child to enter)
        let mut stack = vec![(root, 0, 0)];
        while let Some(top) = stack.last_mut() {
            let (node, depth, next) = *top;
            match self.children.get(&node).and_then(|c| c.get(next)) {
                Some(&child) => {
                    top.2 += 1;
                    if first.insert(child, walk.len()).is_some() {
                        return Err(LcaError::NotATree);
                    }
                    walk.push(child);
                    depths.push(depth + 1);
                    stack.push((child, depth + 1, 0));
                }
                None => {
                    stack.pop();
                    if let Some(&(parent, depth, _)) = stack.last() {
                        walk.push(parent);
                        depths.push(depth);
                    }
                }
            }
        }

        let rmq = R::new(&depths)?;
        debug!("lca: {} nodes, walk of length {}", first.len(), walk.len());
        self.tour = Some(Tour {
            walk,
            depths,
            first,
            rmq,
        });
        Ok(())
    }

    fn tour(&self) -> Result<&Tour<N, R>> {
        self.tour.as_ref().ok_or(LcaError::NotInitialized)
    }

    fn first(&self, node: N) -> Result<usize> {
        self.tour()?
            .first
            .get(&node)
            .copied()
            .ok_or(LcaError::UnknownNode)
    }

    /// The lowest common ancestor of `a` and `b`.
    pub fn query(&self, a: N, b: N) -> Result<N> {
        let tour = self.tour()?;
        let (fa, fb) = (self.first(a)?, self.first(b)?);
        let pos = tour.rmq.range_min_index(fa.min(fb), fa.max(fb))?;
        Ok(tour.walk[pos])
    }

    /// Number of edges between the root and `node`.
    pub fn depth(&self, node: N) -> Result<usize> {
        Ok(self.tour()?.depths[self.first(node)?])
    }

    /// Number of edges on the path between `a` and `b`.
    pub fn distance(&self, a: N, b: N) -> Result<usize> {
        let lca = self.query(a, b)?;
        Ok(self.depth(a)? + self.depth(b)? - 2 * self.depth(lca)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;
    use itertools::Itertools;
    use rand::Rng;
    use rmq::MaskRmq;

    fn small<R: Rmq<usize>>() -> LcaSolver<u32, R> {
        let mut lca = LcaSolver::new();
        for (p, c) in [(1, 2), (1, 3), (2, 4), (2, 5)] {
            lca.add_edge(p, c).unwrap();
        }
        lca.initialize(1).unwrap();
        lca
    }

    #[test]
    fn small_tree() {
        let lca = small::<SparseTable<usize>>();
        assert!(lca.query(4, 5) == Ok(2));
        assert!(lca.query(4, 3) == Ok(1));
        assert!(lca.query(3, 4) == Ok(1));
        assert!(lca.query(2, 2) == Ok(2));
        assert!(lca.query(2, 5) == Ok(2));
        assert!(lca.depth(5) == Ok(2));
        assert!(lca.distance(4, 3) == Ok(3));
        assert!(lca.distance(1, 1) == Ok(0));
    }

    #[test]
    fn small_tree_mask() {
        let lca = small::<MaskRmq<usize>>();
        assert!(lca.query(4, 5) == Ok(2));
        assert!(lca.query(4, 3) == Ok(1));
        assert!(lca.query(2, 2) == Ok(2));
    }

    #[test]
    fn single_node() {
        let mut lca = LcaSolver::<char>::new();
        lca.initialize('r').unwrap();
        assert!(lca.query('r', 'r') == Ok('r'));
        assert!(lca.depth('r') == Ok(0));
    }

    /// LCA by walking parents upwards.
    fn naive(parent: &[usize], depth: &[usize], mut a: usize, mut b: usize) -> usize {
        while depth[a] > depth[b] {
            a = parent[a];
        }
        while depth[b] > depth[a] {
            b = parent[b];
        }
        while a != b {
            a = parent[a];
            b = parent[b];
        }
        a
    }

    fn test_random<R: Rmq<usize>>() {
        let mut rng = rand::thread_rng();
        for n in (1..10).chain([100, 500]) {
            let mut parent = vec![0; n];
            let mut depth = vec![0; n];
            // Sparse, non-contiguous node ids.
            let id = |i: usize| 7 * i + 3;
            let mut lca = LcaSolver::<usize, R>::new();
            for i in 1..n {
                parent[i] = rng.gen_range(0..i);
                depth[i] = depth[parent[i]] + 1;
                lca.add_edge(id(parent[i]), id(i)).unwrap();
            }
            lca.initialize(id(0)).unwrap();
            for a in 0..n {
                for b in 0..n {
                    let real = naive(&parent, &depth, a, b);
                    assert!(lca.query(id(a), id(b)) == Ok(id(real)), "n={n} a={a} b={b}");
                }
                assert!(lca.depth(id(a)) == Ok(depth[a]));
            }
        }
    }

    #[test]
    fn random_sparse_table() {
        test_random::<SparseTable<usize>>();
    }

    #[test]
    fn random_mask_rmq() {
        test_random::<MaskRmq<usize>>();
    }

    #[test]
    fn deep_path() {
        let n = 100_000;
        let lca = {
            let mut lca = LcaSolver::<usize>::from_edges((0..n).tuple_windows());
            lca.initialize(0).unwrap();
            lca
        };
        assert!(lca.query(n - 1, n / 2) == Ok(n / 2));
        assert!(lca.distance(0, n - 1) == Ok(n - 1));
    }

    #[test]
    fn errors() {
        let mut lca = LcaSolver::<u32>::new();
        lca.add_edge(1, 2).unwrap();
        lca.add_edge(5, 6).unwrap();
        assert!(lca.query(1, 2) == Err(LcaError::NotInitialized));
        assert!(lca.depth(1) == Err(LcaError::NotInitialized));

        lca.initialize(1).unwrap();
        assert!(lca.query(1, 6) == Err(LcaError::UnknownNode));
        assert!(lca.query(9, 2) == Err(LcaError::UnknownNode));
        assert!(lca.initialize(1) == Err(LcaError::AlreadyInitialized));
        assert!(lca.add_edge(2, 3) == Err(LcaError::AlreadyInitialized));

        let mut cycle = LcaSolver::<u32>::from_edges([(1, 2), (2, 3), (3, 1)]);
        assert!(cycle.initialize(1) == Err(LcaError::NotATree));
        assert!(!cycle.is_initialized());

        let mut shared = LcaSolver::<u32>::from_edges([(1, 2), (1, 3), (2, 4), (3, 4)]);
        assert!(shared.initialize(1) == Err(LcaError::NotATree));
    }
}
