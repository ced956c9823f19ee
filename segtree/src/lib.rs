use std::ops::Add;

use log::debug;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SegTreeError {
    #[error("cannot build a segment tree over an empty sequence")]
    EmptyInput,
    #[error("invalid interval [{start}, {end}]: start is past end")]
    InvalidInterval { start: usize, end: usize },
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("eager query after a range update; use lazy_query")]
    StaleQuery,
}

pub type Result<T> = std::result::Result<T, SegTreeError>;

/// Values that can be summed and lazily range-incremented.
///
/// `scale` must distribute over addition: adding `d` to each of `len` elements
/// adds `d.scale(len)` to their sum.
///
/// Only types of at least 32 bits implement it: `scale` converts `len` with `as`, and
/// narrower integers would truncate any node longer than their maximum.
pub trait Element: Copy + PartialEq + Add<Output = Self> {
    const ZERO: Self;
    fn scale(self, len: usize) -> Self;
}

macro_rules! impl_element {
    ($($t:ty),*) => {$(
        impl Element for $t {
            const ZERO: Self = 0 as $t;
            #[inline]
            fn scale(self, len: usize) -> Self {
                self * len as $t
            }
        }
    )*};
}

impl_element!(i32, i64, i128, isize, u32, u64, u128, usize, f32, f64);

/// The aggregate over [low, high].
#[derive(Debug, Clone, Copy)]
struct Node<T> {
    low: usize,
    high: usize,
    /// Sum over [low, high], including `pending`.
    value: T,
    /// Delta already in `value` but not yet pushed to the children.
    pending: T,
}

impl<T: Element> Node<T> {
    fn len(&self) -> usize {
        self.high - self.low + 1
    }
    fn is_leaf(&self) -> bool {
        self.low == self.high
    }
    fn mid(&self) -> usize {
        (self.low + self.high) / 2
    }
}

#[inline]
fn children(index: usize) -> (usize, usize) {
    (2 * index + 1, 2 * index + 2)
}

/// Segment tree over sums with lazy range add.
///
/// Nodes live in a flat array: node `i` has children `2i+1` and `2i+2`.
/// `query` only reads the eager structure and refuses to answer once a range
/// update has been issued; `lazy_query` is always correct.
#[derive(Debug, Clone)]
pub struct LazySegmentTree<T> {
    nodes: Vec<Node<T>>,
    /// The number of elements.
    n: usize,
    /// Set by the first `range_update`.
    lazy: bool,
}

impl<T: Element> LazySegmentTree<T> {
    pub fn new(a: &[T]) -> Result<Self> {
        if a.is_empty() {
            return Err(SegTreeError::EmptyInput);
        }
        let n = a.len();
        let empty = Node {
            low: 0,
            high: 0,
            value: T::ZERO,
            pending: T::ZERO,
        };
        let mut tree = Self {
            nodes: vec![empty; 2 * n.next_power_of_two()],
            n,
            lazy: false,
        };
        tree.build(0, 0, n - 1, a);
        debug!("segment tree: n={n} slots={}", tree.nodes.len());
        Ok(tree)
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Whether a range update has been issued, so that only `lazy_query` may be used.
    pub fn has_pending(&self) -> bool {
        self.lazy
    }

    /// Overwrite the value at `index`.
    pub fn update(&mut self, index: usize, value: T) -> Result<()> {
        if index >= self.n {
            return Err(SegTreeError::OutOfRange { index, len: self.n });
        }
        self.update_node(0, index, value);
        Ok(())
    }

    /// Sum of [start, end] from the eager structure.
    pub fn query(&self, start: usize, end: usize) -> Result<T> {
        self.check(start, end)?;
        if self.lazy {
            return Err(SegTreeError::StaleQuery);
        }
        Ok(self.query_node(0, start, end))
    }

    /// Add `delta` to every element of [start, end].
    pub fn range_update(&mut self, start: usize, end: usize, delta: T) -> Result<()> {
        self.check(start, end)?;
        self.lazy = true;
        self.range_update_node(0, start, end, delta);
        Ok(())
    }

    /// Sum of [start, end], resolving pending updates along the way.
    pub fn lazy_query(&mut self, start: usize, end: usize) -> Result<T> {
        self.check(start, end)?;
        Ok(self.lazy_query_node(0, start, end))
    }

    /// The current value at `index`.
    pub fn get(&mut self, index: usize) -> Result<T> {
        if index >= self.n {
            return Err(SegTreeError::OutOfRange { index, len: self.n });
        }
        Ok(self.lazy_query_node(0, index, index))
    }

    fn check(&self, start: usize, end: usize) -> Result<()> {
        if start > end {
            return Err(SegTreeError::InvalidInterval { start, end });
        }
        if end >= self.n {
            return Err(SegTreeError::OutOfRange {
                index: end,
                len: self.n,
            });
        }
        Ok(())
    }

    fn build(&mut self, index: usize, low: usize, high: usize, a: &[T]) {
        let value = if low == high {
            a[low]
        } else {
            let mid = (low + high) / 2;
            let (l, r) = children(index);
            self.build(l, low, mid, a);
            self.build(r, mid + 1, high, a);
            self.nodes[l].value + self.nodes[r].value
        };
        self.nodes[index] = Node {
            low,
            high,
            value,
            pending: T::ZERO,
        };
    }

    /// Recompute a node from its children.
    fn pull(&mut self, index: usize) {
        let (l, r) = children(index);
        self.nodes[index].value = self.nodes[l].value + self.nodes[r].value;
    }

    /// Add `delta` to every element under `index` without descending.
    fn apply(&mut self, index: usize, delta: T) {
        let node = &mut self.nodes[index];
        node.value = node.value + delta.scale(node.len());
        if !node.is_leaf() {
            node.pending = node.pending + delta;
        }
    }

    /// Hand the pending delta of `index` down to its children.
    fn push(&mut self, index: usize) {
        let pending = self.nodes[index].pending;
        if pending == T::ZERO {
            return;
        }
        debug_assert!(!self.nodes[index].is_leaf());
        self.nodes[index].pending = T::ZERO;
        let (l, r) = children(index);
        self.apply(l, pending);
        self.apply(r, pending);
    }

    fn update_node(&mut self, index: usize, pos: usize, value: T) {
        self.push(index);
        let node = self.nodes[index];
        if node.is_leaf() {
            self.nodes[index].value = value;
            return;
        }
        let (l, r) = children(index);
        if pos <= node.mid() {
            self.update_node(l, pos, value);
        } else {
            self.update_node(r, pos, value);
        }
        self.pull(index);
    }

    /// `[start, end]` is always contained in the node's range.
    fn query_node(&self, index: usize, start: usize, end: usize) -> T {
        let node = &self.nodes[index];
        if start == node.low && end == node.high {
            return node.value;
        }
        let mid = node.mid();
        let (l, r) = children(index);
        if start > mid {
            return self.query_node(r, start, end);
        }
        if end <= mid {
            return self.query_node(l, start, end);
        }
        self.query_node(l, start, mid) + self.query_node(r, mid + 1, end)
    }

    fn range_update_node(&mut self, index: usize, start: usize, end: usize, delta: T) {
        self.push(index);
        let node = self.nodes[index];
        if start <= node.low && node.high <= end {
            self.apply(index, delta);
            return;
        }
        let mid = node.mid();
        let (l, r) = children(index);
        if start <= mid {
            self.range_update_node(l, start, end, delta);
        }
        if end > mid {
            self.range_update_node(r, start, end, delta);
        }
        self.pull(index);
    }

    fn lazy_query_node(&mut self, index: usize, start: usize, end: usize) -> T {
        self.push(index);
        let node = self.nodes[index];
        if start <= node.low && node.high <= end {
            return node.value;
        }
        let mid = node.mid();
        let (l, r) = children(index);
        if start > mid {
            return self.lazy_query_node(r, start, end);
        }
        if end <= mid {
            return self.lazy_query_node(l, start, end);
        }
        self.lazy_query_node(l, start, end) + self.lazy_query_node(r, start, end)
    }
}
