use std::ops::{AddAssign, Sub};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenwickError {
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, FenwickError>;

/// Binary indexed tree over prefix sums.
///
/// `tree[i]` (1-based) holds the sum of `values[i - lsb(i) .. i]`.
#[derive(Debug, Clone)]
pub struct Fenwick<T> {
    values: Vec<T>,
    tree: Vec<T>,
}

#[inline]
fn lsb(i: usize) -> usize {
    i & i.wrapping_neg()
}

impl<T: Copy + Default + AddAssign + Sub<Output = T>> Fenwick<T> {
    /// `len` zeros.
    pub fn new(len: usize) -> Self {
        Self {
            values: vec![T::default(); len],
            tree: vec![T::default(); len + 1],
        }
    }

    /// O(n) construction by pushing each node into its parent.
    pub fn from_slice(a: &[T]) -> Self {
        let n = a.len();
        let mut tree = vec![T::default(); n + 1];
        tree[1..].copy_from_slice(a);
        for i in 1..=n {
            let parent = i + lsb(i);
            if parent <= n {
                let x = tree[i];
                tree[parent] += x;
            }
        }
        Self {
            values: a.to_vec(),
            tree,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn check(&self, index: usize) -> Result<()> {
        if index >= self.len() {
            return Err(FenwickError::OutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<T> {
        self.check(index)?;
        Ok(self.values[index])
    }

    /// `values[index] += delta`.
    pub fn add(&mut self, index: usize, delta: T) -> Result<()> {
        self.check(index)?;
        self.values[index] += delta;
        let mut i = index + 1;
        while i <= self.len() {
            self.tree[i] += delta;
            i += lsb(i);
        }
        Ok(())
    }

    /// Sum of `values[0..=index]`.
    pub fn prefix_sum(&self, index: usize) -> Result<T> {
        self.check(index)?;
        let mut sum = T::default();
        let mut i = index + 1;
        while i > 0 {
            sum += self.tree[i];
            i -= lsb(i);
        }
        Ok(sum)
    }

    /// Sum of `values[a..=b]`. The bounds may be given in either order.
    pub fn range_sum(&self, a: usize, b: usize) -> Result<T> {
        let (a, b) = (a.min(b), a.max(b));
        let hi = self.prefix_sum(b)?;
        if a == 0 {
            return Ok(hi);
        }
        Ok(hi - self.prefix_sum(a - 1)?)
    }
}
