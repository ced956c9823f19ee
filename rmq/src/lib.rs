use std::ops::Range;

use itertools::Itertools;
use log::debug;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RmqError {
    #[error("cannot build a range-minimum structure over an empty sequence")]
    EmptyInput,
    #[error("invalid interval [{start}, {end}]: start is past end")]
    InvalidInterval { start: usize, end: usize },
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, RmqError>;

/// Range Minimum Query.
///
/// Queries return the *index* of the minimum, and among equal minima always the leftmost one.
pub trait Rmq<T: Ord> {
    fn new(a: &[T]) -> Result<Self>
    where
        Self: Sized;

    /// The values the structure was built over.
    fn values(&self) -> &[T];

    /// Index of the leftmost minimum of [i, j].
    /// 0-based, both ends inclusive.
    fn range_min_index(&self, i: usize, j: usize) -> Result<usize>;

    fn len(&self) -> usize {
        self.values().len()
    }

    fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    /// Minimum value of [l, r).
    fn min(&self, range: Range<usize>) -> Result<&T> {
        if range.is_empty() {
            return Err(RmqError::InvalidInterval {
                start: range.start,
                end: range.end.wrapping_sub(1),
            });
        }
        let idx = self.range_min_index(range.start, range.end - 1)?;
        Ok(&self.values()[idx])
    }
}

/// Validate an inclusive interval against a sequence of length `len`.
pub fn check_interval(i: usize, j: usize, len: usize) -> Result<()> {
    if i > j {
        return Err(RmqError::InvalidInterval { start: i, end: j });
    }
    if j >= len {
        return Err(RmqError::OutOfRange { index: j, len });
    }
    Ok(())
}

/// Of two candidate indices, the one with the smaller value, preferring `l` on ties.
#[inline]
fn argmin<T: Ord>(a: &[T], l: usize, r: usize) -> usize {
    if a[r] < a[l] {
        r
    } else {
        l
    }
}

/// O(1) query, O(n lg n) words of space.
#[derive(Debug, Clone)]
pub struct SparseTable<T> {
    /// The input values.
    a: Vec<T>,
    /// Packed rows of n indices; row k holds the argmin of a[i..i+2^k].
    table: Vec<usize>,
}

impl<T: Ord + Clone> Rmq<T> for SparseTable<T> {
    fn new(a: &[T]) -> Result<Self> {
        if a.is_empty() {
            return Err(RmqError::EmptyInput);
        }
        let n = a.len();
        let logn = n.ilog2() as usize;
        let mut table = vec![0; n * (logn + 1)];
        for (i, t) in table[..n].iter_mut().enumerate() {
            *t = i;
        }
        for k in 1..=logn {
            let len = 1 << (k - 1);
            for i in 0..=n - (1 << k) {
                table[k * n + i] = argmin(
                    a,
                    table[(k - 1) * n + i],
                    table[(k - 1) * n + i + len],
                );
            }
        }
        debug!("sparse table: n={n} levels={}", logn + 1);

        Ok(Self { a: a.to_vec(), table })
    }

    fn values(&self) -> &[T] {
        &self.a
    }

    fn range_min_index(&self, i: usize, j: usize) -> Result<usize> {
        let n = self.a.len();
        check_interval(i, j, n)?;
        let k = (j - i + 1).ilog2() as usize;
        Ok(argmin(
            &self.a,
            self.table[k * n + i],
            self.table[k * n + j + 1 - (1 << k)],
        ))
    }
}

/// O(1) query, O(n) words of space.
/// Taken from  https://codeforces.com/blog/entry/78931
#[derive(Debug, Clone)]
pub struct MaskRmq<T> {
    /// The input values.
    a: Vec<T>,
    /// A sparse table on the minima of blocks of size W.
    sparse: SparseTable<T>,
    /// For each block, the position in `a` of its leftmost minimum.
    block_argmin: Vec<usize>,
    /// For a position i, consider a[i..i+W].
    /// The mask at i has bit j set if a[i+j'] > a[i+j] for all j'<j.
    masks: Vec<u64>,
}

type B = u64;
const W: usize = B::BITS as usize;

impl<T: Ord + Clone> MaskRmq<T> {
    /// Leftmost minimum of a[pos..pos+W] restricted to the bits in `bitmask`.
    #[inline]
    fn mask_argmin(&self, pos: usize, bitmask: B) -> usize {
        let mask = self.masks[pos] & bitmask;
        debug_assert!(mask & 1 == 1);
        pos + W - 1 - mask.leading_zeros() as usize
    }
}

impl<T: Ord + Clone> Rmq<T> for MaskRmq<T> {
    fn new(a: &[T]) -> Result<Self> {
        if a.is_empty() {
            return Err(RmqError::EmptyInput);
        }
        let block_argmin: Vec<usize> = a
            .chunks(W)
            .enumerate()
            .map(|(b, block)| b * W + block.iter().position_min().unwrap_or(0))
            .collect();
        let block_mins: Vec<T> = block_argmin.iter().map(|&i| a[i].clone()).collect();
        let sparse = SparseTable::new(&block_mins)?;

        let mut masks = vec![0; a.len()];
        let mut mask: B = 0;
        for (i, x) in a.iter().enumerate().rev() {
            mask <<= 1;
            while mask > 0 {
                // Clear bits of values not smaller than the current one.
                if a[i + mask.trailing_zeros() as usize] >= *x {
                    // Clear the lsb.
                    mask &= mask - 1;
                } else {
                    break;
                }
            }
            mask |= 1;
            masks[i] = mask;
        }
        debug!("mask rmq: n={} blocks={}", a.len(), block_argmin.len());
        Ok(Self {
            a: a.to_vec(),
            sparse,
            block_argmin,
            masks,
        })
    }

    fn values(&self) -> &[T] {
        &self.a
    }

    fn range_min_index(&self, i: usize, j: usize) -> Result<usize> {
        check_interval(i, j, self.a.len())?;
        let range = i..j + 1;
        if range.len() < W {
            let bitmask = (1u64 << range.len()) - 1;
            return Ok(self.mask_argmin(range.start, bitmask));
        }
        // Candidates in left-to-right order, so that strict comparison keeps the leftmost.
        // head
        let mut best = self.mask_argmin(range.start, B::MAX);

        let blocks = range.start.div_ceil(W)..range.end / W;
        if !blocks.is_empty() {
            let b = self.sparse.range_min_index(blocks.start, blocks.end - 1)?;
            best = argmin(&self.a, best, self.block_argmin[b]);
        }

        // tail
        Ok(argmin(&self.a, best, self.mask_argmin(range.end - W, B::MAX)))
    }
}
