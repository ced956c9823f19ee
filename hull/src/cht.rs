//! Convex hull trick: minimum of a set of lines at non-decreasing query points.
//!
//! Lines must arrive with non-increasing slopes, so each new line is the best one for
//! large enough `x`. Queries walk a pointer forward, making both operations
//! amortized O(1).

use crate::{HullError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub m: i64,
    pub b: i64,
}

impl Line {
    pub fn eval(self, x: i64) -> i128 {
        self.m as i128 * x as i128 + self.b as i128
    }
}

/// Whether `mid` is never strictly below both `lo` and `hi`, for slopes `lo.m > mid.m > hi.m`.
fn irrelevant(lo: Line, mid: Line, hi: Line) -> bool {
    // x(lo, hi) <= x(lo, mid)
    let d = |a: i64, b: i64| a as i128 - b as i128;
    d(hi.b, lo.b) * d(lo.m, mid.m) <= d(mid.b, lo.b) * d(lo.m, hi.m)
}

#[derive(Debug, Clone, Default)]
pub struct ConvexHullTrick {
    /// Lower envelope, slopes strictly decreasing.
    lines: Vec<Line>,
    /// Index of the line that was best at the previous query.
    ptr: usize,
    prev_query: Option<i64>,
}

impl ConvexHullTrick {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add the line `y = m x + b`.
    pub fn add_line(&mut self, m: i64, b: i64) -> Result<()> {
        let line = Line { m, b };
        if let Some(&last) = self.lines.last() {
            if m > last.m {
                return Err(HullError::SlopeOrder);
            }
            if m == last.m {
                if b >= last.b {
                    return Ok(());
                }
                self.lines.pop();
            }
        }
        while self.lines.len() >= 2 {
            let n = self.lines.len();
            if !irrelevant(self.lines[n - 2], self.lines[n - 1], line) {
                break;
            }
            self.lines.pop();
        }
        self.lines.push(line);
        self.ptr = self.ptr.min(self.lines.len() - 1);
        Ok(())
    }

    /// Minimum over all lines at `x`.
    pub fn query(&mut self, x: i64) -> Result<i128> {
        if self.lines.is_empty() {
            return Err(HullError::NoLines);
        }
        if self.prev_query.is_some_and(|p| x < p) {
            return Err(HullError::QueryOrder);
        }
        self.prev_query = Some(x);
        while self.ptr + 1 < self.lines.len()
            && self.lines[self.ptr + 1].eval(x) <= self.lines[self.ptr].eval(x)
        {
            self.ptr += 1;
        }
        Ok(self.lines[self.ptr].eval(x))
    }
}
