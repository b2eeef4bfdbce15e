//! Inclusive prefix sums of x, y, x·y and x² over the point series.
//!
//! Tables are 1-based: entry `k` holds the sum over points `1..=k` and entry
//! 0 is zero, so any range sum is a single subtraction.
//!
//! The parallel scan works in three steps over contiguous chunks: fold each
//! chunk locally, scan the chunk totals in order, then add each chunk's
//! offset in place. All accumulators are integers, so the result is
//! bit-identical to the sequential fold.
//!
//! Moments and sums are `i128`: a product of two 32-bit coordinates already
//! needs 62 bits, and the prefix over many of them does not fit in `i64`.

use rayon::prelude::*;

use crate::exec::Executor;
use crate::records::Point;

/// Sums of the four moments over a contiguous range of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeSums {
    pub len: i128,
    pub x: i128,
    pub y: i128,
    pub xy: i128,
    pub xx: i128,
}

/// The four prefix arrays, each of length n+1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTables {
    pub x: Vec<i128>,
    pub y: Vec<i128>,
    pub xy: Vec<i128>,
    pub xx: Vec<i128>,
}

impl PrefixTables {
    /// Build all four tables with the given executor.
    pub fn build(points: &[Point], exec: &Executor) -> Self {
        let moment = |f: fn(&Point) -> i128| -> Vec<i128> {
            let values: Vec<i128> = points.iter().map(f).collect();
            inclusive_scan(&values, exec)
        };
        Self {
            x: moment(|p| p.x as i128),
            y: moment(|p| p.y as i128),
            xy: moment(|p| p.x as i128 * p.y as i128),
            xx: moment(|p| p.x as i128 * p.x as i128),
        }
    }

    /// Number of points covered.
    pub fn len(&self) -> usize {
        self.x.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sums over the 1-based inclusive range `[i, j]`.
    ///
    /// # Panics
    /// Panics unless `1 <= i <= j <= n`.
    #[inline]
    pub fn range(&self, i: usize, j: usize) -> RangeSums {
        assert!(
            1 <= i && i <= j && j <= self.len(),
            "range [{i}, {j}] outside 1..={}",
            self.len()
        );
        RangeSums {
            len: (j - i + 1) as i128,
            x: self.x[j] - self.x[i - 1],
            y: self.y[j] - self.y[i - 1],
            xy: self.xy[j] - self.xy[i - 1],
            xx: self.xx[j] - self.xx[i - 1],
        }
    }
}

/// Inclusive prefix sum of `values` with a leading zero (length n+1).
pub fn inclusive_scan(values: &[i128], exec: &Executor) -> Vec<i128> {
    let mut out = vec![0i128; values.len() + 1];
    if !exec.is_parallel() || values.len() < 2 {
        let mut acc = 0i128;
        for (slot, &v) in out[1..].iter_mut().zip(values) {
            acc += v;
            *slot = acc;
        }
        return out;
    }

    let chunk = exec.chunk_len(values.len());
    exec.install(|| {
        let body = &mut out[1..];

        // Local inclusive scan per chunk; the chunk total ends up in its last slot.
        body.par_chunks_mut(chunk)
            .zip(values.par_chunks(chunk))
            .for_each(|(dst, src)| {
                let mut acc = 0i128;
                for (slot, &v) in dst.iter_mut().zip(src) {
                    acc += v;
                    *slot = acc;
                }
            });

        let mut offsets: Vec<i128> = body.chunks(chunk).map(|c| c[c.len() - 1]).collect();
        let mut carry = 0i128;
        for off in offsets.iter_mut() {
            let total = *off;
            *off = carry;
            carry += total;
        }

        body.par_chunks_mut(chunk)
            .zip(offsets.par_iter())
            .skip(1)
            .for_each(|(dst, &off)| {
                for slot in dst.iter_mut() {
                    *slot += off;
                }
            });
    });
    out
}
