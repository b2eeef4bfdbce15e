//! The suffix-optimal segmentation recurrence.
//!
//! `OPT[0] = 0` and for `j = 1..=n`:
//! `OPT[j] = C + min over i in 1..=j of (err[i][j] + OPT[i-1])`.
//!
//! The loop over `j` is strictly ordered because every candidate reads
//! `OPT[i-1]` for `i <= j`. The inner minimum reads only finished entries, so
//! under the parallel executor it becomes a min-reduction over `i`. Ties go
//! to the largest `i` (the shortest final segment) in both paths, which keeps
//! the backpointers identical.

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::exec::Executor;
use crate::segmentation::cost_table::{CostCell, CostTable};

/// One segment of an optimal segmentation (1-based, inclusive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub fit: CostCell,
}

/// Finished DP table with backpointers.
#[derive(Debug, Clone, PartialEq)]
pub struct SuffixDp {
    opt: Vec<f64>,
    /// `start[j]` is the first point of the last segment in an optimal
    /// covering of `1..=j`; `start[0]` is unused.
    start: Vec<usize>,
}

impl SuffixDp {
    /// Minimum total penalized cost `OPT[n]`.
    pub fn cost(&self) -> f64 {
        self.opt.last().copied().unwrap_or(0.0)
    }

    /// The whole `OPT` array, length n+1.
    pub fn values(&self) -> &[f64] {
        &self.opt
    }

    /// Start of the last segment of an optimal covering of `1..=j`.
    pub fn last_segment_start(&self, j: usize) -> usize {
        self.start[j]
    }

    /// Walk the backpointers once to recover the segments in order.
    pub fn segments(&self, table: &CostTable) -> Vec<Segment> {
        let mut out = Vec::new();
        let mut j = self.opt.len().saturating_sub(1);
        while j > 0 {
            let i = self.start[j];
            if i == 0 {
                break;
            }
            out.push(Segment {
                start: i,
                end: j,
                fit: *table.cell(i, j),
            });
            j = i - 1;
        }
        out.reverse();
        out
    }
}

#[inline]
fn better(a: (f64, usize), b: (f64, usize)) -> (f64, usize) {
    match a.0.total_cmp(&b.0) {
        Ordering::Less => a,
        Ordering::Greater => b,
        Ordering::Equal => {
            if a.1 >= b.1 {
                a
            } else {
                b
            }
        }
    }
}

// Index 0 is never a valid segment start, so any real candidate beats it.
const NONE: (f64, usize) = (f64::INFINITY, 0);

/// Run the recurrence over a finished cost table.
pub fn optimal_segmentation(table: &CostTable, penalty: f64, exec: &Executor) -> SuffixDp {
    let n = table.n();
    let mut opt = vec![0.0f64; n + 1];
    let mut start = vec![0usize; n + 1];
    let chunk = exec.chunk_len(n);

    exec.install(|| {
        for j in 1..=n {
            let done = &opt[..j];
            let candidate = |i: usize| (table.err(i, j) + done[i - 1], i);
            let (best, arg) = if exec.is_parallel() && j > chunk {
                // Half-open so rayon sees an indexed range.
                (1..j + 1)
                    .into_par_iter()
                    .with_min_len(chunk)
                    .map(candidate)
                    .reduce(|| NONE, better)
            } else {
                (1..=j).map(candidate).fold(NONE, better)
            };
            opt[j] = best + penalty;
            start[j] = arg;
        }
    });

    SuffixDp { opt, start }
}
