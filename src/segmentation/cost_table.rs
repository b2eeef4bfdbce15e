//! Least-squares fit and residual error for every segment `[i, j]`.
//!
//! Each cell is derived from the prefix tables in O(1) plus an O(j - i + 1)
//! residual sum, so the whole table costs O(n³) and dominates a
//! segmentation run. Cells are independent of one another.
//!
//! Layout: one row of `n + 1` cells per start index `i`, row-major, row 0
//! unused. Under the parallel executor the rows `1..=n` are cut into
//! contiguous [`WorkBlock`]s of equal residual work and each block is filled
//! by one task through its own `&mut` sub-slice.

use rayon::prelude::*;

use crate::blocks::{balanced_blocks, WorkBlock};
use crate::exec::Executor;
use crate::records::Point;
use crate::segmentation::prefix::{PrefixTables, RangeSums};

/// Fit of a single segment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostCell {
    pub slope: f64,
    pub intercept: f64,
    /// Sum of squared residuals of the fitted line over the segment.
    pub sse: f64,
}

impl CostCell {
    /// Fit the 1-based segment `[i, j]` of `points`.
    ///
    /// The slope is exactly 0 when the least-squares numerator is 0 and
    /// `+inf` when only the denominator is 0. Both are formed from the
    /// `i128` range sums, so the tests are exact.
    ///
    /// When `inner` is given and the segment is long enough, the residual
    /// sum is reduced in parallel; the result may then differ from the
    /// ordered sum in the last bits.
    pub fn fit(points: &[Point], sums: &RangeSums, i: usize, j: usize, inner: Option<&Executor>) -> Self {
        let RangeSums { len, x, y, xy, xx } = *sums;
        let numerator = len * xy - x * y;
        let slope = if numerator == 0 {
            0.0
        } else {
            let denominator = len * xx - x * x;
            if denominator == 0 {
                f64::INFINITY
            } else {
                numerator as f64 / denominator as f64
            }
        };
        let intercept = (y as f64 - slope * x as f64) / len as f64;

        let segment = &points[i - 1..j];
        let residual = |p: &Point| {
            let r = p.y as f64 - slope * p.x as f64 - intercept;
            r * r
        };
        let sse = match inner {
            Some(exec) if exec.split_inner(segment.len()) => segment
                .par_iter()
                .with_min_len(exec.chunk_len(segment.len()))
                .map(residual)
                .sum(),
            _ => segment.iter().map(residual).sum(),
        };

        Self {
            slope,
            intercept,
            sse,
        }
    }
}

/// Segment fits for all `1 <= i <= j <= n`.
#[derive(Debug, Clone)]
pub struct CostTable {
    n: usize,
    cells: Vec<CostCell>,
}

impl CostTable {
    /// Build the full table.
    pub fn build(points: &[Point], prefix: &PrefixTables, exec: &Executor) -> Self {
        let n = points.len();
        debug_assert_eq!(prefix.len(), n, "prefix tables built for another series");
        let stride = n + 1;
        let mut cells = vec![CostCell::default(); stride * stride];

        if n > 0 {
            let (_, rows) = cells.split_at_mut(stride);
            if exec.is_parallel() {
                let blocks = row_blocks(n, exec.workers().saturating_mul(4));
                tracing::trace!(n, blocks = blocks.len(), "cost table partitioned");
                let jobs = split_rows(rows, stride, &blocks);
                exec.install(|| {
                    jobs.into_par_iter().for_each(|(block, block_rows)| {
                        fill_rows(points, prefix, block, block_rows, stride, Some(exec));
                    });
                });
            } else {
                let all = WorkBlock { start: 1, end: n + 1 };
                fill_rows(points, prefix, all, rows, stride, None);
            }
        }

        Self { n, cells }
    }

    /// Number of points the table covers.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Fit of segment `[i, j]`.
    ///
    /// # Panics
    /// Panics unless `1 <= i <= j <= n`.
    #[inline]
    pub fn cell(&self, i: usize, j: usize) -> &CostCell {
        assert!(
            1 <= i && i <= j && j <= self.n,
            "segment [{i}, {j}] outside 1..={}",
            self.n
        );
        &self.cells[i * (self.n + 1) + j]
    }

    /// Squared error of segment `[i, j]`.
    #[inline]
    pub fn err(&self, i: usize, j: usize) -> f64 {
        self.cell(i, j).sse
    }
}

/// Residual work of row `i` is the sum of its segment lengths.
fn row_work(n: usize, i: usize) -> u64 {
    let l = (n + 1 - i) as u64;
    l * (l + 1) / 2
}

fn row_blocks(n: usize, parts: usize) -> Vec<WorkBlock> {
    balanced_blocks(1, n + 1, parts, |i| row_work(n, i))
}

/// Hand each block its own disjoint run of rows.
fn split_rows<'a>(
    mut rows: &'a mut [CostCell],
    stride: usize,
    blocks: &[WorkBlock],
) -> Vec<(WorkBlock, &'a mut [CostCell])> {
    let mut jobs = Vec::with_capacity(blocks.len());
    for &block in blocks {
        let (head, tail) = std::mem::take(&mut rows).split_at_mut(block.len() * stride);
        jobs.push((block, head));
        rows = tail;
    }
    jobs
}

fn fill_rows(
    points: &[Point],
    prefix: &PrefixTables,
    block: WorkBlock,
    rows: &mut [CostCell],
    stride: usize,
    inner: Option<&Executor>,
) {
    let n = points.len();
    for (offset, row) in rows.chunks_mut(stride).enumerate() {
        let i = block.start + offset;
        for j in i..=n {
            let sums = prefix.range(i, j);
            row[j] = CostCell::fit(points, &sums, i, j, inner);
        }
    }
}
