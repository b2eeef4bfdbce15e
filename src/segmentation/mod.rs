//! Segmented least squares.
//!
//! Partition an ordered point series into contiguous segments, each fitted by
//! its own least-squares line, minimizing total squared error plus a fixed
//! penalty `C` per segment.
//!
//! The pipeline has three stages, each taking the same [`Executor`]:
//! 1. [`prefix`]: inclusive prefix sums of x, y, x·y, x²;
//! 2. [`cost_table`]: slope, intercept and squared error for every `[i, j]`;
//! 3. [`optimal`]: the ordered recurrence over the finished table.
//!
//! ```
//! use llp_dp::{segmentation::SegmentedLeastSquares, Executor, Point};
//!
//! let points = vec![Point::new(1, 1), Point::new(2, 2), Point::new(3, 3), Point::new(4, 10)];
//! let solver = SegmentedLeastSquares::new(points, 1);
//! let seq = solver.solve(&Executor::sequential());
//! let par = solver.solve(&Executor::parallel());
//! assert!((seq.cost - par.cost).abs() < 1e-9);
//! ```

pub mod cost_table;
pub mod optimal;
pub mod prefix;

use crate::exec::Executor;
use crate::records::{Point, PointSet};
use crate::traits::{Phase, SolveObserver};

pub use cost_table::{CostCell, CostTable};
pub use optimal::{optimal_segmentation, Segment, SuffixDp};
pub use prefix::{inclusive_scan, PrefixTables, RangeSums};

/// Result of one segmentation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    /// Minimum total penalized fit cost `OPT[n]`.
    pub cost: f64,
    /// Segments of one optimal solution, in order.
    pub segments: Vec<Segment>,
}

/// A segmentation instance.
///
/// Holds only the input; every call to [`solve`](Self::solve) rebuilds all
/// tables from scratch, so repeated solves are independent.
#[derive(Debug, Clone)]
pub struct SegmentedLeastSquares {
    points: Vec<Point>,
    penalty: i64,
}

impl SegmentedLeastSquares {
    pub fn new(points: Vec<Point>, penalty: i64) -> Self {
        Self { points, penalty }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn penalty(&self) -> i64 {
        self.penalty
    }

    /// Solve with the given executor.
    pub fn solve(&self, exec: &Executor) -> Segmentation {
        self.solve_observed(exec, &mut ())
    }

    /// Solve, reporting phase boundaries to `observer`.
    pub fn solve_observed(&self, exec: &Executor, observer: &mut dyn SolveObserver) -> Segmentation {
        let n = self.points.len();
        let span = tracing::info_span!("sls_solve", n, strategy = %exec.strategy());
        let _enter = span.enter();

        observer.phase_started(Phase::PrefixSums, n);
        let prefix = PrefixTables::build(&self.points, exec);
        observer.phase_finished(Phase::PrefixSums);

        observer.phase_started(Phase::CostTable, n);
        let table = {
            let _s = tracing::debug_span!("cost_table", n).entered();
            CostTable::build(&self.points, &prefix, exec)
        };
        observer.phase_finished(Phase::CostTable);

        observer.phase_started(Phase::SuffixDp, n);
        let dp = {
            let _s = tracing::debug_span!("suffix_dp", n).entered();
            optimal_segmentation(&table, self.penalty as f64, exec)
        };
        observer.phase_finished(Phase::SuffixDp);

        let segments = dp.segments(&table);
        tracing::debug!(cost = dp.cost(), segments = segments.len(), "segmentation solved");
        Segmentation {
            cost: dp.cost(),
            segments,
        }
    }
}

impl From<PointSet> for SegmentedLeastSquares {
    fn from(set: PointSet) -> Self {
        Self::new(set.points, set.penalty)
    }
}
