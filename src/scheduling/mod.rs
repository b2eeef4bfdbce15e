//! Weighted interval scheduling.
//!
//! Pick a maximum-weight subset of pairwise compatible intervals, where two
//! intervals are compatible when one finishes no later than the other starts.
//!
//! Pipeline: sort by finish time ([`compat::SortedIntervals`]), find every
//! interval's compatible predecessor ([`compat::compatibility`]), then
//! evaluate the recurrence either in order ([`sequential`]) or as a
//! lattice fixpoint ([`llp`]).
//!
//! ```
//! use llp_dp::{scheduling::{Mode, WeightedIntervalScheduling}, Interval};
//!
//! let wis = WeightedIntervalScheduling::new(vec![
//!     Interval::new(1, 2, 50),
//!     Interval::new(2, 3, 20),
//!     Interval::new(1, 3, 100),
//! ]);
//! for mode in ["seq", "par", "parllp"] {
//!     let mode: Mode = mode.parse().unwrap();
//!     assert_eq!(wis.solve(mode).optimum, 100);
//! }
//! ```

pub mod compat;
pub mod llp;
pub mod sequential;

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::exec::Executor;
use crate::records::Interval;
use crate::traits::{Phase, SolveObserver};

pub use compat::{compatibility, IndexedInterval, Predecessors, SortedIntervals};
pub use llp::{LlpOutcome, LlpSolver};
pub use sequential::{sequential_recurrence, Recurrence};

/// Which algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `"seq"`: sequential indexing and the ordered recurrence.
    Sequential,
    /// `"par"`: parallel indexing, then the ordered recurrence.
    Parallel,
    /// `"parllp"`: parallel indexing and the LLP fixpoint.
    ParallelLlp,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Sequential, Mode::Parallel, Mode::ParallelLlp];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Sequential => "seq",
            Mode::Parallel => "par",
            Mode::ParallelLlp => "parllp",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "seq" => Ok(Mode::Sequential),
            "par" => Ok(Mode::Parallel),
            "parllp" => Ok(Mode::ParallelLlp),
            other => Err(Error::InvalidMode(other.to_string())),
        }
    }
}

/// Result of one scheduling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// Optimal total weight.
    pub optimum: i64,
    /// One optimal set of intervals, ascending by finish time.
    pub selected: Vec<IndexedInterval>,
    /// Relaxation rounds, for the LLP mode only.
    pub rounds: Option<usize>,
}

/// A scheduling instance.
///
/// Holds only the raw intervals; every solve sorts, indexes and evaluates
/// from scratch.
#[derive(Debug, Clone, Default)]
pub struct WeightedIntervalScheduling {
    intervals: Vec<Interval>,
}

impl WeightedIntervalScheduling {
    pub fn new(intervals: Vec<Interval>) -> Self {
        Self { intervals }
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Solve with the default executor for `mode`.
    pub fn solve(&self, mode: Mode) -> Schedule {
        let exec = match mode {
            Mode::Sequential => Executor::sequential(),
            Mode::Parallel | Mode::ParallelLlp => Executor::parallel(),
        };
        self.solve_with(mode, &exec)
    }

    /// Parse `mode` and solve; an unknown selector runs nothing.
    pub fn solve_named(&self, mode: &str, exec: &Executor) -> Result<Schedule> {
        let mode: Mode = mode.parse()?;
        Ok(self.solve_with(mode, exec))
    }

    /// Solve with an explicit executor.
    ///
    /// `Mode::Sequential` always indexes in order, whatever `exec` says;
    /// the other modes use `exec` for their parallel phases.
    pub fn solve_with(&self, mode: Mode, exec: &Executor) -> Schedule {
        self.solve_observed(mode, exec, &mut ())
    }

    pub fn solve_observed(&self, mode: Mode, exec: &Executor, observer: &mut dyn SolveObserver) -> Schedule {
        let m = self.intervals.len();
        let span = tracing::info_span!("wis_solve", m, mode = %mode);
        let _enter = span.enter();

        let sequential = Executor::sequential();
        let index_exec = match mode {
            Mode::Sequential => &sequential,
            Mode::Parallel | Mode::ParallelLlp => exec,
        };

        observer.phase_started(Phase::Sort, m);
        let sorted = SortedIntervals::new(self.intervals.clone());
        observer.phase_finished(Phase::Sort);

        observer.phase_started(Phase::Compatibility, m);
        let pred = compatibility(&sorted, index_exec);
        observer.phase_finished(Phase::Compatibility);

        let schedule = match mode {
            Mode::Sequential | Mode::Parallel => {
                observer.phase_started(Phase::Recurrence, m);
                let rec = sequential_recurrence(&sorted, &pred);
                observer.phase_finished(Phase::Recurrence);
                Schedule {
                    optimum: rec.optimum(),
                    selected: rec.selection(&sorted),
                    rounds: None,
                }
            }
            Mode::ParallelLlp => {
                let out = LlpSolver::new(&sorted, &pred).solve_observed(exec, observer);
                Schedule {
                    optimum: out.optimum(),
                    selected: out.selection(&sorted),
                    rounds: Some(out.rounds()),
                }
            }
        };
        tracing::debug!(
            optimum = schedule.optimum,
            selected = schedule.selected.len(),
            "schedule solved"
        );
        schedule
    }
}

impl From<Vec<Interval>> for WeightedIntervalScheduling {
    fn from(intervals: Vec<Interval>) -> Self {
        Self::new(intervals)
    }
}
