//! Observer hook for the solvers.
//!
//! Solvers report progress through [`SolveObserver`] at fixed points: when a
//! phase starts and finishes, and after every committed relaxation round of
//! the LLP solver. Implementations see read-only snapshots and cannot affect
//! the computation.
//!
//! Two implementations ship with the crate:
//! - `()` ignores every event;
//! - [`TracingObserver`] forwards events to `tracing` at debug/trace level.

use std::fmt;

/// Named stages of the two pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Inclusive prefix sums over the point series.
    PrefixSums,
    /// The `(i, j)` segment cost table.
    CostTable,
    /// The suffix-optimal segmentation recurrence.
    SuffixDp,
    /// Sorting intervals by finish time and assigning ids.
    Sort,
    /// Predecessor search for every interval.
    Compatibility,
    /// The ordered single-pass recurrence.
    Recurrence,
    /// The LLP fixpoint iteration.
    Relaxation,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::PrefixSums => "prefix_sums",
            Phase::CostTable => "cost_table",
            Phase::SuffixDp => "suffix_dp",
            Phase::Sort => "sort",
            Phase::Compatibility => "compatibility",
            Phase::Recurrence => "recurrence",
            Phase::Relaxation => "relaxation",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives progress events from a solve.
///
/// All methods default to doing nothing, so implementors only override the
/// events they care about.
pub trait SolveObserver {
    /// A phase is about to run over `len` elements.
    fn phase_started(&mut self, phase: Phase, len: usize) {
        let _ = (phase, len);
    }

    /// A phase finished.
    fn phase_finished(&mut self, phase: Phase) {
        let _ = phase;
    }

    /// An LLP round committed its buffer into `g`.
    ///
    /// `round` counts from 1; `changed` is the number of indices whose value
    /// moved in this round. A round with `changed == 0` is the terminal one.
    fn round_committed(&mut self, round: usize, changed: usize, g: &[i64]) {
        let _ = (round, changed, g);
    }
}

impl SolveObserver for () {}

/// Forwards observer events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SolveObserver for TracingObserver {
    fn phase_started(&mut self, phase: Phase, len: usize) {
        tracing::debug!(phase = phase.as_str(), len, "phase started");
    }

    fn phase_finished(&mut self, phase: Phase) {
        tracing::debug!(phase = phase.as_str(), "phase finished");
    }

    fn round_committed(&mut self, round: usize, changed: usize, g: &[i64]) {
        tracing::trace!(
            round,
            changed,
            head = g.last().copied().unwrap_or(0),
            "relaxation round committed"
        );
    }
}
