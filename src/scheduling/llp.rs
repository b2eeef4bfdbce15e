//! Lattice-linear-predicate fixpoint solver for weighted interval scheduling.
//!
//! `G` starts at the bottom of the lattice (all zeros) and every round
//! applies the local update
//!
//! ```text
//! G[i+1] <- max(weight[i] + G[P(i)+1], G[i])
//! ```
//!
//! to all indices at once. The update is monotone, so starting from an
//! under-estimate each round can only raise values, and the iteration stops
//! at the least fixpoint, which is the optimum. Nothing about the argument
//! depends on evaluation order, which is what licenses the parallel rounds.
//! After round `k` the first `k` entries are final, so at most `m + 1`
//! rounds run.
//!
//! A round is two passes with a barrier between them:
//! 1. compute: read `G`, write `GCalc[i]` and `diffs[i]`;
//! 2. commit: copy `GCalc` into `G[1..]`.
//!
//! Phase 1 borrows `G` shared and phase 2 borrows it exclusively, so a read
//! and a write of the same cell can never overlap. In both phases slot `i`
//! is written only by the task that owns index `i`.

use rayon::prelude::*;

use crate::exec::Executor;
use crate::scheduling::compat::{IndexedInterval, Predecessors, SortedIntervals};
use crate::scheduling::sequential::walk_back;
use crate::traits::{Phase, SolveObserver};

/// Fixpoint solver over a sorted interval set and its predecessors.
pub struct LlpSolver<'a> {
    weights: Vec<i64>,
    pred: &'a Predecessors,
}

/// Result of a converged relaxation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlpOutcome {
    g: Vec<i64>,
    rounds: usize,
    take: Vec<bool>,
    pred: Vec<Option<usize>>,
}

impl LlpOutcome {
    /// `G[m]`, the optimal total weight.
    pub fn optimum(&self) -> i64 {
        self.g.last().copied().unwrap_or(0)
    }

    /// Number of rounds run, including the final one that changed nothing.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// The fixpoint `G`, length m+1.
    pub fn values(&self) -> &[i64] {
        &self.g
    }

    pub fn selected_ids(&self) -> Vec<usize> {
        walk_back(&self.take, &self.pred)
    }

    /// Intervals of one optimal solution, chosen with the same tie rule as
    /// the sequential recurrence.
    pub fn selection(&self, sorted: &SortedIntervals) -> Vec<IndexedInterval> {
        self.selected_ids()
            .into_iter()
            .map(|id| sorted.as_slice()[id])
            .collect()
    }
}

impl<'a> LlpSolver<'a> {
    pub fn new(sorted: &SortedIntervals, pred: &'a Predecessors) -> Self {
        assert_eq!(
            sorted.len(),
            pred.len(),
            "predecessors built for another interval set"
        );
        Self {
            weights: sorted.weights(),
            pred,
        }
    }

    pub fn solve(&self, exec: &Executor) -> LlpOutcome {
        self.solve_observed(exec, &mut ())
    }

    /// Iterate to the fixpoint, reporting every committed round.
    pub fn solve_observed(&self, exec: &Executor, observer: &mut dyn SolveObserver) -> LlpOutcome {
        let m = self.weights.len();
        let span = tracing::debug_span!("llp_solve", m, strategy = %exec.strategy());
        let _enter = span.enter();

        let mut g = vec![0i64; m + 1];
        let mut g_calc = vec![0i64; m];
        let mut diffs = vec![false; m];
        let chunk = exec.chunk_len(m);

        observer.phase_started(Phase::Relaxation, m);
        let mut rounds = 0usize;
        loop {
            rounds += 1;
            let changed = exec.install(|| {
                self.compute(&g, &mut g_calc, &mut diffs, exec, chunk);
                commit(&mut g, &g_calc, exec, chunk);
                count_changed(&diffs, exec, chunk)
            });
            tracing::trace!(round = rounds, changed, "relaxation round");
            observer.round_committed(rounds, changed, &g);
            if changed == 0 {
                break;
            }
            debug_assert!(rounds <= m + 1, "relaxation failed to converge");
        }
        observer.phase_finished(Phase::Relaxation);

        let take = (0..m)
            .map(|i| self.weights[i] + g[self.pred.slot(i)] > g[i])
            .collect();
        tracing::debug!(rounds, optimum = g[m], "fixpoint reached");

        LlpOutcome {
            g,
            rounds,
            take,
            pred: self.pred.as_slice().to_vec(),
        }
    }

    /// Phase 1: `GCalc[i] = max(w[i] + G[P(i)+1], G[i])`, flag changes.
    fn compute(&self, g: &[i64], g_calc: &mut [i64], diffs: &mut [bool], exec: &Executor, chunk: usize) {
        let relax = |i: usize, out: &mut i64, diff: &mut bool| {
            let value = (self.weights[i] + g[self.pred.slot(i)]).max(g[i]);
            *diff = value != g[i + 1];
            *out = value;
        };
        if exec.is_parallel() {
            g_calc
                .par_iter_mut()
                .zip(diffs.par_iter_mut())
                .with_min_len(chunk)
                .enumerate()
                .for_each(|(i, (out, diff))| relax(i, out, diff));
        } else {
            for (i, (out, diff)) in g_calc.iter_mut().zip(diffs.iter_mut()).enumerate() {
                relax(i, out, diff);
            }
        }
    }
}

/// Phase 2: `G[i+1] = GCalc[i]`.
fn commit(g: &mut [i64], g_calc: &[i64], exec: &Executor, chunk: usize) {
    if exec.is_parallel() {
        g[1..]
            .par_iter_mut()
            .zip(g_calc.par_iter())
            .with_min_len(chunk)
            .for_each(|(dst, &v)| *dst = v);
    } else {
        g[1..].copy_from_slice(g_calc);
    }
}

/// OR-reduction over `diffs`, kept as a count for the observer.
fn count_changed(diffs: &[bool], exec: &Executor, chunk: usize) -> usize {
    if exec.is_parallel() {
        diffs
            .par_iter()
            .with_min_len(chunk)
            .filter(|&&d| d)
            .count()
    } else {
        diffs.iter().filter(|&&d| d).count()
    }
}
