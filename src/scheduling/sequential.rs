//! Ordered single-pass evaluation of the scheduling recurrence.
//!
//! With `OPT[0] = 0` and interval `i` stored at slot `i + 1`:
//! `OPT[i+1] = max(weight[i] + OPT[P(i)+1], OPT[i])`.
//! The "with" branch is taken only when it is strictly better, so ties keep
//! the solution that skips interval `i`.
//!
//! Reconstruction stores one take flag per interval. Walking back from the
//! last interval, a taken interval jumps to its predecessor and a skipped one
//! steps to its neighbour; the path is built once at the end.

use crate::scheduling::compat::{IndexedInterval, Predecessors, SortedIntervals};

/// The evaluated recurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recurrence {
    opt: Vec<i64>,
    take: Vec<bool>,
    pred: Vec<Option<usize>>,
}

impl Recurrence {
    /// Optimal total weight over all intervals.
    pub fn optimum(&self) -> i64 {
        self.opt.last().copied().unwrap_or(0)
    }

    /// The value array, length m+1.
    pub fn values(&self) -> &[i64] {
        &self.opt
    }

    /// Ids of the chosen intervals in ascending order.
    pub fn selected_ids(&self) -> Vec<usize> {
        walk_back(&self.take, &self.pred)
    }

    /// The chosen intervals in ascending finish order.
    pub fn selection(&self, sorted: &SortedIntervals) -> Vec<IndexedInterval> {
        self.selected_ids()
            .into_iter()
            .map(|id| sorted.as_slice()[id])
            .collect()
    }
}

/// Follow take flags and predecessor links from the last interval.
pub(crate) fn walk_back(take: &[bool], pred: &[Option<usize>]) -> Vec<usize> {
    let mut ids = Vec::new();
    let mut cursor = take.len().checked_sub(1);
    while let Some(i) = cursor {
        if take[i] {
            ids.push(i);
            cursor = pred[i];
        } else {
            cursor = i.checked_sub(1);
        }
    }
    ids.reverse();
    ids
}

/// Evaluate the recurrence left to right.
pub fn sequential_recurrence(sorted: &SortedIntervals, pred: &Predecessors) -> Recurrence {
    let m = sorted.len();
    assert_eq!(pred.len(), m, "predecessors built for another interval set");
    let mut opt = vec![0i64; m + 1];
    let mut take = vec![false; m];

    for (i, iv) in sorted.as_slice().iter().enumerate() {
        let with = iv.weight + opt[pred.slot(i)];
        let without = opt[i];
        if with > without {
            opt[i + 1] = with;
            take[i] = true;
        } else {
            opt[i + 1] = without;
        }
    }

    Recurrence {
        opt,
        take,
        pred: pred.as_slice().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::Executor;
    use crate::records::Interval;
    use crate::scheduling::compat::compatibility;

    fn run(raw: &[(i64, i64, i64)]) -> (Recurrence, SortedIntervals) {
        let sorted = SortedIntervals::new(raw.iter().copied().map(Interval::from).collect());
        let pred = compatibility(&sorted, &Executor::sequential());
        (sequential_recurrence(&sorted, &pred), sorted)
    }

    #[test]
    fn small_example_picks_heaviest() {
        let (rec, sorted) = run(&[(1, 2, 50), (2, 3, 20), (1, 3, 100)]);
        assert_eq!(rec.optimum(), 100);
        let picked: Vec<_> = rec.selection(&sorted).iter().map(|iv| iv.weight).collect();
        assert_eq!(picked, vec![100]);
    }

    #[test]
    fn empty_and_single() {
        let (rec, _) = run(&[]);
        assert_eq!(rec.optimum(), 0);
        assert!(rec.selected_ids().is_empty());

        let (rec, _) = run(&[(4, 9, 17)]);
        assert_eq!(rec.optimum(), 17);
        assert_eq!(rec.selected_ids(), vec![0]);
    }

    #[test]
    fn chain_of_compatible_intervals_takes_all() {
        let (rec, _) = run(&[(0, 1, 3), (1, 2, 4), (2, 3, 5)]);
        assert_eq!(rec.optimum(), 12);
        assert_eq!(rec.selected_ids(), vec![0, 1, 2]);
    }

    #[test]
    fn ties_keep_the_earlier_solution() {
        // Second interval overlaps the first and is worth the same.
        let (rec, sorted) = run(&[(0, 2, 5), (1, 3, 5)]);
        assert_eq!(rec.optimum(), 5);
        assert_eq!(rec.selection(&sorted)[0].finish, 2);
    }

    #[test]
    fn classic_textbook_instance() {
        let (rec, sorted) = run(&[
            (1, 4, 5),
            (3, 5, 1),
            (0, 6, 8),
            (4, 7, 4),
            (3, 9, 6),
            (5, 9, 3),
            (6, 10, 2),
            (8, 11, 4),
        ]);
        assert_eq!(rec.optimum(), 13);
        let chosen = rec.selection(&sorted);
        let total: i64 = chosen.iter().map(|iv| iv.weight).sum();
        assert_eq!(total, 13);
        for w in chosen.windows(2) {
            assert!(w[0].finish <= w[1].start);
        }
    }

    #[test]
    #[should_panic(expected = "predecessors built for another interval set")]
    fn mismatched_predecessors_are_rejected() {
        let (_, sorted) = run(&[(0, 1, 1), (1, 2, 1)]);
        let other = SortedIntervals::new(vec![Interval::new(0, 1, 1)]);
        let pred = compatibility(&other, &Executor::sequential());
        let _ = sequential_recurrence(&sorted, &pred);
    }

    #[test]
    fn selection_weight_equals_optimum() {
        let raw: Vec<(i64, i64, i64)> = (0..200)
            .map(|i| {
                let s = (i * 37) % 101;
                (s, s + 1 + i % 9, 1 + (i * 7) % 11)
            })
            .collect();
        let (rec, sorted) = run(&raw);
        let chosen = rec.selection(&sorted);
        assert_eq!(chosen.iter().map(|iv| iv.weight).sum::<i64>(), rec.optimum());
    }
}
