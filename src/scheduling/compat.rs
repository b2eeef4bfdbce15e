//! Sorting by finish time and the compatibility predecessor `P(i)`.
//!
//! Ties in finish time are broken by start, then weight, then input order
//! (the sort is stable). The order therefore does not depend on the executor
//! or thread count, and neither do the predecessor ids derived from it.

use rayon::prelude::*;

use crate::exec::Executor;
use crate::records::Interval;

/// An interval with its position in finish-time order.
///
/// Produced only by [`SortedIntervals::new`]; never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexedInterval {
    pub id: usize,
    pub start: i64,
    pub finish: i64,
    pub weight: i64,
}

/// Intervals sorted ascending by finish time with ids assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedIntervals {
    items: Vec<IndexedInterval>,
}

impl SortedIntervals {
    pub fn new(mut intervals: Vec<Interval>) -> Self {
        intervals.sort_by_key(|iv| (iv.finish, iv.start, iv.weight));
        let items = intervals
            .into_iter()
            .enumerate()
            .map(|(id, iv)| IndexedInterval {
                id,
                start: iv.start,
                finish: iv.finish,
                weight: iv.weight,
            })
            .collect();
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[IndexedInterval] {
        &self.items
    }

    pub fn get(&self, id: usize) -> Option<&IndexedInterval> {
        self.items.get(id)
    }

    /// Weights in sorted order.
    pub fn weights(&self) -> Vec<i64> {
        self.items.iter().map(|iv| iv.weight).collect()
    }

    /// Id of the last interval before position `id` that finishes no later
    /// than that interval starts.
    ///
    /// Only earlier positions are searched, so an interval is never its own
    /// predecessor even when it has zero length.
    #[inline]
    pub fn predecessor_of(&self, id: usize) -> Option<usize> {
        let start = self.items[id].start;
        self.items[..id]
            .partition_point(|iv| iv.finish <= start)
            .checked_sub(1)
    }
}

/// The predecessor array `P`, read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predecessors {
    pred: Vec<Option<usize>>,
}

impl Predecessors {
    pub fn len(&self) -> usize {
        self.pred.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pred.is_empty()
    }

    /// `P(i)`, or `None` when no interval is compatible.
    #[inline]
    pub fn get(&self, i: usize) -> Option<usize> {
        self.pred[i]
    }

    /// `P(i) + 1`: the index into a value array whose slot 0 means "nothing
    /// chosen yet".
    #[inline]
    pub fn slot(&self, i: usize) -> usize {
        self.pred[i].map_or(0, |p| p + 1)
    }

    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.pred
    }

    /// The conventional signed form with `-1` for "none".
    pub fn to_signed(&self) -> Vec<i64> {
        self.pred
            .iter()
            .map(|p| p.map_or(-1, |v| v as i64))
            .collect()
    }
}

/// Compute `P(i)` for every interval by binary search over finish times.
pub fn compatibility(sorted: &SortedIntervals, exec: &Executor) -> Predecessors {
    let items = sorted.as_slice();
    let pred = if exec.is_parallel() {
        let chunk = exec.chunk_len(items.len());
        exec.install(|| {
            (0..items.len())
                .into_par_iter()
                .with_min_len(chunk)
                .map(|id| sorted.predecessor_of(id))
                .collect()
        })
    } else {
        (0..items.len()).map(|id| sorted.predecessor_of(id)).collect()
    };
    Predecessors { pred }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(raw: &[(i64, i64, i64)]) -> SortedIntervals {
        SortedIntervals::new(raw.iter().copied().map(Interval::from).collect())
    }

    #[test]
    fn ids_follow_finish_then_start() {
        let s = sorted(&[(1, 2, 50), (2, 3, 20), (1, 3, 100)]);
        let order: Vec<_> = s.as_slice().iter().map(|iv| (iv.id, iv.start, iv.finish, iv.weight)).collect();
        assert_eq!(order, vec![(0, 1, 2, 50), (1, 1, 3, 100), (2, 2, 3, 20)]);
    }

    #[test]
    fn predecessors_of_small_example() {
        let s = sorted(&[(1, 2, 50), (2, 3, 20), (1, 3, 100)]);
        let p = compatibility(&s, &Executor::sequential());
        assert_eq!(p.to_signed(), vec![-1, -1, 0]);
        assert_eq!(p.slot(2), 1);
        assert_eq!(p.slot(0), 0);
    }

    #[test]
    fn touching_intervals_are_compatible() {
        let s = sorted(&[(0, 5, 1), (5, 9, 1)]);
        let p = compatibility(&s, &Executor::sequential());
        assert_eq!(p.get(1), Some(0));
    }

    #[test]
    fn picks_rightmost_of_equal_finishes() {
        let s = sorted(&[(0, 4, 1), (1, 4, 1), (2, 4, 1), (4, 6, 1)]);
        let p = compatibility(&s, &Executor::sequential());
        assert_eq!(p.get(3), Some(2));
    }

    #[test]
    fn zero_length_interval_is_not_its_own_predecessor() {
        let s = sorted(&[(2, 3, 1), (3, 3, 1)]);
        let p = compatibility(&s, &Executor::sequential());
        assert_eq!(p.to_signed(), vec![-1, 0]);
    }

    #[test]
    fn parallel_matches_sequential() {
        let raw: Vec<(i64, i64, i64)> = (0..500)
            .map(|i| {
                let s = (i * 7919) % 997;
                (s, s + 1 + (i * 31) % 50, 1 + i % 13)
            })
            .collect();
        let s = sorted(&raw);
        let exec = crate::builder::ExecutorBuilder::new(crate::exec::Strategy::Parallel)
            .chunk_len(7)
            .build()
            .unwrap();
        assert_eq!(
            compatibility(&s, &Executor::sequential()),
            compatibility(&s, &exec)
        );
    }

    #[test]
    fn empty_set_has_no_predecessors() {
        let s = sorted(&[]);
        assert!(compatibility(&s, &Executor::parallel()).is_empty());
    }
}
