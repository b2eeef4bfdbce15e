use llp_dp::{
    builder::ExecutorBuilder,
    scheduling::{compatibility, sequential_recurrence, LlpSolver, SortedIntervals},
    Executor, Interval, Phase, SolveObserver, Strategy as ExecStrategy,
};
use proptest::prelude::*;

#[derive(Default)]
struct Trace {
    phases: Vec<Phase>,
    rounds: Vec<(usize, usize, Vec<i64>)>,
}

impl SolveObserver for Trace {
    fn phase_started(&mut self, phase: Phase, _len: usize) {
        self.phases.push(phase);
    }

    fn round_committed(&mut self, round: usize, changed: usize, g: &[i64]) {
        self.rounds.push((round, changed, g.to_vec()));
    }
}

fn sorted(raw: &[(i64, i64, i64)]) -> SortedIntervals {
    SortedIntervals::new(raw.iter().copied().map(Interval::from).collect())
}

#[test]
fn nested_chain_takes_all_rounds() {
    // Touching intervals: each value depends on the one before it.
    let raw: Vec<(i64, i64, i64)> = (0..12).map(|i| (2 * i, 2 * i + 2, 3)).collect();
    let sorted = sorted(&raw);
    let pred = compatibility(&sorted, &Executor::sequential());
    let mut trace = Trace::default();
    let out = LlpSolver::new(&sorted, &pred).solve_observed(&Executor::parallel(), &mut trace);

    assert_eq!(out.optimum(), 36);
    assert!(out.rounds() <= raw.len() + 1);
    assert_eq!(trace.phases, vec![Phase::Relaxation]);
    let numbers: Vec<usize> = trace.rounds.iter().map(|r| r.0).collect();
    assert_eq!(numbers, (1..=out.rounds()).collect::<Vec<_>>());
}

#[test]
fn fixpoint_is_stable_under_one_more_round() {
    let raw = [(1, 4, 5), (3, 5, 1), (0, 6, 8), (4, 7, 4), (3, 9, 6), (5, 9, 3), (6, 10, 2), (8, 11, 4)];
    let sorted = sorted(&raw);
    let pred = compatibility(&sorted, &Executor::sequential());
    let out = LlpSolver::new(&sorted, &pred).solve(&Executor::parallel());
    let g = out.values();
    let w = sorted.weights();
    for i in 0..w.len() {
        assert_eq!(g[i + 1], (w[i] + g[pred.slot(i)]).max(g[i]));
    }
    assert_eq!(out.optimum(), 13);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn rounds_are_monotone_and_bounded(
        raw in prop::collection::vec((0i64..60, 1i64..12, 0i64..30), 0..80),
        threads in 1usize..5,
        chunk in 1usize..9,
    ) {
        let raw: Vec<(i64, i64, i64)> = raw.into_iter().map(|(s, l, w)| (s, s + l, w)).collect();
        let sorted = sorted(&raw);
        let pred = compatibility(&sorted, &Executor::sequential());
        let exec = ExecutorBuilder::new(ExecStrategy::Parallel)
            .threads(threads)
            .chunk_len(chunk)
            .build()
            .unwrap();
        let mut trace = Trace::default();
        let out = LlpSolver::new(&sorted, &pred).solve_observed(&exec, &mut trace);
        let m = raw.len();

        prop_assert!(out.rounds() <= m + 1);
        prop_assert_eq!(trace.rounds.len(), out.rounds());
        let mut prev = vec![0i64; m + 1];
        for (_, changed, g) in &trace.rounds {
            prop_assert_eq!(g[0], 0);
            prop_assert!(prev.iter().zip(g).all(|(a, b)| a <= b));
            let moved = prev.iter().zip(g).filter(|(a, b)| a != b).count();
            prop_assert_eq!(moved, *changed);
            prev = g.clone();
        }
        prop_assert_eq!(trace.rounds.last().map(|r| r.1), Some(0));

        let rec = sequential_recurrence(&sorted, &pred);
        prop_assert_eq!(out.values(), rec.values());
        prop_assert_eq!(out.selected_ids(), rec.selected_ids());
    }
}
