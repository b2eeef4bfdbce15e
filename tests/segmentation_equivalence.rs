use llp_dp::{
    builder::ExecutorBuilder,
    segmentation::{inclusive_scan, PrefixTables, SegmentedLeastSquares},
    utils::{approx_eq, DEFAULT_EPSILON},
    Executor, Point, Strategy as ExecStrategy,
};
use proptest::prelude::*;

/// Squared error of the least-squares line through `pts`.
fn line_error(pts: &[Point]) -> f64 {
    let n = pts.len() as i128;
    let sx: i128 = pts.iter().map(|p| p.x as i128).sum();
    let sy: i128 = pts.iter().map(|p| p.y as i128).sum();
    let sxy: i128 = pts.iter().map(|p| (p.x * p.y) as i128).sum();
    let sxx: i128 = pts.iter().map(|p| (p.x * p.x) as i128).sum();
    let den = n * sxx - sx * sx;
    // Integer x: a zero denominator means every x is equal, so the
    // numerator is zero as well.
    let slope = if den == 0 {
        0.0
    } else {
        (n * sxy - sx * sy) as f64 / den as f64
    };
    let intercept = (sy as f64 - slope * sx as f64) / n as f64;
    pts.iter()
        .map(|p| {
            let r = p.y as f64 - slope * p.x as f64 - intercept;
            r * r
        })
        .sum()
}

/// Minimum over all 2^(n-1) ways of cutting the series.
fn brute_force(points: &[Point], penalty: i64) -> f64 {
    let n = points.len();
    if n == 0 {
        return 0.0;
    }
    let mut best = f64::INFINITY;
    for cuts in 0u32..(1 << (n - 1)) {
        let mut total = 0.0;
        let mut start = 0;
        for end in 1..=n {
            if end == n || cuts & (1 << (end - 1)) != 0 {
                total += line_error(&points[start..end]) + penalty as f64;
                start = end;
            }
        }
        best = best.min(total);
    }
    best
}

fn executors() -> Vec<Executor> {
    let mut out = vec![Executor::parallel()];
    for threads in [1, 2, 4] {
        out.push(
            ExecutorBuilder::new(ExecStrategy::Parallel)
                .threads(threads)
                .chunk_len(1)
                .inner_min_len(2)
                .build()
                .unwrap(),
        );
    }
    out
}

fn points_strategy(max_len: usize) -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec((-15i64..15, -30i64..30), 0..max_len)
        .prop_map(|raw| raw.into_iter().map(Point::from).collect())
}

#[test]
fn outlier_is_split_off() {
    let points = vec![Point::new(1, 1), Point::new(2, 2), Point::new(3, 3), Point::new(4, 10)];
    let solver = SegmentedLeastSquares::new(points.clone(), 1);
    let seq = solver.solve(&Executor::sequential());
    assert_eq!(seq.cost, 2.0);
    assert!(approx_eq(seq.cost, brute_force(&points, 1), DEFAULT_EPSILON));
    let last = seq.segments.last().unwrap();
    assert_eq!((last.start, last.end), (4, 4));
    for exec in executors() {
        assert!(approx_eq(solver.solve(&exec).cost, seq.cost, DEFAULT_EPSILON));
    }
}

#[test]
fn collinear_series_is_one_segment() {
    let points: Vec<Point> = (0..40).map(|i| Point::new(i, 3 * i - 7)).collect();
    let solver = SegmentedLeastSquares::new(points, 5);
    for exec in [Executor::sequential(), Executor::parallel()] {
        let sol = solver.solve(&exec);
        assert!(approx_eq(sol.cost, 5.0, DEFAULT_EPSILON));
        assert_eq!(sol.segments.len(), 1);
        assert!(approx_eq(sol.segments[0].fit.slope, 3.0, DEFAULT_EPSILON));
    }
}

#[test]
fn empty_and_single_point() {
    let empty = SegmentedLeastSquares::new(Vec::new(), 4);
    assert_eq!(empty.solve(&Executor::parallel()).cost, 0.0);
    assert!(empty.solve(&Executor::sequential()).segments.is_empty());

    let single = SegmentedLeastSquares::new(vec![Point::new(3, 9)], 4);
    let sol = single.solve(&Executor::parallel());
    assert_eq!(sol.cost, 4.0);
    assert_eq!(sol.segments.len(), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn matches_brute_force(points in points_strategy(9), penalty in 0i64..40) {
        let expected = brute_force(&points, penalty);
        let solver = SegmentedLeastSquares::new(points, penalty);
        let seq = solver.solve(&Executor::sequential());
        prop_assert!(approx_eq(seq.cost, expected, DEFAULT_EPSILON), "{} vs {}", seq.cost, expected);
    }

    #[test]
    fn parallel_matches_sequential(points in points_strategy(48), penalty in 0i64..100) {
        let n = points.len();
        let solver = SegmentedLeastSquares::new(points, penalty);
        let seq = solver.solve(&Executor::sequential());

        let mut next = 1;
        let mut total = 0.0;
        for s in &seq.segments {
            prop_assert_eq!(s.start, next);
            prop_assert!(s.end >= s.start);
            next = s.end + 1;
            total += s.fit.sse + penalty as f64;
        }
        prop_assert_eq!(next, n + 1);
        prop_assert!(approx_eq(total, seq.cost, DEFAULT_EPSILON));

        for exec in executors() {
            let par = solver.solve(&exec);
            prop_assert!(approx_eq(par.cost, seq.cost, DEFAULT_EPSILON), "{} vs {}", par.cost, seq.cost);
        }
    }

    #[test]
    fn scan_is_exact_under_every_executor(raw in prop::collection::vec(any::<i64>(), 0..300)) {
        let values: Vec<i128> = raw.into_iter().map(i128::from).collect();
        let seq = inclusive_scan(&values, &Executor::sequential());
        prop_assert_eq!(seq.len(), values.len() + 1);
        prop_assert_eq!(seq[0], 0);
        for exec in executors() {
            prop_assert_eq!(&inclusive_scan(&values, &exec), &seq);
        }
    }

    #[test]
    fn range_sums_match_direct_sums(
        raw in prop::collection::vec((any::<i32>(), any::<i32>()), 1..30)
    ) {
        let points: Vec<Point> = raw.into_iter().map(|(x, y)| Point::new(x.into(), y.into())).collect();
        let tables = PrefixTables::build(&points, &Executor::parallel());
        let n = points.len();
        for i in 1..=n {
            for j in i..=n {
                let r = tables.range(i, j);
                let seg = &points[i - 1..j];
                prop_assert_eq!(r.len as usize, j - i + 1);
                let wide = |f: fn(&Point) -> i128| seg.iter().map(f).sum::<i128>();
                prop_assert_eq!(r.x, wide(|p| p.x as i128));
                prop_assert_eq!(r.xy, wide(|p| p.x as i128 * p.y as i128));
                prop_assert_eq!(r.xx, wide(|p| p.x as i128 * p.x as i128));
            }
        }
    }
}
