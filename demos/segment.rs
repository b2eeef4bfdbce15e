//! Example: fit a piecewise-linear model to a series with two regimes.
//!
//! Run with:
//! `cargo run --example segment`

use llp_dp::{segmentation::SegmentedLeastSquares, Executor, Point};

fn main() {
    // Rising for twenty steps, then falling.
    let points: Vec<Point> = (0..40)
        .map(|i| {
            let y = if i < 20 { 2 * i } else { 80 - 2 * i };
            Point::new(i, y + (i % 3) - 1)
        })
        .collect();

    let solver = SegmentedLeastSquares::new(points, 10);
    let seq = solver.solve(&Executor::sequential());
    let par = solver.solve(&Executor::parallel());

    println!("sequential cost: {:.4}", seq.cost);
    println!("parallel cost:   {:.4}", par.cost);
    for s in &seq.segments {
        println!(
            "  points {}..={}: y = {:.3}x + {:.3} (sse {:.3})",
            s.start, s.end, s.fit.slope, s.fit.intercept, s.fit.sse
        );
    }
}
