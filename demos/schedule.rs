//! Example: weighted interval scheduling in all three modes.
//!
//! Run with:
//! `cargo run --example schedule`

use llp_dp::{
    scheduling::{Mode, WeightedIntervalScheduling},
    Executor, Interval, TracingObserver,
};

fn main() {
    let wis = WeightedIntervalScheduling::new(vec![
        Interval::new(1, 4, 5),
        Interval::new(3, 5, 1),
        Interval::new(0, 6, 8),
        Interval::new(4, 7, 4),
        Interval::new(3, 9, 6),
        Interval::new(5, 9, 3),
        Interval::new(6, 10, 2),
        Interval::new(8, 11, 4),
    ]);

    for mode in Mode::ALL {
        let exec = match mode {
            Mode::Sequential => Executor::sequential(),
            _ => Executor::parallel(),
        };
        let schedule = wis.solve_observed(mode, &exec, &mut TracingObserver);
        print!("{mode}: optimum {}", schedule.optimum);
        if let Some(rounds) = schedule.rounds {
            print!(" after {rounds} rounds");
        }
        println!();
        for iv in &schedule.selected {
            println!("  [{}, {}) weight {}", iv.start, iv.finish, iv.weight);
        }
    }
}
