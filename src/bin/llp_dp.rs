use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use sysinfo::{get_current_pid, ProcessRefreshKind, System};
use tracing_subscriber::EnvFilter;

use llp_dp::records::{load_intervals_or_empty, load_points_or_empty};
use llp_dp::scheduling::{Mode, Schedule, WeightedIntervalScheduling};
use llp_dp::segmentation::{Segmentation, SegmentedLeastSquares};
use llp_dp::utils::{approx_eq, DEFAULT_EPSILON};
use llp_dp::{Executor, ExecutorBuilder, Strategy, TracingObserver};

#[derive(Parser)]
#[command(
    name = "llp-dp",
    version,
    about = "Compare sequential and parallel dynamic programs"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Worker threads for parallel modes (default: rayon's choice).
    #[arg(long, global = true)]
    threads: Option<usize>,
    /// Minimum indices per parallel task.
    #[arg(long, global = true)]
    chunk: Option<usize>,
    /// Report the resident-set delta of each run.
    #[arg(long, global = true)]
    rss: bool,
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Weighted interval scheduling over `start finish weight` lines.
    Schedule {
        file: PathBuf,
        /// One of seq, par, parllp.
        #[arg(long, default_value = "seq")]
        mode: String,
        /// Run every mode and check that they agree.
        #[arg(long)]
        all: bool,
        /// Print the selected intervals.
        #[arg(long)]
        show_path: bool,
    },
    /// Segmented least squares over an `N C` header and `x y` lines.
    Segment {
        file: PathBuf,
        /// One of seq, par.
        #[arg(long, default_value = "seq")]
        mode: String,
        /// Run both modes and check that they agree.
        #[arg(long)]
        all: bool,
        /// Print the fitted segments.
        #[arg(long)]
        show_segments: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.global.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Schedule {
            file,
            mode,
            all,
            show_path,
        } => handle_schedule(&cli.global, file, &mode, all, show_path),
        Command::Segment {
            file,
            mode,
            all,
            show_segments,
        } => handle_segment(&cli.global, file, &mode, all, show_segments),
    }
}

fn executor(global: &GlobalArgs, strategy: Strategy) -> Result<Executor> {
    let mut builder = ExecutorBuilder::new(strategy);
    if let Some(threads) = global.threads {
        builder = builder.threads(threads);
    }
    if let Some(chunk) = global.chunk {
        builder = builder.chunk_len(chunk);
    }
    builder.build().context("building executor")
}

struct Probe {
    sys: Option<System>,
}

impl Probe {
    fn new(enabled: bool) -> Self {
        Self {
            sys: enabled.then(System::new),
        }
    }

    fn rss_kib(&mut self) -> u64 {
        let Some(sys) = self.sys.as_mut() else {
            return 0;
        };
        sys.refresh_processes_specifics(ProcessRefreshKind::new());
        get_current_pid()
            .ok()
            .and_then(|pid| sys.process(pid))
            .map(|p| p.memory() / 1024)
            .unwrap_or(0)
    }

    fn measure<T>(&mut self, f: impl FnOnce() -> T) -> (T, f64, u64) {
        let before = self.rss_kib();
        let started = Instant::now();
        let out = f();
        let ms = started.elapsed().as_secs_f64() * 1e3;
        let after = self.rss_kib();
        (out, ms, after.saturating_sub(before))
    }

    fn enabled(&self) -> bool {
        self.sys.is_some()
    }
}

fn handle_schedule(global: &GlobalArgs, file: PathBuf, mode: &str, all: bool, show_path: bool) -> Result<()> {
    let modes: Vec<Mode> = if all {
        Mode::ALL.to_vec()
    } else {
        vec![mode.parse()?]
    };
    let intervals = load_intervals_or_empty(&file)
        .with_context(|| format!("reading intervals from {}", file.display()))?;
    tracing::info!(path = %file.display(), intervals = intervals.len(), "loaded intervals");
    let wis = WeightedIntervalScheduling::new(intervals);

    let mut probe = Probe::new(global.rss);
    let mut results: Vec<(Mode, Schedule)> = Vec::with_capacity(modes.len());
    for mode in modes {
        let strategy = match mode {
            Mode::Sequential => Strategy::Sequential,
            Mode::Parallel | Mode::ParallelLlp => Strategy::Parallel,
        };
        let exec = executor(global, strategy)?;
        let mut observer = TracingObserver;
        let (schedule, ms, rss) = probe.measure(|| wis.solve_observed(mode, &exec, &mut observer));
        match schedule.rounds {
            Some(rounds) => println!("{mode}: optimum {} in {ms:.3}ms ({rounds} rounds)", schedule.optimum),
            None => println!("{mode}: optimum {} in {ms:.3}ms", schedule.optimum),
        }
        if probe.enabled() {
            println!("{mode}: rss delta {rss} KiB");
        }
        if show_path {
            for iv in &schedule.selected {
                println!(
                    "  id: ({}) weight: ({}) start: ({}) finish: ({})",
                    iv.id, iv.weight, iv.start, iv.finish
                );
            }
        }
        results.push((mode, schedule));
    }

    if let Some(((first_mode, first), rest)) = results.split_first() {
        for (mode, other) in rest {
            if other.optimum != first.optimum {
                bail!(
                    "{mode} optimum {} disagrees with {first_mode} optimum {}",
                    other.optimum,
                    first.optimum
                );
            }
        }
    }
    Ok(())
}

fn handle_segment(global: &GlobalArgs, file: PathBuf, mode: &str, all: bool, show_segments: bool) -> Result<()> {
    let strategies: Vec<Strategy> = if all {
        vec![Strategy::Sequential, Strategy::Parallel]
    } else {
        vec![mode.parse()?]
    };
    let set = load_points_or_empty(&file)
        .with_context(|| format!("reading points from {}", file.display()))?;
    tracing::info!(path = %file.display(), points = set.points.len(), penalty = set.penalty, "loaded points");
    let sls = SegmentedLeastSquares::from(set);

    let mut probe = Probe::new(global.rss);
    let mut results: Vec<(Strategy, Segmentation)> = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        let exec = executor(global, strategy)?;
        let mut observer = TracingObserver;
        let (sol, ms, rss) = probe.measure(|| sls.solve_observed(&exec, &mut observer));
        println!("{strategy}: cost {} in {ms:.3}ms", sol.cost);
        if probe.enabled() {
            println!("{strategy}: rss delta {rss} KiB");
        }
        if show_segments {
            for s in &sol.segments {
                println!(
                    "  [{}, {}] slope {} intercept {} sse {}",
                    s.start, s.end, s.fit.slope, s.fit.intercept, s.fit.sse
                );
            }
        }
        results.push((strategy, sol));
    }

    if let [(_, a), (_, b)] = results.as_slice() {
        if !approx_eq(a.cost, b.cost, DEFAULT_EPSILON) {
            bail!("parallel cost {} disagrees with sequential cost {}", b.cost, a.cost);
        }
    }
    Ok(())
}
