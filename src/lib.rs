//! Sequential and parallel dynamic programs for two optimal-substructure
//! problems.
//!
//! - **Segmented least squares**: split an ordered point series into
//!   contiguous segments, each fitted by a least-squares line, minimizing
//!   total squared error plus a penalty per segment. See [`segmentation`].
//! - **Weighted interval scheduling**: choose a maximum-weight set of
//!   non-overlapping intervals. See [`scheduling`].
//!
//! Every kernel takes an explicit [`Executor`], either ordered loops on the
//! calling thread or fork-join loops on a rayon pool. All variants return
//! the same optimum as the sequential baseline.
//!
//! ## Lattice fixpoint
//! Besides the ordered recurrence, interval scheduling can be solved by
//! [`scheduling::LlpSolver`]: every index is relaxed in parallel, round after
//! round, until nothing changes. Because the update is monotone on a
//! join-semilattice, the order in which indices are relaxed does not matter
//! and the iteration always lands on the optimum.
//!
//! ## Quick start
//! ```
//! use llp_dp::{scheduling::{Mode, WeightedIntervalScheduling}, Interval};
//!
//! let wis = WeightedIntervalScheduling::new(vec![
//!     Interval::new(0, 3, 4),
//!     Interval::new(2, 5, 7),
//!     Interval::new(4, 7, 4),
//! ]);
//! let seq = wis.solve(Mode::Sequential);
//! let llp = wis.solve(Mode::ParallelLlp);
//! assert_eq!(seq.optimum, 8);
//! assert_eq!(seq.optimum, llp.optimum);
//! ```

pub mod blocks;
pub mod builder;
pub mod error;
pub mod exec;
pub mod records;
pub mod scheduling;
pub mod segmentation;
pub mod traits;
pub mod utils;

pub use crate::builder::ExecutorBuilder;
pub use crate::error::{Error, Result};
pub use crate::exec::{Executor, Strategy};
pub use crate::records::{Interval, Point, PointSet};
pub use crate::traits::{Phase, SolveObserver, TracingObserver};
