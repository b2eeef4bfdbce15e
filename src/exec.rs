//! Execution strategy injected into every kernel.
//!
//! Kernels never consult a global switch: each call receives an
//! [`Executor`] that says whether loops run in order on the caller's thread
//! or fork-join on a rayon pool, and how index loops are chunked.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rayon::ThreadPool;

use crate::error::Error;
use crate::utils::default_chunk_len;

/// Sequential or parallel execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Plain ordered loops on the calling thread.
    Sequential,
    /// Data-parallel loops on a rayon pool.
    Parallel,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Sequential => "seq",
            Strategy::Parallel => "par",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seq" => Ok(Strategy::Sequential),
            "par" => Ok(Strategy::Parallel),
            other => Err(Error::InvalidMode(other.to_string())),
        }
    }
}

/// Execution context handed to the kernels.
///
/// Cloning is cheap; a dedicated pool is shared through an `Arc`.
#[derive(Clone)]
pub struct Executor {
    pub(crate) strategy: Strategy,
    pub(crate) pool: Option<Arc<ThreadPool>>,
    pub(crate) chunk_len: Option<usize>,
    pub(crate) inner_min_len: usize,
}

/// Default segment length at which a residual sum is itself split across
/// workers.
pub const DEFAULT_INNER_MIN_LEN: usize = 4096;

impl Executor {
    /// Ordered, single-threaded execution.
    pub fn sequential() -> Self {
        Self {
            strategy: Strategy::Sequential,
            pool: None,
            chunk_len: None,
            inner_min_len: usize::MAX,
        }
    }

    /// Parallel execution on rayon's global pool with default chunking.
    pub fn parallel() -> Self {
        Self {
            strategy: Strategy::Parallel,
            pool: None,
            chunk_len: None,
            inner_min_len: DEFAULT_INNER_MIN_LEN,
        }
    }

    /// Executor for a strategy with default settings.
    pub fn for_strategy(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Sequential => Self::sequential(),
            Strategy::Parallel => Self::parallel(),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[inline]
    pub fn is_parallel(&self) -> bool {
        self.strategy == Strategy::Parallel
    }

    /// Number of workers loops will be spread across.
    pub fn workers(&self) -> usize {
        match (self.strategy, &self.pool) {
            (Strategy::Sequential, _) => 1,
            (Strategy::Parallel, Some(pool)) => pool.current_num_threads(),
            (Strategy::Parallel, None) => rayon::current_num_threads(),
        }
    }

    /// Minimum contiguous run of indices handed to one task for a loop over
    /// `len` indices.
    pub fn chunk_len(&self, len: usize) -> usize {
        match self.chunk_len {
            Some(c) => c.max(1),
            None => default_chunk_len(len, self.workers()),
        }
    }

    /// Whether a residual sum over `len` points should be split.
    #[inline]
    pub fn split_inner(&self, len: usize) -> bool {
        self.is_parallel() && len >= self.inner_min_len
    }

    /// Run `op` inside this executor's pool, if it has a dedicated one.
    ///
    /// Rayon calls made inside `op` then use that pool's workers.
    pub fn install<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) if self.is_parallel() => pool.install(op),
            _ => op(),
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::sequential()
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("strategy", &self.strategy)
            .field("workers", &self.workers())
            .field("chunk_len", &self.chunk_len)
            .field("inner_min_len", &self.inner_min_len)
            .finish()
    }
}
