use std::sync::Arc;

use crate::error::{Error, Result};
use crate::exec::{Executor, Strategy, DEFAULT_INNER_MIN_LEN};

/// Configures an [`Executor`].
///
/// ```
/// use llp_dp::{ExecutorBuilder, Strategy};
///
/// let exec = ExecutorBuilder::new(Strategy::Parallel)
///     .threads(2)
///     .chunk_len(64)
///     .build()
///     .unwrap();
/// assert_eq!(exec.workers(), 2);
/// ```
pub struct ExecutorBuilder {
    strategy: Strategy,
    threads: Option<usize>,
    chunk_len: Option<usize>,
    inner_min_len: Option<usize>,
}

impl ExecutorBuilder {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            threads: None,
            chunk_len: None,
            inner_min_len: None,
        }
    }

    /// Run on a dedicated pool of `threads` workers instead of the global one.
    /// Zero means "let rayon decide".
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Fix the minimum contiguous run of indices per task.
    pub fn chunk_len(mut self, chunk_len: usize) -> Self {
        self.chunk_len = Some(chunk_len);
        self
    }

    /// Segment length from which residual sums are split across workers.
    pub fn inner_min_len(mut self, len: usize) -> Self {
        self.inner_min_len = Some(len);
        self
    }

    pub fn build(self) -> Result<Executor> {
        let mut exec = Executor::for_strategy(self.strategy);
        exec.chunk_len = self.chunk_len;
        if self.strategy == Strategy::Parallel {
            exec.inner_min_len = self.inner_min_len.unwrap_or(DEFAULT_INNER_MIN_LEN).max(1);
            if let Some(threads) = self.threads {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("llp-dp-{i}"))
                    .build()
                    .map_err(|e| Error::ThreadPool(e.to_string()))?;
                exec.pool = Some(Arc::new(pool));
            }
        }
        Ok(exec)
    }
}
