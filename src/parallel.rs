use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{Result, SearchError};

/// Worker count used by the partitioned pool when the caller gives none.
pub const DEFAULT_POOL_WORKERS: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct ParallelProcessor {
    num_workers: usize,
}

impl ParallelProcessor {
    /// `None` means one worker per available core.
    pub fn new(num_workers: Option<usize>) -> Result<Self> {
        let num_workers = num_workers.unwrap_or_else(num_cpus::get);
        if num_workers == 0 {
            return Err(SearchError::invalid("worker count must be at least 1"));
        }

        Ok(Self { num_workers })
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Never more workers than work items, and always at least one.
    pub fn optimal_workers(&self, work_count: usize) -> usize {
        std::cmp::min(self.num_workers, work_count.max(1))
    }

    /// Builds a dedicated work-stealing pool sized for `work_count` items.
    /// Dropping it joins the workers.
    pub fn build_pool(&self, work_count: usize) -> Result<ThreadPool> {
        ThreadPoolBuilder::new()
            .num_threads(self.optimal_workers(work_count))
            .thread_name(|i| format!("gridsearch-steal-{i}"))
            .build()
            .map_err(|e| SearchError::PoolBuild(e.to_string()))
    }
}
