use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

use super::{merge, scan_row, MatchPredicate, SearchResult};
use crate::error::{Result, SearchError};
use crate::grid::Grid;
use crate::parallel::ParallelProcessor;

/// Recursive row-range search on a work-stealing pool.
#[derive(Debug, Clone, Copy)]
pub struct DivideAndConquerSearch {
    threshold: usize,
    workers: Option<usize>,
}

impl DivideAndConquerSearch {
    /// `threshold` is the largest row range scanned without splitting.
    pub fn new(threshold: usize) -> Result<Self> {
        if threshold == 0 {
            return Err(SearchError::invalid("split threshold must be at least 1"));
        }

        Ok(Self {
            threshold,
            workers: None,
        })
    }

    /// Runs on a dedicated pool of `workers` threads instead of the global one.
    pub fn with_workers(mut self, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(SearchError::invalid("worker count must be at least 1"));
        }
        self.workers = Some(workers);
        Ok(self)
    }

    pub fn search<P: MatchPredicate + ?Sized>(
        &self,
        grid: &Grid,
        predicate: &P,
        start: usize,
        end: usize,
    ) -> Result<SearchResult> {
        if start > end || end > grid.rows() {
            return Err(SearchError::invalid(format!(
                "row range {}..{} is outside 0..{}",
                start,
                end,
                grid.rows()
            )));
        }

        match self.workers {
            Some(workers) => {
                // Dropped on every return path, which joins the pool's threads.
                let pool = ParallelProcessor::new(Some(workers))?.build_pool(end - start)?;
                debug!(
                    workers = pool.current_num_threads(),
                    start, end, "divide and conquer on dedicated pool"
                );
                pool.install(|| self.compute(grid, predicate, start, end))
            }
            None => {
                debug!(
                    workers = rayon::current_num_threads(),
                    start, end, "divide and conquer on global pool"
                );
                self.compute(grid, predicate, start, end)
            }
        }
    }

    fn compute<P: MatchPredicate + ?Sized>(
        &self,
        grid: &Grid,
        predicate: &P,
        start: usize,
        end: usize,
    ) -> Result<SearchResult> {
        if end - start <= self.threshold {
            return scan_range(grid, predicate, start, end);
        }

        let mid = start + (end - start) / 2;

        // join runs the first closure here and leaves the second stealable.
        let (right, left) = rayon::join(
            || self.compute(grid, predicate, mid, end),
            || self.compute(grid, predicate, start, mid),
        );

        // Left covers lower rows, so its error wins when both fail.
        Ok(merge(left?, right?))
    }
}

fn scan_range<P: MatchPredicate + ?Sized>(
    grid: &Grid,
    predicate: &P,
    start: usize,
    end: usize,
) -> Result<SearchResult> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        (start..end).find_map(|row| scan_row(grid, predicate, row))
    }))
    .map_err(|payload| {
        let err = SearchError::from_panic(start..end, payload);
        warn!(%err, "leaf task failed");
        err
    })
}
