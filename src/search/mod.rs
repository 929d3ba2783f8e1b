//! Concurrent predicate search over a [`Grid`].
//!
//! Two strategies are offered. [`DivideAndConquerSearch`] halves the row
//! range recursively and lets idle rayon workers steal the forked halves.
//! [`PartitionedPoolSearch`] deals one task per row to a fixed set of
//! workers. Both reduce partial results by `(row, col)` order, so the
//! answer never depends on scheduling.

mod dealing;
mod stealing;

use std::cmp::Ordering;
use std::fmt;
use tracing::info;

use crate::error::Result;
use crate::grid::Grid;

pub use dealing::PartitionedPoolSearch;
pub use stealing::DivideAndConquerSearch;

/// A matching cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub value: i64,
    pub row: usize,
    pub col: usize,
}

// Ordered by position only: row-major scan order.
impl Ord for Match {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.row, self.col).cmp(&(other.row, other.col))
    }
}

impl PartialOrd for Match {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value: {} at index [{}][{}]", self.value, self.row, self.col)
    }
}

/// `None` means no cell matched.
pub type SearchResult = Option<Match>;

/// Combines two partial results, keeping the earlier match in scan order.
pub fn merge(left: SearchResult, right: SearchResult) -> SearchResult {
    match (left, right) {
        (Some(l), Some(r)) => Some(l.min(r)),
        (l, r) => l.or(r),
    }
}

/// Decides whether the cell at `(row, col)` holding `value` is a match.
pub trait MatchPredicate: Sync {
    fn matches(&self, row: usize, col: usize, value: i64) -> bool;
}

impl<F> MatchPredicate for F
where
    F: Fn(usize, usize, i64) -> bool + Sync,
{
    fn matches(&self, row: usize, col: usize, value: i64) -> bool {
        self(row, col, value)
    }
}

/// Baseline predicate: `value == row + col`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexSum;

impl MatchPredicate for IndexSum {
    fn matches(&self, row: usize, col: usize, value: i64) -> bool {
        i64::try_from(row + col).is_ok_and(|sum| sum == value)
    }
}

/// First match in `row`, scanning left to right.
pub(crate) fn scan_row<P: MatchPredicate + ?Sized>(
    grid: &Grid,
    predicate: &P,
    row: usize,
) -> SearchResult {
    grid.row(row)?
        .iter()
        .enumerate()
        .find(|&(col, &value)| predicate.matches(row, col, value))
        .map(|(col, &value)| Match { value, row, col })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Work stealing. `workers: None` runs on the global rayon pool.
    DivideAndConquer {
        threshold: usize,
        workers: Option<usize>,
    },
    /// Work dealing over a fixed pool of `workers` threads.
    PartitionedPool { workers: usize },
}

/// Runs `strategy` over the whole grid.
pub fn search<P: MatchPredicate + ?Sized>(
    grid: &Grid,
    predicate: &P,
    strategy: &Strategy,
) -> Result<SearchResult> {
    info!(
        rows = grid.rows(),
        cols = grid.cols(),
        ?strategy,
        "Starting search"
    );

    let result = match *strategy {
        Strategy::DivideAndConquer { threshold, workers } => {
            let mut searcher = DivideAndConquerSearch::new(threshold)?;
            if let Some(workers) = workers {
                searcher = searcher.with_workers(workers)?;
            }
            searcher.search(grid, predicate, 0, grid.rows())?
        }
        Strategy::PartitionedPool { workers } => {
            PartitionedPoolSearch::new(workers)?.search(grid, predicate)?
        }
    };

    info!(found = result.is_some(), "Search complete");
    Ok(result)
}

/// [`search`] with the [`IndexSum`] predicate.
pub fn search_with_baseline(grid: &Grid, strategy: &Strategy) -> Result<SearchResult> {
    search(grid, &IndexSum, strategy)
}
