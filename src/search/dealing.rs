use crossbeam::channel::{bounded, Receiver, Sender};
use crossbeam::queue::SegQueue;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

use super::{scan_row, MatchPredicate, SearchResult};
use crate::error::{Result, SearchError};
use crate::grid::Grid;
use crate::parallel::ParallelProcessor;

/// A queued row plus the slot its outcome is delivered to.
type RowTask = (usize, Sender<Result<SearchResult>>);

/// One task per row, dealt to a fixed set of worker threads.
#[derive(Debug, Clone, Copy)]
pub struct PartitionedPoolSearch {
    processor: ParallelProcessor,
}

impl PartitionedPoolSearch {
    pub fn new(workers: usize) -> Result<Self> {
        Ok(Self {
            processor: ParallelProcessor::new(Some(workers))?,
        })
    }

    pub fn search<P: MatchPredicate + ?Sized>(
        &self,
        grid: &Grid,
        predicate: &P,
    ) -> Result<SearchResult> {
        let rows = grid.rows();
        let workers = self.processor.optimal_workers(rows);
        debug!(
            requested = self.processor.num_workers(),
            workers, rows, "dealing rows to worker pool"
        );

        // Filled before any worker starts; workers exit once it is empty.
        let queue: SegQueue<RowTask> = SegQueue::new();
        let mut handles = Vec::with_capacity(rows);
        for row in 0..rows {
            let (reply_tx, reply_rx) = bounded(1);
            queue.push((row, reply_tx));
            handles.push(reply_rx);
        }
        let queue = &queue;

        // The scope joins every worker before returning, on all paths.
        crossbeam::thread::scope(|s| {
            for worker_id in 0..workers {
                s.spawn(move |_| {
                    while let Some((row, reply)) = queue.pop() {
                        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                            scan_row(grid, predicate, row)
                        }))
                        .map_err(|payload| SearchError::from_panic(row..row + 1, payload));

                        if let Err(err) = &outcome {
                            warn!(worker_id, %err, "row task failed");
                        }
                        if reply.send(outcome).is_err() {
                            break;
                        }
                    }
                });
            }

            collect_in_row_order(handles)
        })
        .map_err(|_| SearchError::TaskFailure {
            row_range: 0..rows,
            message: "worker thread panicked".to_string(),
        })?
    }
}

/// Awaits every handle in submission order. The first failure wins,
/// otherwise the first match.
fn collect_in_row_order(handles: Vec<Receiver<Result<SearchResult>>>) -> Result<SearchResult> {
    let mut first_match: SearchResult = None;
    let mut first_error: Option<SearchError> = None;

    for (row, handle) in handles.into_iter().enumerate() {
        let outcome = handle.recv().unwrap_or_else(|_| {
            Err(SearchError::TaskFailure {
                row_range: row..row + 1,
                message: "worker exited before reporting".to_string(),
            })
        });

        match outcome {
            Ok(found) => first_match = first_match.or(found),
            Err(err) => {
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(first_match),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{IndexSum, Match};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_sample_grid() {
        let grid = Grid::from_rows(vec![vec![5, 1, 2], vec![0, 4, 3], vec![9, 3, 3]]).unwrap();
        for workers in [1, 2, 3, 4] {
            let found = PartitionedPoolSearch::new(workers)
                .unwrap()
                .search(&grid, &IndexSum)
                .unwrap();
            assert_eq!(found, Some(Match { value: 1, row: 0, col: 1 }));
        }
    }

    #[test]
    fn test_oversized_pool_on_single_cell() {
        let grid = Grid::from_rows(vec![vec![0]]).unwrap();
        let found = PartitionedPoolSearch::new(100_000)
            .unwrap()
            .search(&grid, &IndexSum)
            .unwrap();
        assert_eq!(found, Some(Match { value: 0, row: 0, col: 0 }));
    }

    #[test]
    fn test_oversized_pool_on_empty_grid() {
        let grid = Grid::from_rows(vec![]).unwrap();
        let found = PartitionedPoolSearch::new(100_000)
            .unwrap()
            .search(&grid, &IndexSum)
            .unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            PartitionedPoolSearch::new(0),
            Err(SearchError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_every_row_runs_exactly_once() {
        let grid = Grid::new(50, 3, vec![-1; 150]).unwrap();
        let visited = AtomicUsize::new(0);
        let predicate = |_row: usize, col: usize, _value: i64| {
            if col == 0 {
                visited.fetch_add(1, Ordering::Relaxed);
            }
            false
        };

        let found = PartitionedPoolSearch::new(4)
            .unwrap()
            .search(&grid, &predicate)
            .unwrap();
        assert_eq!(found, None);
        assert_eq!(visited.load(Ordering::Relaxed), 50);
    }

    #[test]
    fn test_failure_reported_after_draining() {
        let grid = Grid::new(20, 2, vec![0; 40]).unwrap();
        let visited = AtomicUsize::new(0);
        let predicate = |row: usize, col: usize, _value: i64| {
            if col == 0 {
                visited.fetch_add(1, Ordering::Relaxed);
            }
            if row == 12 || row == 3 {
                panic!("row {row} exploded");
            }
            row == 15
        };

        let err = PartitionedPoolSearch::new(3)
            .unwrap()
            .search(&grid, &predicate)
            .unwrap_err();
        assert_eq!(
            err,
            SearchError::TaskFailure {
                row_range: 3..4,
                message: "row 3 exploded".to_string()
            }
        );
        assert_eq!(visited.load(Ordering::Relaxed), 20);
    }
}
