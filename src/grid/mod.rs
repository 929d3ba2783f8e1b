use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{Result, SearchError};

/// Rectangular, row-major table of integers. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<i64>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize, cells: Vec<i64>) -> Result<Self> {
        let expected = rows.checked_mul(cols).ok_or_else(|| {
            SearchError::invalid(format!("grid dimensions overflow: {rows} x {cols}"))
        })?;
        if cells.len() != expected {
            return Err(SearchError::invalid(format!(
                "expected {} cells for a {}x{} grid, got {}",
                expected,
                rows,
                cols,
                cells.len()
            )));
        }

        Ok(Self { rows, cols, cells })
    }

    /// Builds a grid from nested rows. All rows must share the first row's length.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let row_count = rows.len();
        let mut cells = Vec::with_capacity(row_count * cols);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(SearchError::invalid(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            cells.extend(row);
        }

        Ok(Self {
            rows: row_count,
            cols,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn row(&self, row: usize) -> Option<&[i64]> {
        if row >= self.rows {
            return None;
        }

        let offset = row * self.cols;
        Some(&self.cells[offset..offset + self.cols])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[i64]> {
        // A 0-column grid still yields `rows` empty rows.
        (0..self.rows).map(move |r| &self.cells[r * self.cols..(r + 1) * self.cols])
    }
}

/// Fills a `rows x cols` grid with uniform integers in `[min, max]`.
///
/// Passing a seed makes the grid reproducible; `None` seeds from the OS.
pub fn generate_grid(
    rows: usize,
    cols: usize,
    min: i64,
    max: i64,
    seed: Option<u64>,
) -> Result<Grid> {
    if min > max {
        return Err(SearchError::invalid(format!(
            "min ({min}) must not exceed max ({max})"
        )));
    }
    let len = rows.checked_mul(cols).ok_or_else(|| {
        SearchError::invalid(format!("grid dimensions overflow: {rows} x {cols}"))
    })?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    debug!(rows, cols, min, max, ?seed, "generating grid");

    let cells = (0..len).map(|_| rng.random_range(min..=max)).collect();
    Grid::new(rows, cols, cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_layout() {
        let grid = Grid::from_rows(vec![vec![5, 1, 2], vec![0, 4, 3]]).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.row(0), Some(&[5, 1, 2][..]));
        assert_eq!(grid.row(1), Some(&[0, 4, 3][..]));
        assert_eq!(grid.row(2), None);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Grid::from_rows(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert!(matches!(err, SearchError::InvalidArgument(_)));
    }

    #[test]
    fn test_zero_column_rows() {
        let grid = Grid::from_rows(vec![vec![], vec![]]).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 0);
        assert!(grid.is_empty());
        assert_eq!(grid.iter_rows().count(), 2);
    }

    #[test]
    fn test_generate_within_bounds() {
        let grid = generate_grid(8, 5, -3, 3, Some(7)).unwrap();
        assert_eq!(grid.rows(), 8);
        assert_eq!(grid.cols(), 5);
        assert!(grid.iter_rows().flatten().all(|v| (-3..=3).contains(v)));
    }

    #[test]
    fn test_generate_seed_is_reproducible() {
        let a = generate_grid(6, 6, 0, 100, Some(42)).unwrap();
        let b = generate_grid(6, 6, 0, 100, Some(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_rejects_inverted_range() {
        let err = generate_grid(2, 2, 5, 1, Some(0)).unwrap_err();
        assert!(matches!(err, SearchError::InvalidArgument(_)));
    }

    #[test]
    fn test_generate_empty() {
        let grid = generate_grid(0, 0, 0, 0, None).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.rows(), 0);
    }
}
